//! Trait for fetching raw diff text.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching raw diff text.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The transfer itself failed.
    #[error("failed to fetch patch: {0}")]
    FetchFailed(String),

    /// The source produced no usable content.
    #[error("patch source returned empty content")]
    Empty,
}

/// One-shot source of raw unified-diff text.
///
/// This is the engine's only suspension point: a single asynchronous fetch
/// whose successful result is handed to the parser as a string. The engine
/// never observes a failed fetch: [`crate::Reviewer::open`] surfaces the
/// error to the caller without creating a session.
///
/// # Example
///
/// ```ignore
/// struct FileSource(PathBuf);
///
/// #[async_trait]
/// impl PatchSource for FileSource {
///     async fn fetch(&self) -> Result<String, SourceError> {
///         tokio::fs::read_to_string(&self.0)
///             .await
///             .map_err(|e| SourceError::FetchFailed(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait PatchSource: Send + Sync {
    /// Fetch the raw diff text.
    async fn fetch(&self) -> Result<String, SourceError>;
}

/// A source that serves a fixed string; for tests and already-fetched text.
pub struct StaticPatchSource(pub String);

#[async_trait]
impl PatchSource for StaticPatchSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        if self.0.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.0.clone())
    }
}
