//! # patch-review
//!
//! A standalone, reusable patch review engine: it parses raw unified-diff
//! text into an addressable, line-numbered document, lets a reviewer select
//! (possibly disjoint) ranges of lines, attaches free-text comments to those
//! ranges, and serializes all comments plus their source context back into a
//! single paste-ready text block.
//!
//! ## Design Principles
//!
//! This crate is designed to be **instrumented**: it receives data and emits
//! events without touching any rendering surface or network directly. This
//! enables:
//!
//! - Testability without a pointer device or a page to render into
//! - Reusability behind different front ends (browser glue, TUI, headless)
//! - Clear separation of concerns
//!
//! ## Action-Based Architecture
//!
//! The engine uses a tagged action pattern. The orchestrating front end maps
//! raw input (pointer events, button clicks) to [`ReviewAction`] variants and
//! dispatches them to the session, which answers with [`ReviewEvent`] values
//! describing what changed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use patch_review::{parse, ReviewAction, ReviewEvent, ReviewSession};
//!
//! // Parse a unified diff
//! let (document, diagnostics) = parse(diff_text);
//!
//! // Create a session owning the document, selection and comment store
//! let mut session = ReviewSession::new(document);
//!
//! // Drive it with actions (mapped from pointer events by the front end)
//! session.handle_action(ReviewAction::PointerDown(4));
//! session.handle_action(ReviewAction::PointerUp(7));
//! session.handle_action(ReviewAction::SaveComment { text: "Nit: typo.".into() });
//!
//! // Export the annotated review block
//! for event in session.handle_action(ReviewAction::Export) {
//!     if let ReviewEvent::ExportReady { text } = event {
//!         // Hand the block to the page's comment form
//!     }
//! }
//! ```

pub mod action;
pub mod event;
pub mod model;
pub mod parser;
pub mod render;
pub mod state;
pub mod traits;

// Re-export commonly used types
pub use action::ReviewAction;
pub use event::ReviewEvent;
pub use model::{
    Comment, CommentDraft, CommentStore, DiffDocument, DiffLine, DiffStat, FileEntry,
    GutterWidths, HunkEntry, LineFlags, LineKind, MetaEmphasis,
};
pub use parser::{parse, ParseDiagnostic};
pub use render::{line_markup, render_comments};
pub use state::{MenuEntry, Reviewer, ReviewSession, Selection};
pub use traits::{PatchSource, SourceError, StaticPatchSource};
