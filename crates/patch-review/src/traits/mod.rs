//! Extension traits for the engine's collaborators.

mod patch_source;

pub use patch_source::{PatchSource, SourceError, StaticPatchSource};
