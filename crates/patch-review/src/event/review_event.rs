//! Events emitted by the review session for the front end to handle.

/// Events emitted by the review session.
///
/// The engine is designed to be instrumented: it emits events instead of
/// performing side effects directly. The front end restyles lines, shows or
/// hides the comment form, and inserts the export block into the page in
/// response to these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    /// The in-flight drag preview changed. `None` when the drag ended.
    PreviewChanged {
        /// Contiguous range under the drag, normalized to document order.
        range: Option<(usize, usize)>,
    },

    /// The committed selection changed.
    SelectionChanged {
        /// Selected document indices, in document order.
        lines: Vec<usize>,
    },

    /// A comment was created or updated.
    CommentSaved {
        /// Store id (stable for the comment's lifetime).
        id: usize,
        /// Referenced document indices.
        lines: Vec<usize>,
    },

    /// A comment was deleted; its lines no longer carry comment marks.
    CommentRemoved {
        /// The removed comment's id.
        id: usize,
        /// The document indices it referenced.
        lines: Vec<usize>,
    },

    /// The paste-ready block was produced; the session's comments are
    /// consumed.
    ExportReady {
        /// The serialized review block.
        text: String,
    },
}
