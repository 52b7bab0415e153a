//! Review Actions
//!
//! Tagged actions that the review session can process. These are exposed by
//! the crate so that the orchestrating front end can transform raw input
//! (pointer events on rendered lines, form buttons) into actions and
//! dispatch them to the session.

/// Actions that can be performed on a review session.
///
/// These are the semantic inputs the engine understands. The front end is
/// responsible for mapping its own events (mouse, keyboard, buttons) to
/// these actions; the engine never sees a pointer device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    // === Pointer gestures over rendered lines ===
    /// Pointer pressed on the line at the given document position.
    PointerDown(usize),
    /// Pointer moved over the line at the given document position.
    PointerOver(usize),
    /// Pointer released on the line at the given document position.
    PointerUp(usize),

    // === Comment lifecycle ===
    /// Re-open an existing comment for editing (triggered by activating a
    /// commented line).
    EditComment(usize),
    /// Commit the current selection with the given free text; updates the
    /// comment being edited, if any.
    SaveComment { text: String },
    /// Abandon the current selection and any in-progress edit.
    CancelComment,
    /// Delete a saved comment by id.
    DeleteComment(usize),

    // === Export ===
    /// Serialize all comments into the paste-ready block and end the
    /// annotation pass.
    Export,
}

impl ReviewAction {
    /// Whether this action is part of a pointer-drag gesture.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            ReviewAction::PointerDown(_) | ReviewAction::PointerOver(_) | ReviewAction::PointerUp(_)
        )
    }

    /// Whether this action mutates the comment store.
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            ReviewAction::SaveComment { .. }
                | ReviewAction::DeleteComment(_)
                | ReviewAction::EditComment(_)
                | ReviewAction::CancelComment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pointer() {
        assert!(ReviewAction::PointerDown(0).is_pointer());
        assert!(ReviewAction::PointerOver(3).is_pointer());
        assert!(ReviewAction::PointerUp(3).is_pointer());
        assert!(!ReviewAction::Export.is_pointer());
    }

    #[test]
    fn test_is_comment() {
        assert!(ReviewAction::SaveComment { text: "x".into() }.is_comment());
        assert!(ReviewAction::DeleteComment(1).is_comment());
        assert!(!ReviewAction::PointerDown(0).is_comment());
        assert!(!ReviewAction::Export.is_comment());
    }
}
