//! Line selection: a drag-gesture state machine over document positions.
//!
//! The committed selection is an ordered, deduplicated set of document line
//! indices. A drag gesture previews a contiguous range between its anchor
//! and the line currently under the pointer; releasing the pointer commits
//! the range as a toggle. Several gestures can accumulate disjoint ranges
//! into one selection.

/// Committed line selection plus in-flight drag state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected document indices, sorted by document position.
    lines: Vec<usize>,
    /// Anchor index while a drag is in progress.
    drag_anchor: Option<usize>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected document indices, in document order.
    pub fn indices(&self) -> &[usize] {
        &self.lines
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the given line is part of the committed selection.
    pub fn contains(&self, index: usize) -> bool {
        self.lines.binary_search(&index).is_ok()
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Pointer pressed on a line: start a drag anchored there. A second
    /// press while already dragging re-anchors.
    pub fn begin_drag(&mut self, index: usize) {
        self.drag_anchor = Some(index);
    }

    /// The contiguous range the in-flight drag currently covers, normalized
    /// to document order. Purely visual feedback; the committed selection is
    /// untouched until the pointer is released.
    pub fn drag_preview(&self, under_pointer: usize) -> Option<(usize, usize)> {
        let anchor = self.drag_anchor?;
        Some((anchor.min(under_pointer), anchor.max(under_pointer)))
    }

    /// Pointer released on a line: commit the previewed range as a toggle
    /// and return to idle. Returns the committed range, or `None` if no drag
    /// was in progress.
    pub fn end_drag(&mut self, index: usize) -> Option<(usize, usize)> {
        let (start, end) = self.drag_preview(index)?;
        self.drag_anchor = None;
        self.toggle_range(start, end);
        Some((start, end))
    }

    /// Toggle a contiguous range: if every line in it is already selected,
    /// the whole range is deselected; otherwise the range is merged in,
    /// deduplicated against lines already present. The selection stays
    /// sorted by document position regardless of gesture order.
    pub fn toggle_range(&mut self, start: usize, end: usize) {
        if start > end {
            return;
        }
        let all_selected = (start..=end).all(|i| self.contains(i));
        if all_selected {
            self.lines.retain(|i| *i < start || *i > end);
        } else {
            self.lines.extend(start..=end);
            self.lines.sort_unstable();
            self.lines.dedup();
        }
    }

    /// Replace the selection wholesale (loading a comment for editing).
    pub fn set_indices(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        self.lines = indices;
        self.drag_anchor = None;
    }

    /// Drop the selection and any in-flight drag.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.drag_anchor = None;
    }
}
