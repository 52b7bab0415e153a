//! The review session: document, selection and comment store as one unit.

use crate::action::ReviewAction;
use crate::event::ReviewEvent;
use crate::model::{CommentDraft, CommentStore, DiffDocument, DiffStat, FileEntry, GutterWidths, HunkEntry};
use crate::parser::parse;
use crate::render::{css_classes, render_comments};
use crate::state::Selection;
use crate::traits::{PatchSource, SourceError};
use std::collections::HashSet;

/// One review pass over one parsed diff.
///
/// The session owns the document, the in-progress selection, and the comment
/// store; the three live and die together. All mutation goes through
/// [`handle_action`](Self::handle_action), which answers with the events the
/// front end needs to restyle lines, update the comment form, or receive the
/// export block.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    document: DiffDocument,
    selection: Selection,
    comments: CommentStore,
    /// Id of the comment currently loaded for editing, if any.
    editing: Option<usize>,
    /// Ids of comments saved since the front end last drained them; these
    /// carry the transient "new comment" mark.
    fresh: HashSet<usize>,
}

impl ReviewSession {
    /// Create a session over an already-parsed document.
    pub fn new(document: DiffDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// The parsed document.
    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    /// The committed selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The comment store.
    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    /// Id of the comment currently being edited.
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Aggregate diff statistics for display.
    pub fn stat(&self) -> DiffStat {
        self.document.stat
    }

    /// Line-number column widths for the gutter ruler.
    pub fn gutter(&self) -> GutterWidths {
        self.document.gutter
    }

    /// The jump-navigation menu: files with their anchored hunks nested
    /// underneath. Hunks without an anchor are not listed.
    pub fn menu(&self) -> Vec<MenuEntry<'_>> {
        self.document
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| MenuEntry {
                file,
                hunks: self
                    .document
                    .hunks
                    .iter()
                    .filter(|h| h.file == Some(index) && !h.id.is_empty())
                    .collect(),
            })
            .collect()
    }

    /// Whether the line is part of the committed selection.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    /// Id of the first comment referencing the line; the front end uses it
    /// as the edit re-entry trigger.
    pub fn comment_at_line(&self, index: usize) -> Option<usize> {
        self.comments
            .iter()
            .find(|c| c.lines.binary_search(&index).is_ok())
            .map(|c| c.id)
    }

    /// Full style class list for one line: the static kind/flag classes plus
    /// the session-dependent selection and comment marks.
    pub fn line_classes(&self, index: usize) -> Vec<String> {
        let Some(line) = self.document.line(index) else {
            return Vec::new();
        };
        let mut classes: Vec<String> = css_classes(line).iter().map(|c| c.to_string()).collect();
        if self.is_selected(index) {
            classes.push("selected".to_string());
        }
        if let Some(id) = self.comment_at_line(index) {
            classes.push("has-comment".to_string());
            classes.push(format!("comment-id-{id}"));
            if self.fresh.contains(&id) {
                classes.push("new-comment".to_string());
            }
        }
        classes
    }

    /// Drain the ids carrying the transient "new comment" mark.
    pub fn take_fresh_comments(&mut self) -> Vec<usize> {
        let mut fresh: Vec<usize> = self.fresh.drain().collect();
        fresh.sort_unstable();
        fresh
    }

    /// Process one action, returning the resulting events.
    ///
    /// This is the single entry point for user input. The front end maps its
    /// own pointer and form events to [`ReviewAction`] variants and reacts
    /// to the returned [`ReviewEvent`]s.
    pub fn handle_action(&mut self, action: ReviewAction) -> Vec<ReviewEvent> {
        match action {
            ReviewAction::PointerDown(index) => self.pointer_down(index),
            ReviewAction::PointerOver(index) => self.pointer_over(index),
            ReviewAction::PointerUp(index) => self.pointer_up(index),
            ReviewAction::EditComment(id) => self.edit_comment(id),
            ReviewAction::SaveComment { text } => self.save_comment(text),
            ReviewAction::CancelComment => self.reset(),
            ReviewAction::DeleteComment(id) => self.delete_comment(id),
            ReviewAction::Export => self.export(),
        }
    }

    fn pointer_down(&mut self, index: usize) -> Vec<ReviewEvent> {
        if index >= self.document.len() {
            return Vec::new();
        }
        self.selection.begin_drag(index);
        vec![ReviewEvent::PreviewChanged {
            range: self.selection.drag_preview(index),
        }]
    }

    fn pointer_over(&mut self, index: usize) -> Vec<ReviewEvent> {
        if index >= self.document.len() || !self.selection.is_dragging() {
            return Vec::new();
        }
        vec![ReviewEvent::PreviewChanged {
            range: self.selection.drag_preview(index),
        }]
    }

    fn pointer_up(&mut self, index: usize) -> Vec<ReviewEvent> {
        if index >= self.document.len() || !self.selection.is_dragging() {
            return Vec::new();
        }
        self.selection.end_drag(index);
        vec![
            ReviewEvent::PreviewChanged { range: None },
            ReviewEvent::SelectionChanged {
                lines: self.selection.indices().to_vec(),
            },
        ]
    }

    fn edit_comment(&mut self, id: usize) -> Vec<ReviewEvent> {
        let Some(comment) = self.comments.load(id) else {
            return Vec::new();
        };
        let lines = comment.lines.clone();
        // Do not overwrite another comment's in-progress selection silently:
        // switching to a different comment resets first.
        if self.editing != Some(id) {
            self.selection.clear();
        }
        self.selection.set_indices(lines);
        self.editing = Some(id);
        vec![ReviewEvent::SelectionChanged {
            lines: self.selection.indices().to_vec(),
        }]
    }

    fn save_comment(&mut self, text: String) -> Vec<ReviewEvent> {
        let mut events = Vec::new();
        // Store only non-empty comments over a non-empty selection; the
        // selection is consumed either way.
        if !text.trim().is_empty() && !self.selection.is_empty() {
            let saved = self.comments.save(CommentDraft {
                id: self.editing,
                lines: self.selection.indices().to_vec(),
                text,
            });
            let (id, lines) = (saved.id, saved.lines.clone());
            log::debug!("saved comment {id} over {} lines", lines.len());
            self.fresh.insert(id);
            events.push(ReviewEvent::CommentSaved { id, lines });
        }
        events.extend(self.reset());
        events
    }

    fn delete_comment(&mut self, id: usize) -> Vec<ReviewEvent> {
        let mut events = Vec::new();
        if let Some(removed) = self.comments.remove(id) {
            self.fresh.remove(&id);
            events.push(ReviewEvent::CommentRemoved {
                id,
                lines: removed.lines,
            });
        }
        events.extend(self.reset());
        events
    }

    fn export(&mut self) -> Vec<ReviewEvent> {
        if self.comments.is_empty() {
            return Vec::new();
        }
        let text = render_comments(&self.document, &self.comments);
        // The annotations are consumed by the export.
        self.comments.clear();
        self.fresh.clear();
        let mut events = vec![ReviewEvent::ExportReady { text }];
        events.extend(self.reset());
        events
    }

    /// Clear the selection and any in-progress edit. Emits a
    /// `SelectionChanged` event when there was something to clear.
    fn reset(&mut self) -> Vec<ReviewEvent> {
        let had_state = !self.selection.is_empty() || self.editing.is_some();
        self.selection.clear();
        self.editing = None;
        if had_state {
            vec![ReviewEvent::SelectionChanged { lines: Vec::new() }]
        } else {
            Vec::new()
        }
    }
}

/// One file's entry in the jump menu, with its anchored hunks.
#[derive(Debug)]
pub struct MenuEntry<'a> {
    /// The file header entry.
    pub file: &'a FileEntry,
    /// Anchored hunks nested under this file.
    pub hunks: Vec<&'a HunkEntry>,
}

/// Session host: at most one review session at a time.
///
/// Re-invoking review on a different diff tears the existing session down
/// before the new fetch even starts, so a late-arriving response from a
/// superseded fetch has no stale state to land in.
#[derive(Default)]
pub struct Reviewer {
    session: Option<ReviewSession>,
}

impl Reviewer {
    /// Create a host with no open session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any open session, fetch from the source, and open a new
    /// session over the parsed result. On fetch failure no session exists.
    pub async fn open(
        &mut self,
        source: &dyn PatchSource,
    ) -> Result<&mut ReviewSession, SourceError> {
        self.session = None;
        let raw = source.fetch().await?;
        let (document, diagnostics) = parse(&raw);
        for diagnostic in &diagnostics {
            log::warn!("{diagnostic}");
        }
        Ok(self.session.insert(ReviewSession::new(document)))
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&ReviewSession> {
        self.session.as_ref()
    }

    /// The open session, mutably.
    pub fn session_mut(&mut self) -> Option<&mut ReviewSession> {
        self.session.as_mut()
    }

    /// Discard the open session.
    pub fn close(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StaticPatchSource;

    const SAMPLE: &str = "\
+++ b/alpha.rs
@@ -1,3 +1,3 @@ fn alpha()
 one
-two
+three
@@ -9,2 +9,2 @@ fn omega()
 nine
+ten
";

    fn session() -> ReviewSession {
        let (document, diagnostics) = parse(SAMPLE);
        assert!(diagnostics.is_empty());
        ReviewSession::new(document)
    }

    fn drag(session: &mut ReviewSession, from: usize, to: usize) {
        session.handle_action(ReviewAction::PointerDown(from));
        session.handle_action(ReviewAction::PointerOver(to));
        session.handle_action(ReviewAction::PointerUp(to));
    }

    #[test]
    fn test_pointer_gesture_commits_selection() {
        let mut session = session();
        let events = session.handle_action(ReviewAction::PointerDown(2));
        assert_eq!(
            events,
            vec![ReviewEvent::PreviewChanged { range: Some((2, 2)) }]
        );
        let events = session.handle_action(ReviewAction::PointerOver(4));
        assert_eq!(
            events,
            vec![ReviewEvent::PreviewChanged { range: Some((2, 4)) }]
        );
        let events = session.handle_action(ReviewAction::PointerUp(4));
        assert_eq!(
            events,
            vec![
                ReviewEvent::PreviewChanged { range: None },
                ReviewEvent::SelectionChanged {
                    lines: vec![2, 3, 4]
                },
            ]
        );
        assert!(session.is_selected(3));
    }

    #[test]
    fn test_pointer_out_of_bounds_is_noop() {
        let mut session = session();
        assert!(session
            .handle_action(ReviewAction::PointerDown(999))
            .is_empty());
        assert!(session.handle_action(ReviewAction::PointerUp(2)).is_empty());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut session = session();
        assert!(session
            .handle_action(ReviewAction::PointerOver(2))
            .is_empty());
    }

    #[test]
    fn test_save_comment_flow() {
        let mut session = session();
        drag(&mut session, 2, 3);
        let events = session.handle_action(ReviewAction::SaveComment {
            text: "Check this.".into(),
        });
        assert_eq!(
            events,
            vec![
                ReviewEvent::CommentSaved {
                    id: 0,
                    lines: vec![2, 3]
                },
                ReviewEvent::SelectionChanged { lines: Vec::new() },
            ]
        );
        // The selection is consumed; the comment marks its lines.
        assert!(session.selection().is_empty());
        assert_eq!(session.comment_at_line(2), Some(0));
        assert_eq!(session.comment_at_line(4), None);
        assert!(session
            .line_classes(2)
            .iter()
            .any(|c| c == "has-comment"));
        assert!(session.line_classes(2).iter().any(|c| c == "comment-id-0"));
    }

    #[test]
    fn test_whitespace_only_text_saves_nothing() {
        let mut session = session();
        drag(&mut session, 2, 3);
        let events = session.handle_action(ReviewAction::SaveComment {
            text: "   \n".into(),
        });
        assert_eq!(
            events,
            vec![ReviewEvent::SelectionChanged { lines: Vec::new() }]
        );
        assert!(session.comments().is_empty());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_save_without_selection_is_reset_only() {
        let mut session = session();
        let events = session.handle_action(ReviewAction::SaveComment { text: "x".into() });
        assert!(events.is_empty());
        assert!(session.comments().is_empty());
    }

    #[test]
    fn test_edit_reloads_lines_and_updates_in_place() {
        let mut session = session();
        drag(&mut session, 2, 3);
        session.handle_action(ReviewAction::SaveComment { text: "v1".into() });

        let events = session.handle_action(ReviewAction::EditComment(0));
        assert_eq!(events, vec![ReviewEvent::SelectionChanged { lines: vec![2, 3] }]);
        assert_eq!(session.editing(), Some(0));

        // Extend the selection with another drag, then save the update.
        drag(&mut session, 6, 6);
        let events = session.handle_action(ReviewAction::SaveComment { text: "v2".into() });
        assert_eq!(
            events[0],
            ReviewEvent::CommentSaved {
                id: 0,
                lines: vec![2, 3, 6]
            }
        );
        assert_eq!(session.comments().load(0).unwrap().text, "v2");
        assert_eq!(session.comments().len(), 1);
    }

    #[test]
    fn test_edit_unknown_comment_is_noop() {
        let mut session = session();
        assert!(session.handle_action(ReviewAction::EditComment(7)).is_empty());
    }

    #[test]
    fn test_delete_comment_clears_marks() {
        let mut session = session();
        drag(&mut session, 2, 3);
        session.handle_action(ReviewAction::SaveComment { text: "x".into() });

        let events = session.handle_action(ReviewAction::DeleteComment(0));
        assert_eq!(
            events,
            vec![ReviewEvent::CommentRemoved {
                id: 0,
                lines: vec![2, 3]
            }]
        );
        assert_eq!(session.comment_at_line(2), None);
        assert!(!session
            .line_classes(2)
            .iter()
            .any(|c| c == "has-comment"));
    }

    #[test]
    fn test_delete_unknown_comment_is_noop() {
        let mut session = session();
        assert!(session
            .handle_action(ReviewAction::DeleteComment(3))
            .is_empty());
    }

    #[test]
    fn test_cancel_resets_selection_and_edit() {
        let mut session = session();
        drag(&mut session, 2, 3);
        let events = session.handle_action(ReviewAction::CancelComment);
        assert_eq!(
            events,
            vec![ReviewEvent::SelectionChanged { lines: Vec::new() }]
        );
        assert!(session.selection().is_empty());
        // Cancelling with nothing active emits nothing.
        assert!(session.handle_action(ReviewAction::CancelComment).is_empty());
    }

    #[test]
    fn test_export_consumes_comments() {
        let mut session = session();
        drag(&mut session, 4, 4);
        session.handle_action(ReviewAction::SaveComment { text: "note".into() });

        let events = session.handle_action(ReviewAction::Export);
        assert_eq!(events.len(), 1);
        let ReviewEvent::ExportReady { text } = &events[0] else {
            panic!("expected ExportReady, got {events:?}");
        };
        assert!(text.contains("+three"));
        assert!(text.contains("note"));
        // The store is consumed; a second export has nothing to say.
        assert!(session.comments().is_empty());
        assert!(session.handle_action(ReviewAction::Export).is_empty());
    }

    #[test]
    fn test_fresh_marks_are_drained_once() {
        let mut session = session();
        drag(&mut session, 2, 2);
        session.handle_action(ReviewAction::SaveComment { text: "x".into() });
        assert!(session.line_classes(2).iter().any(|c| c == "new-comment"));
        assert_eq!(session.take_fresh_comments(), vec![0]);
        assert!(!session.line_classes(2).iter().any(|c| c == "new-comment"));
    }

    #[test]
    fn test_menu_nests_anchored_hunks() {
        let session = session();
        let menu = session.menu();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].file.path, "b/alpha.rs");
        let hunk_ids: Vec<_> = menu[0].hunks.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(hunk_ids, vec!["fnalpha", "fnomega"]);
    }

    #[tokio::test]
    async fn test_reviewer_open_replaces_session() {
        let mut reviewer = Reviewer::new();
        let first = StaticPatchSource("+++ a\n@@ -1,1 +1,1 @@\n x\n".into());
        reviewer.open(&first).await.unwrap();
        let session = reviewer.session_mut().unwrap();
        session.handle_action(ReviewAction::PointerDown(2));
        session.handle_action(ReviewAction::PointerUp(2));
        session.handle_action(ReviewAction::SaveComment { text: "gone".into() });

        // Opening another diff discards document, selection and comments.
        let second = StaticPatchSource("+++ b\n@@ -1,1 +1,1 @@\n y\n".into());
        reviewer.open(&second).await.unwrap();
        let session = reviewer.session().unwrap();
        assert!(session.comments().is_empty());
        assert_eq!(session.document().files[0].path, "b");
    }

    #[tokio::test]
    async fn test_reviewer_failed_fetch_leaves_no_session() {
        let mut reviewer = Reviewer::new();
        let good = StaticPatchSource("+++ a\n".into());
        reviewer.open(&good).await.unwrap();
        assert!(reviewer.session().is_some());

        let bad = StaticPatchSource(String::new());
        assert!(reviewer.open(&bad).await.is_err());
        // The previous session is already torn down.
        assert!(reviewer.session().is_none());
    }

    #[test]
    fn test_close_discards_session_state() {
        let mut reviewer = Reviewer {
            session: Some(session()),
        };
        reviewer.close();
        assert!(reviewer.session().is_none());
    }
}
