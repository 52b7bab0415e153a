//! Comment records and the session-scoped comment store.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A saved review comment: free text attached to a set of document lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Store id. Assigned at creation time and stable for the comment's
    /// lifetime; used as lookup key and as the edit re-entry trigger.
    pub id: usize,
    /// Referenced document line indices, sorted by document position.
    pub lines: Vec<usize>,
    /// Free-text body.
    pub text: String,
    /// When the comment was first saved.
    pub created_at: DateTime<Utc>,
}

/// Input to [`CommentStore::save`]: a comment body plus the lines it refers
/// to, with `id` set when updating an existing comment.
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    /// Existing comment id to overwrite, or `None` to create.
    pub id: Option<usize>,
    /// Referenced document line indices.
    pub lines: Vec<usize>,
    /// Free-text body.
    pub text: String,
}

/// Id-keyed storage for review comments.
///
/// Ids are dense while no comment is deleted and are never reused: deleting
/// leaves a hole, and the id counter only moves forward. Created empty per
/// review session and discarded with it.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    comments: BTreeMap<usize, Comment>,
    next_id: usize,
}

impl CommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update a comment.
    ///
    /// With `draft.id` set, the existing slot is overwritten (the slot need
    /// not be live; an update to a deleted id revives it). Otherwise the next
    /// id is assigned, counting every comment ever created, not the current
    /// population.
    pub fn save(&mut self, draft: CommentDraft) -> &Comment {
        let mut lines = draft.lines;
        lines.sort_unstable();
        lines.dedup();

        let id = match draft.id {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        let created_at = self
            .comments
            .get(&id)
            .map(|existing| existing.created_at)
            .unwrap_or_else(Utc::now);
        self.comments.insert(
            id,
            Comment {
                id,
                lines,
                text: draft.text,
                created_at,
            },
        );
        &self.comments[&id]
    }

    /// Look up a comment by id. `None` for unknown or deleted ids.
    pub fn load(&self, id: usize) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// Delete a comment by id, returning the removed record.
    ///
    /// The slot's id is never reassigned to a later [`save`](Self::save).
    pub fn remove(&mut self, id: usize) -> Option<Comment> {
        self.comments.remove(&id)
    }

    /// Number of live comments.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Whether the store holds no live comments.
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Live comments in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    /// Live comments sorted by the document position of their first
    /// referenced line (the renderer's ordering).
    pub fn sorted_by_position(&self) -> Vec<&Comment> {
        let mut live: Vec<&Comment> = self.comments.values().collect();
        live.sort_by_key(|c| c.lines.first().copied().unwrap_or(usize::MAX));
        live
    }

    /// Discard every comment. The id counter is not rewound.
    pub fn clear(&mut self) {
        self.comments.clear();
    }
}
