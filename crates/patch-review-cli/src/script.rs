//! JSON annotation scripts: the interactive review flow made replayable.
//!
//! A script is a list of comments, each with one or more inclusive line
//! ranges. Ranges are replayed as pointer-drag gestures against the session,
//! so a script exercises exactly the code path an interactive front end
//! would.

use patch_review::{ReviewAction, ReviewEvent, ReviewSession};
use serde::Deserialize;

/// A headless review script.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationScript {
    /// Comments to attach, in replay order.
    pub comments: Vec<ScriptComment>,
}

/// One scripted comment.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptComment {
    /// Inclusive document line ranges, each replayed as one drag gesture.
    pub ranges: Vec<(usize, usize)>,
    /// Free-text body.
    pub text: String,
}

impl AnnotationScript {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Replay a script against the session and export the paste block.
///
/// Returns `None` when the script produced no comments (empty script, or
/// every range was out of bounds).
pub fn replay(session: &mut ReviewSession, script: &AnnotationScript) -> Option<String> {
    for comment in &script.comments {
        for &(start, end) in &comment.ranges {
            session.handle_action(ReviewAction::PointerDown(start));
            session.handle_action(ReviewAction::PointerOver(end));
            session.handle_action(ReviewAction::PointerUp(end));
        }
        session.handle_action(ReviewAction::SaveComment {
            text: comment.text.clone(),
        });
    }

    session
        .handle_action(ReviewAction::Export)
        .into_iter()
        .find_map(|event| match event {
            ReviewEvent::ExportReady { text } => Some(text),
            _ => None,
        })
}
