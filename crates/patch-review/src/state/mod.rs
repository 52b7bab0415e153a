//! Session state: the selection machine and the session that owns it.

mod selection;
mod session;

pub use selection::Selection;
pub use session::{MenuEntry, Reviewer, ReviewSession};
