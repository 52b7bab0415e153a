//! Output rendering: the paste-ready annotation block and the per-line
//! HTML markup view.

mod annotation;
mod markup;

pub use annotation::render_comments;
pub use markup::{css_classes, escape_html, line_markup};
