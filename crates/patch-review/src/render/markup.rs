//! Per-line HTML markup for the page-rendering front end.
//!
//! The document model stores raw text; this view turns one parsed line into
//! the HTML fragment the front end inserts into its line element. Escaping
//! happens first (`&`, then `<`, then `>`, in that order to avoid double
//! escaping), markup is inserted afterwards.

use crate::model::{DiffDocument, DiffLine, LineKind, MetaEmphasis};
use regex::Regex;
use std::sync::OnceLock;

struct MarkupPatterns {
    file_header: Regex,
    hunk_anchor: Regex,
    tab_run: Regex,
    trailing_ws: Regex,
}

fn patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        file_header: Regex::new(r"^(\+\+\+ )(\S+)((?:\s.*)?)$").expect("file header pattern"),
        hunk_anchor: Regex::new(r"^(@@ .+ @@\s+)(\S+\s[^\s(]*)").expect("hunk anchor pattern"),
        tab_run: Regex::new(r"\t+").expect("tab pattern"),
        trailing_ws: Regex::new(r"^(.*\S)(\s+)$").expect("trailing whitespace pattern"),
    })
}

/// Escape `&`, `<` and `>`, in that order.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML fragment for one line of the document.
///
/// File headers get an anchor element around the path, hunk headers around
/// the trailing context; added lines expose tab runs and trailing whitespace
/// (with a hidden end-of-line marker that only shows up in pasted text);
/// blank lines become a non-breaking space so row height is preserved; the
/// no-newline marker is wrapped for distinct styling.
pub fn line_markup(document: &DiffDocument, line: &DiffLine) -> String {
    let patterns = patterns();
    let escaped = escape_html(&line.text);

    match line.kind {
        LineKind::FileHeader => {
            let entry = document.files.iter().find(|f| f.first_line == line.index);
            match (entry, patterns.file_header.captures(&escaped)) {
                (Some(entry), Some(captures)) => format!(
                    "{}<a class=\"file\" id=\"{}\">{}</a>{}",
                    &captures[1], entry.id, &captures[2], &captures[3]
                ),
                _ => escaped,
            }
        }
        LineKind::HunkHeader => {
            let entry = document.hunks.iter().find(|h| h.first_line == line.index);
            match (entry, patterns.hunk_anchor.captures(&escaped)) {
                (Some(entry), Some(captures)) if !entry.id.is_empty() => {
                    let rest = &escaped[captures.get(0).map(|m| m.end()).unwrap_or(0)..];
                    format!(
                        "{}<a class=\"hunk\" id=\"{}\">{}</a>{}",
                        &captures[1], entry.id, &captures[2], rest
                    )
                }
                _ => escaped,
            }
        }
        LineKind::Added => {
            let mut markup = patterns
                .tab_run
                .replace(&escaped, "<span class=\"error tab\">$0</span>")
                .into_owned();
            markup = patterns
                .trailing_ws
                .replace(
                    &markup,
                    "$1<span class=\"error whitespace\">$2</span><span class=\"hidden\">¶</span>",
                )
                .into_owned();
            markup
        }
        LineKind::Meta if line.flags.no_newline_at_eof => {
            format!("<span class=\"error eof\">{escaped}</span>")
        }
        _ if escaped.is_empty() => "&nbsp;".to_string(),
        _ => escaped,
    }
}

/// Static style classes for one line, matching what the front end's
/// stylesheet expects. Session-dependent classes (`selected`, `has-comment`,
/// `new-comment`, `comment-id-N`) come from the session instead.
pub fn css_classes(line: &DiffLine) -> Vec<&'static str> {
    let mut classes = Vec::new();
    match line.kind {
        LineKind::FileHeader | LineKind::HunkHeader | LineKind::Meta => classes.push("file"),
        LineKind::Removed => classes.push("old"),
        LineKind::Added => classes.push("new"),
        LineKind::Context => {}
    }
    match line.emphasis {
        Some(MetaEmphasis::Old) => classes.push("old"),
        Some(MetaEmphasis::New) => classes.push("new"),
        None => {}
    }
    if line.flags.is_comment_syntax {
        classes.push("comment");
    }
    classes
}
