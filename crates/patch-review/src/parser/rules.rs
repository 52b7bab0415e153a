//! Line classification rules for unified diff text.
//!
//! Classification is an explicit ordered rule table evaluated top-to-bottom
//! with first-match-wins. Order is part of the contract: a `+++ path` line
//! matches both the file-header rule and the added-line prefix, and must be
//! classified as a file header.

use crate::model::MetaEmphasis;
use regex::Regex;
use std::sync::OnceLock;

/// Outcome of classifying one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    /// `+++ <path>` file header. Registers a file index entry.
    FileHeader { path: String },
    /// `@@ -a,b +c,d @@ <context>` hunk header. Counter starts are `None`
    /// when the header's numbers do not fit the counter type.
    HunkHeader {
        old_start: Option<u32>,
        new_start: Option<u32>,
        anchor: String,
    },
    /// Diff plumbing (`index`, `===`, mode changes, rename/copy, …).
    Meta { emphasis: Option<MetaEmphasis> },
    /// Removed line (`-`, not a structural marker).
    Removed,
    /// Added line (`+`, not a structural marker).
    Added,
    /// Empty physical line; treated as context for the counters.
    Blank,
    /// `--` alone: end-of-hunk delimiter, counters become unset.
    HunkEnd,
    /// `\ No newline at end of file` marker.
    NoNewline,
    /// Anything else; parsing is best-effort and falls open to context.
    Context,
}

/// Once-compiled patterns shared by the rule functions.
pub(crate) struct LineRules {
    file_header: Regex,
    hunk_numbers: Regex,
    hunk_anchor: Regex,
    meta: Regex,
    meta_old: Regex,
    meta_new: Regex,
    no_newline: Regex,
    comment_syntax: Regex,
}

type RuleFn = fn(&LineRules, &str) -> Option<Classification>;

/// The ordered rule table. First match wins; the fallback is `Context`.
const RULES: &[(&str, RuleFn)] = &[
    ("file-header", file_header),
    ("hunk-header", hunk_header),
    ("meta", meta),
    ("removed", removed),
    ("added", added),
    ("blank", blank),
    ("hunk-end", hunk_end),
    ("no-newline", no_newline),
];

impl LineRules {
    fn new() -> Self {
        Self {
            file_header: Regex::new(r"^\+\+\+ (\S+)(\s.*)?$").expect("file header pattern"),
            hunk_numbers: Regex::new(r"^@@ -([0-9]+),[0-9]+ \+([0-9]+),[0-9]+ @@")
                .expect("hunk numbers pattern"),
            hunk_anchor: Regex::new(r"^@@ .+ @@\s+(\S+\s[^\s(]*)").expect("hunk anchor pattern"),
            meta: Regex::new(
                r"(?i)^(index|===|RCS|new file mode|deleted file mode|similarity|rename|copy|retrieving|diff|---\s|--\s|\+\+\+\s|@@\s)",
            )
            .expect("meta pattern"),
            meta_old: Regex::new(r"^(rename from|copy from|deleted file)").expect("old pattern"),
            meta_new: Regex::new(r"^(rename to|copy to)").expect("new pattern"),
            no_newline: Regex::new(r"(?i)No newline at end of file").expect("no-newline pattern"),
            comment_syntax: Regex::new(r"^.\s*//|^.\s*/\*[* ]|^.\s+\*|^.\s*#")
                .expect("comment syntax pattern"),
        }
    }

    /// Classify one line by walking the rule table.
    pub(crate) fn classify(&self, line: &str) -> Classification {
        for (_, rule) in RULES {
            if let Some(class) = rule(self, line) {
                return class;
            }
        }
        Classification::Context
    }

    /// Whether an added/removed line's content starts with a source-comment
    /// token (`//`, `/*`, a `*` continuation, `#`), prefix included.
    pub(crate) fn is_comment_syntax(&self, line: &str) -> bool {
        self.comment_syntax.is_match(line)
    }
}

/// The shared rule set, compiled once per process.
pub(crate) fn rules() -> &'static LineRules {
    static RULES: OnceLock<LineRules> = OnceLock::new();
    RULES.get_or_init(LineRules::new)
}

/// Strip every character outside `[A-Za-z_-]`, yielding a stable anchor id.
pub(crate) fn anchor_id(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_' || *c == '-')
        .collect()
}

fn file_header(rules: &LineRules, line: &str) -> Option<Classification> {
    let captures = rules.file_header.captures(line)?;
    Some(Classification::FileHeader {
        path: captures[1].to_string(),
    })
}

fn hunk_header(rules: &LineRules, line: &str) -> Option<Classification> {
    let captures = rules.hunk_numbers.captures(line)?;
    let anchor = rules
        .hunk_anchor
        .captures(line)
        .map(|c| anchor_id(&c[1]))
        .unwrap_or_default();
    Some(Classification::HunkHeader {
        old_start: captures[1].parse().ok(),
        new_start: captures[2].parse().ok(),
        anchor,
    })
}

fn meta(rules: &LineRules, line: &str) -> Option<Classification> {
    if !rules.meta.is_match(line) {
        return None;
    }
    // Renames and copies are easy to miss; tag them for emphasis.
    let emphasis = if rules.meta_old.is_match(line) {
        Some(MetaEmphasis::Old)
    } else if rules.meta_new.is_match(line) {
        Some(MetaEmphasis::New)
    } else {
        None
    };
    Some(Classification::Meta { emphasis })
}

fn removed(_rules: &LineRules, line: &str) -> Option<Classification> {
    (line.starts_with('-') && line != "---" && line != "--").then_some(Classification::Removed)
}

fn added(_rules: &LineRules, line: &str) -> Option<Classification> {
    (line.starts_with('+') && !line.starts_with("+++")).then_some(Classification::Added)
}

fn blank(_rules: &LineRules, line: &str) -> Option<Classification> {
    line.is_empty().then_some(Classification::Blank)
}

fn hunk_end(_rules: &LineRules, line: &str) -> Option<Classification> {
    (line == "--").then_some(Classification::HunkEnd)
}

fn no_newline(rules: &LineRules, line: &str) -> Option<Classification> {
    rules.no_newline.is_match(line).then_some(Classification::NoNewline)
}
