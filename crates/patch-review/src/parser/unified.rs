//! Parse raw unified-diff text into a [`DiffDocument`].
//!
//! Parsing is best-effort: partial, hand-edited, or tool-mangled diffs must
//! still render, so no input is fatal. Unrecognized lines fall open to plain
//! context, and recoverable oddities are reported as diagnostics next to the
//! document instead of aborting.

use crate::model::{DiffDocument, DiffLine, FileEntry, HunkEntry, LineKind};
use crate::parser::rules::{anchor_id, rules, Classification};
use thiserror::Error;

/// Recoverable oddities observed while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDiagnostic {
    /// A hunk header matched but its counters do not fit the counter type;
    /// the line is kept and the counters become unset.
    #[error("line {line}: hunk header counters are out of range")]
    BadHunkHeader { line: usize },
    /// A hunk header appeared before any file header.
    #[error("line {line}: hunk header appears before any file header")]
    OrphanHunk { line: usize },
}

/// Parse raw diff text into a document plus diagnostics.
///
/// Line endings are normalized to `\n` and VCS "unversioned file" / IDE
/// comment noise lines are stripped before classification. The old/new line
/// counters start unset, are set by each hunk header, advance per line kind
/// (a displayed counter is post-incremented), and become unset again at a
/// `--` end-of-hunk delimiter.
pub fn parse(raw_text: &str) -> (DiffDocument, Vec<ParseDiagnostic>) {
    let rules = rules();
    let mut document = DiffDocument::new();
    let mut diagnostics = Vec::new();

    let text = normalize(raw_text);

    let mut old: Option<u32> = None;
    let mut new: Option<u32> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let mut line = DiffLine::new(index, LineKind::Context, raw_line);

        match rules.classify(raw_line) {
            Classification::FileHeader { path } => {
                line.kind = LineKind::FileHeader;
                document.files.push(FileEntry {
                    id: anchor_id(&path),
                    path,
                    first_line: index,
                });
                document.stat.files += 1;
            }
            Classification::HunkHeader {
                old_start,
                new_start,
                anchor,
            } => {
                line.kind = LineKind::HunkHeader;
                match (old_start, new_start) {
                    (Some(o), Some(n)) => {
                        old = Some(o);
                        new = Some(n);
                    }
                    _ => {
                        diagnostics.push(ParseDiagnostic::BadHunkHeader { line: index });
                        old = None;
                        new = None;
                    }
                }
                if document.files.is_empty() {
                    diagnostics.push(ParseDiagnostic::OrphanHunk { line: index });
                }
                document.hunks.push(HunkEntry {
                    id: anchor,
                    header: raw_line.to_string(),
                    first_line: index,
                    file: document.files.len().checked_sub(1),
                });
            }
            Classification::Meta { emphasis } => {
                line.kind = LineKind::Meta;
                line.emphasis = emphasis;
            }
            Classification::Removed => {
                line.kind = LineKind::Removed;
                document.stat.deletions += 1;
                line.flags.is_comment_syntax = rules.is_comment_syntax(raw_line);
                if let Some(o) = old {
                    line.old_line = Some(o);
                    old = Some(o.saturating_add(1));
                }
            }
            Classification::Added => {
                line.kind = LineKind::Added;
                document.stat.insertions += 1;
                line.flags.is_comment_syntax = rules.is_comment_syntax(raw_line);
                line.flags.has_tab = raw_line.contains('\t');
                line.flags.has_trailing_whitespace =
                    raw_line.ends_with(char::is_whitespace) && !raw_line.trim_end().is_empty();
                if let Some(n) = new {
                    line.new_line = Some(n);
                    new = Some(n.saturating_add(1));
                }
            }
            Classification::Blank | Classification::Context => {
                if let Some(o) = old {
                    line.old_line = Some(o);
                    old = Some(o.saturating_add(1));
                }
                if let Some(n) = new {
                    line.new_line = Some(n);
                    new = Some(n.saturating_add(1));
                }
            }
            Classification::HunkEnd => {
                line.kind = LineKind::Meta;
                old = None;
                new = None;
            }
            Classification::NoNewline => {
                line.kind = LineKind::Meta;
                line.flags.no_newline_at_eof = true;
            }
        }

        document.gutter.fit(line.old_line, line.new_line);
        document.lines.push(line);
    }

    log::debug!(
        "parsed diff: {} lines, {}, {} diagnostics",
        document.lines.len(),
        document.stat.summary(),
        diagnostics.len()
    );

    (document, diagnostics)
}

/// Normalize line endings (CRLF and CR to LF) and strip VCS "unversioned
/// file" (`? path`) and IDE comment (`# note`) noise lines.
fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    for line in unified.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        if noise(body) {
            continue;
        }
        out.push_str(line);
    }
    out
}

fn noise(line: &str) -> bool {
    (line.starts_with("# ") || line.starts_with("? ")) && line.len() > 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetaEmphasis;

    const SAMPLE_DIFF: &str = "\
diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,4 +1,5 @@ fn main()
 fn main() {
-    println!(\"Hello\");
+    println!(\"Hello\");
+    println!(\"World\");
 }
";

    fn parse_lines(text: &str) -> DiffDocument {
        let (document, diagnostics) = parse(text);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        document
    }

    #[test]
    fn test_counters_context_run() {
        // Five unmodified lines after the hunk header walk both counters in
        // lockstep from their respective starts.
        let text = "@@ -10,5 +20,5 @@\n a\n b\n c\n d\n e";
        let (document, diagnostics) = parse(text);
        assert_eq!(diagnostics, vec![ParseDiagnostic::OrphanHunk { line: 0 }]);

        let old: Vec<_> = document.lines[1..].iter().map(|l| l.old_line).collect();
        let new: Vec<_> = document.lines[1..].iter().map(|l| l.new_line).collect();
        assert_eq!(old, [Some(10), Some(11), Some(12), Some(13), Some(14)]);
        assert_eq!(new, [Some(20), Some(21), Some(22), Some(23), Some(24)]);
    }

    #[test]
    fn test_counters_added_and_removed() {
        let text = "+++ f\n@@ -10,2 +20,2 @@\n ctx\n-gone\n+here\n ctx2";
        let document = parse_lines(text);

        let ctx = &document.lines[2];
        assert_eq!((ctx.old_line, ctx.new_line), (Some(10), Some(20)));

        // A removed line consumes only the old counter.
        let removed = &document.lines[3];
        assert_eq!(removed.kind, LineKind::Removed);
        assert_eq!((removed.old_line, removed.new_line), (Some(11), None));

        // An added line consumes only the new counter.
        let added = &document.lines[4];
        assert_eq!(added.kind, LineKind::Added);
        assert_eq!((added.old_line, added.new_line), (None, Some(21)));

        // A context line advances both.
        let ctx2 = &document.lines[5];
        assert_eq!((ctx2.old_line, ctx2.new_line), (Some(12), Some(22)));
    }

    #[test]
    fn test_counters_unset_before_first_hunk() {
        let document = parse_lines("+++ f\n context before any hunk\n-removed");
        assert_eq!(document.lines[1].old_line, None);
        assert_eq!(document.lines[1].new_line, None);
        assert_eq!(document.lines[2].old_line, None);
    }

    #[test]
    fn test_hunk_end_delimiter_resets_counters() {
        let text = "+++ f\n@@ -1,2 +1,2 @@\n a\n--\n b";
        let document = parse_lines(text);
        assert_eq!(document.lines[3].kind, LineKind::Meta);
        // After `--`, counters are unset until the next hunk header.
        assert_eq!(document.lines[4].old_line, None);
        assert_eq!(document.lines[4].new_line, None);
    }

    #[test]
    fn test_diffstat() {
        let document = parse_lines(SAMPLE_DIFF);
        assert_eq!(document.stat.files, 1);
        assert_eq!(document.stat.insertions, 2);
        assert_eq!(document.stat.deletions, 1);
        assert_eq!(document.files.len(), 1);
        assert_eq!(document.files[0].path, "b/src/main.rs");
        assert_eq!(document.files[0].id, "bsrcmainrs");
        assert_eq!(document.hunks.len(), 1);
        assert_eq!(document.hunks[0].file, Some(0));
        assert_eq!(document.hunks[0].id, "fnmain");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let (first, _) = parse(SAMPLE_DIFF);
        let (second, _) = parse(SAMPLE_DIFF);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_normalization() {
        let document = parse_lines("+++ f\r\n@@ -1,1 +1,1 @@\r\n ctx\r\n");
        assert_eq!(document.lines.len(), 3);
        assert_eq!(document.lines[2].text, " ctx");
    }

    #[test]
    fn test_noise_lines_are_stripped() {
        let document = parse_lines("? unversioned.txt\n+++ f\n# vim: noet\n@@ -1,1 +1,1 @@\n x");
        assert_eq!(document.lines.len(), 3);
        assert_eq!(document.lines[0].kind, LineKind::FileHeader);
        // A trailing noise line without a final newline is stripped too.
        let document = parse_lines("+++ f\n? other.txt");
        assert_eq!(document.lines.len(), 1);
    }

    #[test]
    fn test_blank_line_advances_both_counters() {
        let text = "+++ f\n@@ -5,3 +6,3 @@\n a\n\n b";
        let document = parse_lines(text);
        let blank = &document.lines[3];
        assert_eq!(blank.kind, LineKind::Context);
        assert_eq!(blank.text, "");
        assert_eq!((blank.old_line, blank.new_line), (Some(6), Some(7)));
        let after = &document.lines[4];
        assert_eq!((after.old_line, after.new_line), (Some(7), Some(8)));
    }

    #[test]
    fn test_no_newline_marker_is_flagged_meta() {
        let text = "+++ f\n@@ -1,1 +1,1 @@\n a\n\\ No newline at end of file\n b";
        let document = parse_lines(text);
        let marker = &document.lines[3];
        assert_eq!(marker.kind, LineKind::Meta);
        assert!(marker.flags.no_newline_at_eof);
        assert_eq!(marker.old_line, None);
        // The marker does not advance the counters.
        let after = &document.lines[4];
        assert_eq!((after.old_line, after.new_line), (Some(2), Some(2)));
    }

    #[test]
    fn test_added_line_whitespace_flags() {
        let text = "+++ f\n@@ -1,1 +1,1 @@\n+\tindented\n+trailing  \n+clean";
        let document = parse_lines(text);
        assert!(document.lines[2].flags.has_tab);
        assert!(!document.lines[2].flags.has_trailing_whitespace);
        assert!(document.lines[3].flags.has_trailing_whitespace);
        assert!(!document.lines[4].flags.has_tab);
        assert!(!document.lines[4].flags.has_trailing_whitespace);
    }

    #[test]
    fn test_comment_syntax_flag_only_on_code_lines() {
        let text = "+++ f\n@@ -1,2 +1,2 @@\n+// new comment\n-# old comment\n # context comment";
        let document = parse_lines(text);
        assert!(document.lines[2].flags.is_comment_syntax);
        assert!(document.lines[3].flags.is_comment_syntax);
        // Context lines never carry the flag.
        assert!(!document.lines[4].flags.is_comment_syntax);
    }

    #[test]
    fn test_rename_emphasis_recorded() {
        let text = "rename from a.rs\nrename to b.rs\n+++ b.rs";
        let document = parse_lines(text);
        assert_eq!(document.lines[0].emphasis, Some(MetaEmphasis::Old));
        assert_eq!(document.lines[1].emphasis, Some(MetaEmphasis::New));
        assert_eq!(document.lines[2].emphasis, None);
    }

    #[test]
    fn test_gutter_tracks_maximum_widths() {
        let text = "+++ f\n@@ -998,3 +7,3 @@\n a\n b\n c";
        let document = parse_lines(text);
        // Old runs 998..=1000 (4 digits at the end), new runs 7..=9.
        assert_eq!(document.gutter.old, 4);
        assert_eq!(document.gutter.new, 1);
    }

    #[test]
    fn test_multiple_files_and_hunks() {
        let text = "\
+++ a.txt
@@ -1,1 +1,1 @@
 x
+++ b.txt
@@ -5,1 +5,1 @@ fn b
 y";
        let document = parse_lines(text);
        assert_eq!(document.stat.files, 2);
        assert_eq!(document.hunks[0].file, Some(0));
        assert_eq!(document.hunks[1].file, Some(1));
        assert_eq!(document.file_of_line(5), Some(1));
        assert_eq!(document.hunk_of_line(5), Some(1));
    }

    #[test]
    fn test_empty_input_yields_empty_document() {
        let (document, diagnostics) = parse("");
        assert!(document.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bad_hunk_counters_reported_and_unset() {
        let text = "+++ f\n@@ -99999999999,1 +1,1 @@\n x";
        let (document, diagnostics) = parse(text);
        assert_eq!(
            diagnostics,
            vec![ParseDiagnostic::BadHunkHeader { line: 1 }]
        );
        assert_eq!(document.lines[2].old_line, None);
        assert_eq!(document.lines[2].new_line, None);
    }
}
