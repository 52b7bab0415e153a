//! Document data structures representing a parsed unified diff.

/// A complete parsed diff for one review session.
///
/// Built once per session by [`crate::parser::parse`] and never mutated
/// line-by-line afterwards; a new review session replaces the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffDocument {
    /// All physical lines of the diff, in input order.
    pub lines: Vec<DiffLine>,
    /// File header index, in document order.
    pub files: Vec<FileEntry>,
    /// Hunk header index, in document order.
    pub hunks: Vec<HunkEntry>,
    /// Aggregate statistics.
    pub stat: DiffStat,
    /// Maximum rendered widths of the two line-number columns.
    pub gutter: GutterWidths,
}

impl DiffDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            files: Vec::new(),
            hunks: Vec::new(),
            stat: DiffStat::default(),
            gutter: GutterWidths::default(),
        }
    }

    /// Number of lines in the document.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by document position.
    pub fn line(&self, index: usize) -> Option<&DiffLine> {
        self.lines.get(index)
    }

    /// Index into `files` of the nearest file header at or before `index`.
    pub fn file_of_line(&self, index: usize) -> Option<usize> {
        nearest_preceding(self.files.iter().map(|f| f.first_line), index)
    }

    /// Index into `hunks` of the nearest hunk header at or before `index`.
    ///
    /// A file header between the hunk and `index` ends the hunk's reach:
    /// lines of a new file are not attributed to the previous file's hunk.
    pub fn hunk_of_line(&self, index: usize) -> Option<usize> {
        let hunk = nearest_preceding(self.hunks.iter().map(|h| h.first_line), index)?;
        if let Some(file) = self.file_of_line(index) {
            if self.files[file].first_line > self.hunks[hunk].first_line {
                return None;
            }
        }
        Some(hunk)
    }
}

impl Default for DiffDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the last entry starting at or before `index`, over an
/// ascending sequence of start positions.
fn nearest_preceding(starts: impl Iterator<Item = usize>, index: usize) -> Option<usize> {
    let mut found = None;
    for (i, start) in starts.enumerate() {
        if start > index {
            break;
        }
        found = Some(i);
    }
    found
}

/// One file header (`+++ <path>`) registered in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Stable anchor id derived from the path (characters outside
    /// `[A-Za-z_-]` stripped).
    pub id: String,
    /// The path as written in the header.
    pub path: String,
    /// Document position of the header line.
    pub first_line: usize,
}

/// One hunk header (`@@ -a,b +c,d @@ context`) registered in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkEntry {
    /// Anchor id derived from the trailing context; empty when the header
    /// carries none.
    pub id: String,
    /// The full header line text.
    pub header: String,
    /// Document position of the header line.
    pub first_line: usize,
    /// Index into `DiffDocument::files` of the enclosing file, if any.
    pub file: Option<usize>,
}

/// Aggregate counts across the whole diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStat {
    /// Number of file headers.
    pub files: usize,
    /// Number of added lines.
    pub insertions: usize,
    /// Number of removed lines.
    pub deletions: usize,
}

impl DiffStat {
    /// Render in the conventional `git diff --stat` trailer form.
    pub fn summary(&self) -> String {
        format!(
            "{} files changed, {} insertions(+), {} deletions(-)",
            self.files, self.insertions, self.deletions
        )
    }
}

/// Maximum rendered widths (in characters) of the old and new line-number
/// columns, for sizing a fixed-width gutter ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GutterWidths {
    /// Width of the old-line column.
    pub old: usize,
    /// Width of the new-line column.
    pub new: usize,
}

impl GutterWidths {
    /// Widen the columns to fit the given displayed counters.
    pub fn fit(&mut self, old_line: Option<u32>, new_line: Option<u32>) {
        if let Some(n) = old_line {
            self.old = self.old.max(digits(n));
        }
        if let Some(n) = new_line {
            self.new = self.new.max(digits(n));
        }
    }
}

fn digits(n: u32) -> usize {
    n.to_string().len()
}

/// A single line in the diff.
///
/// Owned exclusively by the [`DiffDocument`]; selections and comments refer
/// to lines by their `index`, never by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Document position (0-based).
    pub index: usize,
    /// Displayed old-file line number (Context and Removed lines).
    pub old_line: Option<u32>,
    /// Displayed new-file line number (Context and Added lines).
    pub new_line: Option<u32>,
    /// Line classification.
    pub kind: LineKind,
    /// Raw line text, prefix included, line endings normalized.
    pub text: String,
    /// Cosmetic annotations for the rendering front end.
    pub flags: LineFlags,
    /// Display emphasis for rename/copy source and destination meta lines.
    pub emphasis: Option<MetaEmphasis>,
}

impl DiffLine {
    /// Create a line with no counters and default flags.
    pub fn new(index: usize, kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            index,
            old_line: None,
            new_line: None,
            kind,
            text: text.into(),
            flags: LineFlags::default(),
            emphasis: None,
        }
    }

    /// The text as it appears in a pasted review block: verbatim, with the
    /// end-of-line marker appended on lines flagged for trailing whitespace.
    pub fn visible_text(&self) -> String {
        if self.flags.has_trailing_whitespace {
            format!("{}¶", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line (or anything unrecognized; parsing is best-effort).
    Context,
    /// Added line (`+`).
    Added,
    /// Removed line (`-`).
    Removed,
    /// File header (`+++ <path>`).
    FileHeader,
    /// Hunk header (`@@ -a,b +c,d @@`).
    HunkHeader,
    /// Diff plumbing: `index`, `===`, mode changes, rename/copy lines, the
    /// `--` end-of-hunk delimiter, the no-newline marker, and the rest.
    Meta,
}

impl LineKind {
    /// Whether this line is part of the changed code itself.
    pub fn is_code(&self) -> bool {
        matches!(self, LineKind::Context | LineKind::Added | LineKind::Removed)
    }
}

/// Display hint for rename/copy meta lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaEmphasis {
    /// Source side (`rename from`, `copy from`, `deleted file`).
    Old,
    /// Destination side (`rename to`, `copy to`).
    New,
}

/// Cosmetic per-line annotations; presentation hints, not semantic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineFlags {
    /// Added line contains a tab character.
    pub has_tab: bool,
    /// Added line ends in whitespace.
    pub has_trailing_whitespace: bool,
    /// This is a `\ No newline at end of file` marker.
    pub no_newline_at_eof: bool,
    /// Added/Removed line whose content starts with a source-comment token.
    pub is_comment_syntax: bool,
}
