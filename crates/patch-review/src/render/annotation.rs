//! Serialize saved comments into the paste-ready review block.

use crate::model::{Comment, CommentStore, DiffDocument, DiffLine};

/// Render every live comment, sorted by document position, into one text
/// block ready for pasting into the page's comment form.
///
/// Each comment's block reconstructs the file and hunk context of its first
/// line, then walks the referenced lines in document order, re-emitting
/// headers only where the enclosing file or hunk changes and a `...`
/// separator between disjoint runs. With two or more comments the blocks are
/// wrapped in ordered-list markup.
///
/// This is a pure function; consuming (clearing) the store afterwards is the
/// session's job.
pub fn render_comments(document: &DiffDocument, store: &CommentStore) -> String {
    let mut blocks = Vec::new();
    for comment in store.sorted_by_position() {
        // Comments whose lines are all invalid are skipped, not emitted empty.
        if let Some(block) = comment_block(document, comment) {
            blocks.push(block);
        }
    }

    match blocks.len() {
        0 => String::new(),
        1 => blocks.remove(0),
        _ => {
            let mut out = String::from("<ol>\n\n");
            for block in &blocks {
                out.push_str("<li>\n");
                out.push_str(block);
                out.push_str("\n</li>\n\n");
            }
            out.push_str("</ol>");
            out
        }
    }
}

fn comment_block(document: &DiffDocument, comment: &Comment) -> Option<String> {
    let lines: Vec<&DiffLine> = comment
        .lines
        .iter()
        .filter_map(|&index| document.line(index))
        .collect();
    let first = *lines.first()?;

    let mut out = String::from("<code>\n");

    // Open with the context of the first referenced line.
    let mut current_file = document.file_of_line(first.index);
    let mut current_hunk = document.hunk_of_line(first.index);
    if let Some(file) = current_file {
        out.push_str(&document.lines[document.files[file].first_line].text);
        out.push('\n');
    }
    if let Some(hunk) = current_hunk {
        out.push_str(&document.hunks[hunk].header);
        out.push('\n');
    }

    let mut previous: Option<usize> = None;
    for line in &lines {
        let file = document.file_of_line(line.index);
        let mut file_header_emitted = false;
        // The comment spans into another file.
        if file != current_file {
            current_file = file;
            if let Some(file) = file {
                out.push('\n');
                out.push_str(&document.lines[document.files[file].first_line].text);
                out.push('\n');
                file_header_emitted = true;
            }
        }
        let hunk = document.hunk_of_line(line.index);
        if hunk != current_hunk {
            // The comment spans into another hunk. Only add the blank line
            // if a file header was not just emitted.
            current_hunk = hunk;
            if let Some(hunk) = hunk {
                if !file_header_emitted {
                    out.push('\n');
                }
                out.push_str(&document.hunks[hunk].header);
                out.push('\n');
            }
        } else if previous.is_some_and(|p| line.index != p + 1) {
            // A new disjoint run within the same context.
            out.push_str("...\n");
        }
        out.push_str(&line.visible_text());
        out.push('\n');
        previous = Some(line.index);
    }

    out.push_str("</code>\n\n");
    out.push_str(&comment.text);
    Some(out)
}
