//! Headless front end for the patch-review engine.
//!
//! Plays the role the page glue plays in a browser: it fetches the raw diff
//! (from a file or stdin), opens a review session, and either prints the
//! summary a reviewer would see (diffstat + jump menu), dumps the rendered
//! line markup, or replays an annotation script and prints the paste block.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use patch_review::{line_markup, PatchSource, Reviewer, ReviewSession, SourceError};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

mod script;

use script::AnnotationScript;

/// Review a unified diff without a browser.
#[derive(Debug, Parser)]
#[command(name = "patch-review", version, about)]
struct Cli {
    /// Path to a .patch/.diff/.txt file, or `-` for stdin.
    patch: PathBuf,

    /// Replay a JSON annotation script and print the export block.
    #[arg(long, value_name = "FILE")]
    annotate: Option<PathBuf>,

    /// Dump per-line HTML markup instead of the summary.
    #[arg(long)]
    html: bool,
}

/// Fetches the raw diff from a file path or stdin.
struct FileSource {
    path: PathBuf,
}

#[async_trait]
impl PatchSource for FileSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let raw = if self.path.as_os_str() == "-" {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(|e| SourceError::FetchFailed(e.to_string()))?;
            buffer
        } else {
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| SourceError::FetchFailed(format!("{}: {e}", self.path.display())))?
        };
        if raw.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(raw)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let source = FileSource {
        path: cli.patch.clone(),
    };
    let mut reviewer = Reviewer::new();
    let session = reviewer
        .open(&source)
        .await
        .with_context(|| format!("cannot review {}", cli.patch.display()))?;

    if cli.html {
        print_html(session);
        return Ok(());
    }

    if let Some(script_path) = cli.annotate {
        let json = tokio::fs::read_to_string(&script_path)
            .await
            .with_context(|| format!("cannot read script {}", script_path.display()))?;
        let script = AnnotationScript::from_json(&json)
            .with_context(|| format!("invalid script {}", script_path.display()))?;
        match script::replay(session, &script) {
            Some(block) => println!("{block}"),
            None => log::warn!("script produced no comments; nothing to export"),
        }
        return Ok(());
    }

    print_summary(session);
    Ok(())
}

/// The reviewer's overview: diffstat trailer plus the jump menu.
fn print_summary(session: &ReviewSession) {
    println!("{}", session.stat().summary());
    for entry in session.menu() {
        println!("{} (#{})", entry.file.path, entry.file.id);
        for hunk in &entry.hunks {
            println!("  {} (#{})", hunk.header, hunk.id);
        }
    }
}

/// The page collaborator's view: one table row per line, gutter included.
fn print_html(session: &ReviewSession) {
    let gutter = session.gutter();
    log::debug!("gutter widths: old={}, new={}", gutter.old, gutter.new);
    for line in &session.document().lines {
        let classes = session.line_classes(line.index).join(" ");
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(" class=\"{classes}\"")
        };
        let old = line.old_line.map(|n| n.to_string()).unwrap_or_default();
        let new = line.new_line.map(|n| n.to_string()).unwrap_or_default();
        println!(
            "<tr{class_attr}><td class=\"ln\" data-line-number=\"{old}\"></td>\
             <td class=\"ln\" data-line-number=\"{new}\"></td>\
             <td><span class=\"pre\">{}</span></td></tr>",
            line_markup(session.document(), line)
        );
    }
}
