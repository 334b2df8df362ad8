//! # tdpack List Command
//!
//! File: cli/src/commands/project/list.rs
//!
//! ## Overview
//!
//! Implements `tdpack list`: print every entry of an archive as its headers
//! declare it. Nothing is written to disk, so this also works on archives that
//! `unpack` would refuse (links, escaping names), which makes it the tool for
//! finding out *why* an archive was refused.
//!
//! ## Examples
//!
//! ```bash
//! tdpack list daily-etl.tar.gz
//! ```
//!
//! Example output:
//!
//! ```text
//! Kind     |       Size | Mode | Path
//! ---------+------------+------+--------------------------------
//! file     |         21 | 0644 | main.dig
//! dir      |          0 | 0755 | queries
//! file     |          8 | 0644 | queries/q.sql
//!
//! 3 entr(ies).
//! ```
//!
use crate::common::archive::inspect::{list_entries, EntrySummary};
use crate::common::fs::io::read_file_bytes;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// # List Arguments (`ListArgs`)
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// The tar.gz archive to inspect.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

/// # Handle List Command (`handle_list`)
///
/// The configured entry cap bounds the listing, as it bounds `unpack`.
pub async fn handle_list(args: ListArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling list command for {}", args.archive.display());

    let cfg = config::load_config(None, config_path)
        .context("Failed to load tdpack configuration")?;
    let limits = cfg.packaging_limits();
    debug!("Listing with entry cap {}", limits.max_entry_count);

    let bytes = read_file_bytes(&args.archive)?;
    let entries = list_entries(&bytes, &limits)
        .with_context(|| format!("Failed to read archive {}", args.archive.display()))?;

    print!("{}", render_table(&entries));
    Ok(())
}

fn render_table(entries: &[EntrySummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} | {:>10} | Mode | Path\n", "Kind", "Size"));
    out.push_str(&format!("{}+{}+------+{}\n", "-".repeat(9), "-".repeat(12), "-".repeat(32)));
    for entry in entries {
        out.push_str(&format!(
            "{:<8} | {:>10} | {:04o} | {}\n",
            entry.kind.to_string(),
            entry.size,
            entry.mode & 0o7777,
            entry.path.display()
        ));
    }
    out.push_str(&format!("\n{} entr(ies).\n", entries.len()));
    out
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::inspect::EntryKind;

    #[test]
    fn test_render_table_rows() {
        let entries = vec![
            EntrySummary {
                path: PathBuf::from("queries"),
                kind: EntryKind::Directory,
                size: 0,
                mode: 0o755,
            },
            EntrySummary {
                path: PathBuf::from("queries/q.sql"),
                kind: EntryKind::File,
                size: 8,
                mode: 0o644,
            },
        ];

        let table = render_table(&entries);
        assert!(table.contains("dir      |          0 | 0755 | queries\n"));
        assert!(table.contains("file     |          8 | 0644 | queries/q.sql\n"));
        assert!(table.ends_with("2 entr(ies).\n"));
    }

    #[test]
    fn test_render_table_shows_links() {
        let entries = vec![EntrySummary {
            path: PathBuf::from("evil"),
            kind: EntryKind::Symlink,
            size: 0,
            mode: 0o777,
        }];
        assert!(render_table(&entries).contains("symlink  |"));
    }
}
