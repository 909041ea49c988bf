//! parse command - show what an entry file contains

use super::CommandContext;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use edir_core::{EntryKind, EntryParser};
use std::path::Path;

pub fn execute(ctx: &CommandContext, file: &Path, kind: EntryKind, strict: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read entry file: {}", file.display()))?;
    let report = EntryParser::new(kind).parse(&raw);

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &report.entries {
            println!("{}", entry.dn().bold());
            for (name, values) in entry.attributes() {
                for value in values {
                    println!("  {}: {}", name.cyan(), value);
                }
            }
            println!();
        }

        for rejected in &report.rejected {
            println!(
                "{} block {} ({}): {}",
                "skipped".yellow(),
                rejected.block_number,
                rejected.reason,
                rejected.preview
            );
        }

        if !ctx.quiet {
            println!(
                "{} {} valid, {} invalid",
                kind.plural(),
                report.entries.len(),
                report.rejected.len()
            );
        }
    }

    if strict && !report.is_clean() {
        bail!(
            "{} invalid block(s) in {}",
            report.rejected.len(),
            file.display()
        );
    }

    Ok(())
}
