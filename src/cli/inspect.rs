//! `lazypad inspect` - summarize a macro tree file.

use crate::cli::common::ExitCode;
use crate::models::{grid, Key, MacroTree};
use crate::parser::nested;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the `inspect` command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Macro tree file in the nested JSON form
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Default)]
struct TreeStats {
    macros: usize,
    groups: usize,
    blanks: usize,
    max_depth: usize,
}

fn collect_stats(content: &[Key], depth: usize, stats: &mut TreeStats) {
    stats.max_depth = stats.max_depth.max(depth);
    for key in content {
        match key {
            Key::Blank => stats.blanks += 1,
            Key::Macro(_) => stats.macros += 1,
            Key::Group(group) => {
                stats.groups += 1;
                collect_stats(&group.content, depth + 1, stats);
            }
        }
    }
}

fn print_outline(content: &[Key], indent: usize) {
    for key in content {
        match key {
            Key::Blank => {}
            Key::Macro(macro_key) => println!(
                "{}{}  {}  ({} actions)",
                "  ".repeat(indent),
                macro_key.label,
                macro_key.color,
                macro_key.content.len()
            ),
            Key::Group(group) => {
                println!(
                    "{}{}/  {}  ({} pages)",
                    "  ".repeat(indent),
                    group.label,
                    group.color,
                    grid::pages(group.content.len())
                );
                print_outline(&group.content, indent + 1);
            }
        }
    }
}

/// Prints a summary of the tree in `--file`.
pub fn run(args: &InspectArgs) -> Result<ExitCode> {
    let tree: MacroTree = nested::load(&args.file)?;

    let mut stats = TreeStats::default();
    collect_stats(&tree.content, 1, &mut stats);

    if args.json {
        let summary = json!({
            "label": tree.label,
            "pages": grid::pages(tree.content.len()),
            "depth": stats.max_depth,
            "keys": {
                "macro": stats.macros,
                "group": stats.groups,
                "blank": stats.blanks,
            },
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(ExitCode::Success);
    }

    println!(
        "{}: {} pages, {} macros, {} groups, {} blank keys, depth {}",
        tree.label,
        grid::pages(tree.content.len()),
        stats.macros,
        stats.groups,
        stats.blanks,
        stats.max_depth
    );
    print_outline(&tree.content, 1);
    Ok(ExitCode::Success)
}
