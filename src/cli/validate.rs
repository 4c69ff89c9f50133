//! `lazypad validate` - check a macro tree file.
//!
//! Structural problems (malformed JSON, label rules) are errors; unknown
//! vocabulary identifiers are warnings, promoted to failures by
//! `--strict`.

use crate::cli::common::ExitCode;
use crate::parser::nested;
use crate::vocab::Vocabulary;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the `validate` command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Macro tree file in the nested JSON form
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

fn report(args: &ValidateArgs, errors: &[String], warnings: &[String]) -> Result<ExitCode> {
    let failed = !errors.is_empty() || (args.strict && !warnings.is_empty());

    if args.json {
        let result = json!({
            "valid": !failed,
            "errors": errors,
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for error in errors {
            println!("error: {error}");
        }
        for warning in warnings {
            println!("warning: {warning}");
        }
        if failed {
            println!("✗ validation failed");
        } else {
            println!("✓ valid");
        }
    }

    Ok(if failed {
        ExitCode::ValidationFailed
    } else {
        ExitCode::Success
    })
}

/// Validates the tree in `--file`.
pub fn run(args: &ValidateArgs) -> Result<ExitCode> {
    let tree = match nested::load(&args.file) {
        Ok(tree) => tree,
        Err(e) => {
            return report(args, &[format!("{e:#}")], &[]);
        }
    };

    let vocab = Vocabulary::load()?;
    let warnings = vocab.check_tree(&tree);
    report(args, &[], &warnings)
}
