//! `lazypad convert` - convert between the nested and flat forms.

use crate::cli::common::ExitCode;
use crate::parser::{flat, nested};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Target form of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetForm {
    /// The human-readable nested form (input is the flat form)
    Nested,
    /// The ID-indexed on-device storage form (input is the nested form)
    Flat,
}

/// Arguments for the `convert` command.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Target form
    #[arg(long, value_enum)]
    pub to: TargetForm,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

/// Converts `--file` into the requested form at `--output`.
pub fn run(args: &ConvertArgs) -> Result<ExitCode> {
    match args.to {
        TargetForm::Flat => {
            let tree = nested::load(&args.file)?;
            let flat = flat::flatten(&tree);
            fs::write(&args.output, serde_json::to_string_pretty(&flat)?)
                .with_context(|| format!("Failed to write {}", args.output.display()))?;
        }
        TargetForm::Nested => {
            let raw = fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
            let tree = flat::restore(&value)
                .with_context(|| format!("{} is not a valid flat tree", args.file.display()))?;
            nested::save(&tree, &args.output)?;
        }
    }
    println!("Wrote {}", args.output.display());
    Ok(ExitCode::Success)
}
