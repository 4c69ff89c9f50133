//! The nested JSON form of a macro tree.
//!
//! This is the canonical, human-readable form: exactly the in-memory data
//! model. It is used for file save/load, the local store cache, and the
//! `set_macros` payload. A structurally invalid input yields an error and
//! no partial tree.

use crate::models::{grid, MacroTree};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parses a tree from its nested JSON form.
///
/// The tree is validated and every group is padded to a full chunk before
/// it is returned.
///
/// # Errors
///
/// Returns an error on malformed JSON or label-rule violations; the caller
/// keeps its current tree in that case.
pub fn from_json(json: &str) -> Result<MacroTree> {
    let tree = serde_json::from_str(json).context("Failed to parse macro tree JSON")?;
    check_and_normalize(tree)
}

/// Like [`from_json`], for a tree already parsed into a JSON value (e.g.
/// the `CONTENT` of a transport frame).
pub fn from_value(value: serde_json::Value) -> Result<MacroTree> {
    let tree = serde_json::from_value(value).context("Failed to decode macro tree")?;
    check_and_normalize(tree)
}

fn check_and_normalize(mut tree: MacroTree) -> Result<MacroTree> {
    tree.validate()?;
    grid::normalize_tree(&mut tree);
    Ok(tree)
}

/// Encodes a tree into its canonical (compact) nested JSON form.
pub fn to_json(tree: &MacroTree) -> Result<String> {
    serde_json::to_string(tree).context("Failed to encode macro tree")
}

/// Encodes a tree into pretty-printed nested JSON, for files a human edits.
pub fn to_json_pretty(tree: &MacroTree) -> Result<String> {
    serde_json::to_string_pretty(tree).context("Failed to encode macro tree")
}

/// Loads a tree from a nested JSON file.
pub fn load(path: &Path) -> Result<MacroTree> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json(&json).with_context(|| format!("Failed to load macro tree from {}", path.display()))
}

/// Saves a tree to a nested JSON file.
///
/// Writes via a temp file and rename so the target is never left in a
/// corrupted state.
pub fn save(tree: &MacroTree, path: &Path) -> Result<()> {
    let json = to_json_pretty(tree)?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
    Ok(())
}
