//! The flat, ID-indexed form of a macro tree.
//!
//! This is the storage form the device keeps on its filesystem: a mapping
//! from stringified integer IDs to entries, where every group's content
//! list holds child IDs (or the literal `false` for a blank slot) instead
//! of nested objects. ID 0 is the root; descendants are numbered by
//! pre-order walk starting at 1, so a group's subtree occupies a
//! contiguous ID range before its next sibling.

use crate::models::{EncoderActions, GroupKey, Key, MacroKey, MacroTree, RgbColor};
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Flattens a tree into the ID-indexed storage form.
#[must_use]
pub fn flatten(tree: &MacroTree) -> Value {
    let mut entries = BTreeMap::new();
    let mut next_id = 1_u64;
    let content = flatten_content(&tree.content, &mut entries, &mut next_id);

    entries.insert(
        0,
        json!({
            "label": tree.label,
            "content": content,
            "encoder": tree.encoder,
        }),
    );

    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(id, entry)| (id.to_string(), entry))
        .collect();
    Value::Object(map)
}

fn flatten_content(
    content: &[Key],
    entries: &mut BTreeMap<u64, Value>,
    next_id: &mut u64,
) -> Vec<Value> {
    let mut ids = Vec::with_capacity(content.len());
    for key in content {
        match key {
            Key::Blank => ids.push(Value::Bool(false)),
            Key::Macro(macro_key) => {
                let id = *next_id;
                *next_id += 1;
                entries.insert(
                    id,
                    json!({
                        "type": "macro",
                        "label": macro_key.label,
                        "color": macro_key.color,
                        "content": macro_key.content,
                    }),
                );
                ids.push(json!(id));
            }
            Key::Group(group) => {
                let id = *next_id;
                *next_id += 1;
                let children = flatten_content(&group.content, entries, next_id);
                entries.insert(
                    id,
                    json!({
                        "type": "group",
                        "label": group.label,
                        "color": group.color,
                        "content": children,
                        "encoder": group.encoder,
                    }),
                );
                ids.push(json!(id));
            }
        }
    }
    ids
}

/// Restores a tree from the ID-indexed storage form.
///
/// # Errors
///
/// Returns an error when the root entry is missing, an ID is dangling or
/// referenced twice, or an entry is structurally invalid. No partial tree
/// is returned.
pub fn restore(value: &Value) -> Result<MacroTree> {
    let map = value
        .as_object()
        .context("Flat form must be a JSON object")?;
    let root = map
        .get("0")
        .context("Flat form has no root entry with ID 0")?;
    let root = root.as_object().context("Root entry must be an object")?;

    let label = root
        .get("label")
        .and_then(Value::as_str)
        .context("Root entry has no label")?
        .to_string();
    let encoder = decode_encoder(root)?;

    let mut visited = HashSet::new();
    let content = restore_content(root, map, &mut visited)?;

    Ok(MacroTree {
        label,
        content,
        encoder,
    })
}

fn restore_content(
    entry: &Map<String, Value>,
    map: &Map<String, Value>,
    visited: &mut HashSet<u64>,
) -> Result<Vec<Key>> {
    let list = entry
        .get("content")
        .and_then(Value::as_array)
        .context("Entry has no content list")?;

    let mut content = Vec::with_capacity(list.len());
    for child in list {
        match child {
            Value::Bool(false) => content.push(Key::Blank),
            Value::Number(n) => {
                let id = n
                    .as_u64()
                    .with_context(|| format!("Invalid child ID: {n}"))?;
                content.push(restore_entry(id, map, visited)?);
            }
            other => bail!("Content lists hold IDs or false, got {other}"),
        }
    }
    Ok(content)
}

fn restore_entry(id: u64, map: &Map<String, Value>, visited: &mut HashSet<u64>) -> Result<Key> {
    if id == 0 {
        bail!("ID 0 is reserved for the root");
    }
    if !visited.insert(id) {
        bail!("ID {id} is referenced more than once");
    }

    let entry = map
        .get(&id.to_string())
        .with_context(|| format!("Dangling child ID {id}"))?;
    let entry = entry
        .as_object()
        .with_context(|| format!("Entry {id} must be an object"))?;

    let label = entry
        .get("label")
        .and_then(Value::as_str)
        .with_context(|| format!("Entry {id} has no label"))?
        .to_string();
    let color: RgbColor = entry
        .get("color")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .with_context(|| format!("Entry {id} has an invalid color"))?
        .unwrap_or_default();

    match entry.get("type").and_then(Value::as_str) {
        Some("macro") => {
            let content = entry
                .get("content")
                .cloned()
                .map(serde_json::from_value)
                .transpose()
                .with_context(|| format!("Entry {id} has invalid macro content"))?
                .unwrap_or_default();
            Ok(Key::Macro(MacroKey {
                label,
                color,
                content,
            }))
        }
        Some("group") => {
            let encoder = decode_encoder(entry)?;
            let content = restore_content(entry, map, visited)
                .with_context(|| format!("Failed to restore children of entry {id}"))?;
            Ok(Key::Group(GroupKey {
                label,
                color,
                content,
                encoder,
            }))
        }
        Some(other) => bail!("Entry {id} has unknown type '{other}'"),
        None => bail!("Entry {id} has no type discriminator"),
    }
}

fn decode_encoder(entry: &Map<String, Value>) -> Result<EncoderActions> {
    entry
        .get("encoder")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .context("Invalid encoder payload")
        .map(Option::unwrap_or_default)
}
