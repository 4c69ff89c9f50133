//! Vocabulary database for macro identifiers.
//!
//! The device resolves keycodes, consumer-control codes, and system
//! functions by name from fixed vocabularies. The database is embedded in
//! the binary at compile time and loaded lazily on first access.
//!
//! Unknown identifiers are deliberately *not* decode errors: the device
//! ignores what it does not know, and the structural codec stays agnostic
//! of payload semantics. Lookups here feed warnings only.

use crate::models::{EncoderActions, Key, MacroTree, MacroValue};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;

/// Database schema of vocab.json.
#[derive(Debug, Deserialize)]
struct VocabDatabase {
    #[allow(dead_code)]
    version: String,
    keycodes: Vec<String>,
    consumer_codes: Vec<String>,
    system_functions: Vec<String>,
}

/// The fixed identifier vocabularies with O(1) lookup.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    keycodes: HashSet<String>,
    consumer_codes: HashSet<String>,
    system_functions: HashSet<String>,
}

impl Vocabulary {
    /// Loads the vocabulary from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("vocab.json");
        let db: VocabDatabase =
            serde_json::from_str(json_data).context("Failed to parse embedded vocab.json")?;

        Ok(Self {
            keycodes: db.keycodes.into_iter().collect(),
            consumer_codes: db.consumer_codes.into_iter().collect(),
            system_functions: db.system_functions.into_iter().collect(),
        })
    }

    /// Checks a keycode name, accepting the `-` release prefix.
    #[must_use]
    pub fn is_keycode(&self, name: &str) -> bool {
        let name = name.strip_prefix('-').unwrap_or(name);
        self.keycodes.contains(name)
    }

    /// Checks a consumer-control code name.
    #[must_use]
    pub fn is_consumer_code(&self, name: &str) -> bool {
        self.consumer_codes.contains(name)
    }

    /// Checks a system function name.
    #[must_use]
    pub fn is_system_function(&self, name: &str) -> bool {
        self.system_functions.contains(name)
    }

    /// Returns a warning for a value whose identifier is unknown, `None`
    /// when the value is fine.
    #[must_use]
    pub fn check_value(&self, value: &MacroValue) -> Option<String> {
        match value {
            MacroValue::Keycode(kc) if !self.is_keycode(kc) => {
                Some(format!("unknown keycode '{kc}'"))
            }
            MacroValue::Consumer(ccc) if !self.is_consumer_code(ccc) => {
                Some(format!("unknown consumer code '{ccc}'"))
            }
            MacroValue::System(sys) if !self.is_system_function(sys) => {
                Some(format!("unknown system function '{sys}'"))
            }
            _ => None,
        }
    }

    /// Walks a whole tree and collects identifier warnings, with the key
    /// label each one belongs to.
    #[must_use]
    pub fn check_tree(&self, tree: &MacroTree) -> Vec<String> {
        let mut warnings = Vec::new();
        self.check_encoder(&tree.label, &tree.encoder, &mut warnings);
        for key in &tree.content {
            self.check_key(key, &mut warnings);
        }
        warnings
    }

    fn check_key(&self, key: &Key, warnings: &mut Vec<String>) {
        match key {
            Key::Blank => {}
            Key::Macro(macro_key) => {
                for value in &macro_key.content {
                    if let Some(warning) = self.check_value(value) {
                        warnings.push(format!("key '{}': {warning}", macro_key.label));
                    }
                }
            }
            Key::Group(group) => {
                self.check_encoder(&group.label, &group.encoder, warnings);
                for child in &group.content {
                    self.check_key(child, warnings);
                }
            }
        }
    }

    fn check_encoder(&self, label: &str, encoder: &EncoderActions, warnings: &mut Vec<String>) {
        for values in [&encoder.switch, &encoder.increased, &encoder.decreased] {
            for value in values {
                if let Some(warning) = self.check_value(value) {
                    warnings.push(format!("encoder of '{label}': {warning}"));
                }
            }
        }
    }
}
