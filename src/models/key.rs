//! Key and group model.
//!
//! A [`Key`] is one cell of the 3x3 grid: blank, a macro (ordered list of
//! [`MacroValue`]s), or a group nesting another grid. The whole
//! configuration is a [`MacroTree`] whose root behaves like a group labeled
//! "Macros" but carries no `type` discriminator on the wire.
//!
//! # Validation
//!
//! - Labels of non-blank keys are non-empty and at most 6 characters
//! - Blank keys carry no other attributes on the wire
//! - The content tree is strictly a tree (enforced by ownership)

use crate::constants::{LABEL_MAX_LEN, PAGE_SIZE, ROOT_LABEL};
use crate::models::{MacroValue, RgbColor};
use anyhow::{bail, Result};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Key {
    /// An unassigned cell. Carries no further attributes.
    Blank,
    /// A macro key emitting its content list when triggered.
    Macro(MacroKey),
    /// A group key descending into a nested grid when opened.
    Group(GroupKey),
}

/// Payload of a macro key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroKey {
    /// Display label (1-6 characters)
    pub label: String,
    /// LED color of the key
    pub color: RgbColor,
    /// Ordered actions to emit; may be empty
    #[serde(default, deserialize_with = "deserialize_values")]
    pub content: Vec<MacroValue>,
}

/// Payload of a group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    /// Display label (1-6 characters)
    pub label: String,
    /// LED color of the key
    pub color: RgbColor,
    /// Nested grid content, padded to a multiple of the chunk size
    #[serde(default)]
    pub content: Vec<Key>,
    /// Rotary encoder actions while this group is open
    #[serde(default)]
    pub encoder: EncoderActions,
}

/// The three action lists of the rotary encoder, active per open group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EncoderActions {
    /// Fired when the encoder is pressed
    #[serde(default, deserialize_with = "deserialize_values")]
    pub switch: Vec<MacroValue>,
    /// Fired on clockwise rotation
    #[serde(default, deserialize_with = "deserialize_values")]
    pub increased: Vec<MacroValue>,
    /// Fired on counter-clockwise rotation
    #[serde(default, deserialize_with = "deserialize_values")]
    pub decreased: Vec<MacroValue>,
}

/// The full configuration: the implicit root group.
///
/// The root is always a group; on the wire it is the labeled object
/// `{label, content, encoder}` without a `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTree {
    /// Label shown while the root grid is open
    pub label: String,
    /// Root grid content
    #[serde(default)]
    pub content: Vec<Key>,
    /// Encoder actions while the root is open
    #[serde(default)]
    pub encoder: EncoderActions,
}

/// Deserializes a macro value list, dropping literal `false` entries.
///
/// The external editor emits `false` for an empty row; such rows are not
/// persisted when the content list is assembled.
fn deserialize_values<'de, D>(deserializer: D) -> std::result::Result<Vec<MacroValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = Vec::deserialize(deserializer)?;
    raw.iter()
        .filter(|value| !matches!(value, Value::Bool(false)))
        .map(|value| MacroValue::decode(value).map_err(DeError::custom))
        .collect()
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        bail!("Key label cannot be empty");
    }
    let len = label.chars().count();
    if len > LABEL_MAX_LEN {
        bail!("Key label '{label}' exceeds maximum length of {LABEL_MAX_LEN} characters (got {len})");
    }
    Ok(())
}

impl Key {
    /// Returns true if this key is blank.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Returns the display label, or `None` for a blank key.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Blank => None,
            Self::Macro(macro_key) => Some(&macro_key.label),
            Self::Group(group) => Some(&group.label),
        }
    }

    /// Returns the LED color, or `None` for a blank key.
    #[must_use]
    pub const fn color(&self) -> Option<RgbColor> {
        match self {
            Self::Blank => None,
            Self::Macro(macro_key) => Some(macro_key.color),
            Self::Group(group) => Some(group.color),
        }
    }

    /// Returns an owned plain-data snapshot of this key.
    ///
    /// Variant-foreign fields are never present: a blank snapshot carries
    /// nothing but its type.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Atomically replaces this key with the given snapshot.
    pub fn replace_from(&mut self, snapshot: Self) {
        *self = snapshot;
    }

    /// Degrades this key to blank, clearing all variant-specific fields.
    pub fn degrade_to_blank(&mut self) {
        *self = Self::Blank;
    }

    /// Validates labels recursively.
    ///
    /// Grid-size normalization is not part of validation; see
    /// [`crate::models::grid::normalize_tree`].
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Blank => Ok(()),
            Self::Macro(macro_key) => validate_label(&macro_key.label),
            Self::Group(group) => {
                validate_label(&group.label)?;
                for child in &group.content {
                    child.validate()?;
                }
                Ok(())
            }
        }
    }
}

impl MacroTree {
    /// Creates an empty tree: the root group with one page of blanks.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            label: ROOT_LABEL.to_string(),
            content: vec![Key::Blank; PAGE_SIZE],
            encoder: EncoderActions::default(),
        }
    }

    /// Validates the root label and every key recursively.
    pub fn validate(&self) -> Result<()> {
        validate_label(&self.label)?;
        for key in &self.content {
            key.validate()?;
        }
        Ok(())
    }
}

impl Default for MacroTree {
    fn default() -> Self {
        Self::empty()
    }
}
