//! The edit transaction.
//!
//! An external editor dialog receives an immutable key snapshot and hands
//! back either a cancel or a proposed replacement snapshot. The core
//! reintegrates the proposal atomically: either the whole key is replaced
//! or nothing changes. Rejections are signaled back to the editor through
//! [`EditError`]; the core does not re-prompt.

use crate::constants::LABEL_MAX_LEN;
use crate::models::{grid, Key};
use thiserror::Error;

/// Rejection reasons surfaced to the external editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A non-blank key was proposed without a label.
    #[error("key label cannot be empty")]
    EmptyLabel,
    /// The proposed label exceeds the display width.
    #[error("key label '{0}' exceeds {LABEL_MAX_LEN} characters")]
    LabelTooLong(String),
}

/// What an accepted edit did to the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor cancelled; the key is untouched.
    Cancelled,
    /// The key was degraded to blank.
    Cleared,
    /// The key was replaced with the proposed snapshot.
    Replaced,
}

/// Applies an edit proposal to a key slot.
///
/// `proposal` is `None` when the editor cancelled. A proposed blank clears
/// the key; any other proposal replaces all variant-defined fields. A type
/// change from group to macro discards the nested children here without
/// confirmation (the external editor may prompt first). A proposed group
/// is padded to a full chunk before it lands in the tree.
///
/// # Errors
///
/// Returns an [`EditError`] when the proposal violates the label rules;
/// the key is left untouched.
pub fn apply_edit(slot: &mut Key, proposal: Option<Key>) -> Result<EditOutcome, EditError> {
    let Some(mut proposed) = proposal else {
        return Ok(EditOutcome::Cancelled);
    };

    if proposed.is_blank() {
        slot.degrade_to_blank();
        return Ok(EditOutcome::Cleared);
    }

    let label = proposed.label().unwrap_or_default();
    if label.is_empty() {
        return Err(EditError::EmptyLabel);
    }
    if label.chars().count() > LABEL_MAX_LEN {
        return Err(EditError::LabelTooLong(label.to_string()));
    }

    grid::normalize_key(&mut proposed);
    slot.replace_from(proposed);
    Ok(EditOutcome::Replaced)
}
