//! Parsing and serialization of the two persistence forms.
//!
//! A macro tree round-trips through a nested, human-readable JSON form
//! (files, local store, `set_macros`) and a flat, ID-indexed form suited
//! for on-device file storage.

pub mod flat;
pub mod nested;

// Re-export commonly used functions
pub use flat::{flatten, restore};
pub use nested::{from_json, to_json};
