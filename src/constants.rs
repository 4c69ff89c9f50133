//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the fixed geometry of the device.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LazyPad";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "lazypad";

/// Number of keys on one page of the grid (3x3). Group content is always
/// padded to a multiple of this chunk size.
pub const PAGE_SIZE: usize = 9;

/// Maximum length of a key label in characters.
pub const LABEL_MAX_LEN: usize = 6;

/// Baud rate of the serial link to the device.
pub const BAUD_RATE: u32 = 9600;

/// Label of the implicit root group.
pub const ROOT_LABEL: &str = "Macros";

/// Key under which the working tree is persisted in the local store.
pub const STORE_KEY_MACROS: &str = "macros";
