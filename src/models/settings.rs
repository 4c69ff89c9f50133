//! Device settings payload of `get_settings`/`set_settings`.

use serde::{Deserialize, Serialize};

/// Settings stored on the device itself.
///
/// Unknown fields are tolerated on decode; the full object is emitted on
/// encode so the device never sees a partial settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Seconds until the device display sleeps
    #[serde(default = "default_sleeptime")]
    pub sleeptime: u32,
    /// Keyboard layout identifier (e.g. "us", "de")
    #[serde(default = "default_keyboardlayout")]
    pub keyboardlayout: String,
    /// Whether the device loads its unicode bitmap font
    #[serde(default)]
    pub useunicodefont: bool,
    /// Flips the device rotation by 180 degrees
    #[serde(default)]
    pub fliprotation: bool,
    /// LCD and LED brightness (0.0-1.0)
    #[serde(default = "default_brightness")]
    pub brightness: f64,
}

const fn default_sleeptime() -> u32 {
    2
}

fn default_keyboardlayout() -> String {
    "us".to_string()
}

const fn default_brightness() -> f64 {
    0.1
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            sleeptime: default_sleeptime(),
            keyboardlayout: default_keyboardlayout(),
            useunicodefont: false,
            fliprotation: false,
            brightness: default_brightness(),
        }
    }
}
