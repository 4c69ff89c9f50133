//! Atomic macro actions and their wire codec.
//!
//! A macro is an ordered list of [`MacroValue`]s. On the wire each value is
//! the natural JSON shape the device executes directly: a number is a wait,
//! a string is typed literally, and an object is discriminated by its first
//! recognized key in the fixed order `kc` > `ccc` > `mse` > `sys`. In memory
//! the discriminator is an explicit enum tag; only the wire format keeps the
//! implicit dispatch for device compatibility.

use anyhow::{bail, Result};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// One atomic input action in a macro's content list.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroValue {
    /// Blocks device execution for the given number of seconds (>= 0).
    Wait(f64),
    /// Types a literal string (non-empty).
    Text(String),
    /// Presses a keycode, or releases it when prefixed with `-`.
    Keycode(String),
    /// Sends a consumer-control code (media/brightness keys).
    Consumer(String),
    /// Moves, scrolls, or clicks the mouse.
    Mouse(MouseAction),
    /// Invokes a device system function (e.g. `soft_reset`).
    System(String),
}

/// Mouse movement and button payload of a [`MacroValue::Mouse`] action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseAction {
    /// Horizontal movement in pixels (negative is left).
    #[serde(default)]
    pub x: i32,
    /// Vertical movement in pixels (negative is up).
    #[serde(default)]
    pub y: i32,
    /// Wheel movement in detents (negative is towards the user).
    #[serde(default)]
    pub w: i32,
    /// Button to click, if any.
    #[serde(default)]
    pub b: MouseButton,
}

/// Mouse button of a [`MouseAction`]. The empty string means "no button".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left button
    #[serde(rename = "LEFT")]
    Left,
    /// Middle button
    #[serde(rename = "MIDDLE")]
    Middle,
    /// Right button
    #[serde(rename = "RIGHT")]
    Right,
    /// No button, movement only
    #[default]
    #[serde(rename = "")]
    None,
}

impl MacroValue {
    /// Decodes a macro value from its wire JSON shape.
    ///
    /// Dispatches on the JSON type: number becomes a wait, string a literal,
    /// and an object is matched against the discriminator keys in the order
    /// `kc`, `ccc`, `mse`, `sys` - the first present key wins.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite waits, empty strings,
    /// objects without a recognized discriminator, and any other JSON type.
    pub fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => {
                let seconds = n
                    .as_f64()
                    .filter(|s| s.is_finite())
                    .ok_or_else(|| anyhow::anyhow!("Invalid wait value: {n}"))?;
                if seconds < 0.0 {
                    bail!("Wait must not be negative, got {seconds}");
                }
                Ok(Self::Wait(seconds))
            }
            Value::String(text) => {
                if text.is_empty() {
                    bail!("Literal string action must not be empty");
                }
                Ok(Self::Text(text.clone()))
            }
            Value::Object(map) => {
                if let Some(kc) = map.get("kc") {
                    let kc = kc
                        .as_str()
                        .ok_or_else(|| anyhow::anyhow!("'kc' must be a string"))?;
                    Ok(Self::Keycode(kc.to_string()))
                } else if let Some(ccc) = map.get("ccc") {
                    let ccc = ccc
                        .as_str()
                        .ok_or_else(|| anyhow::anyhow!("'ccc' must be a string"))?;
                    Ok(Self::Consumer(ccc.to_string()))
                } else if let Some(mse) = map.get("mse") {
                    let action: MouseAction = serde_json::from_value(mse.clone())
                        .map_err(|e| anyhow::anyhow!("Invalid 'mse' payload: {e}"))?;
                    Ok(Self::Mouse(action))
                } else if let Some(sys) = map.get("sys") {
                    let sys = sys
                        .as_str()
                        .ok_or_else(|| anyhow::anyhow!("'sys' must be a string"))?;
                    Ok(Self::System(sys.to_string()))
                } else {
                    bail!("Macro object has no recognized key (kc, ccc, mse or sys)");
                }
            }
            other => bail!("Unsupported macro value: {other}"),
        }
    }

    /// Encodes the value into its wire JSON shape.
    #[must_use]
    pub fn encode(&self) -> Value {
        match self {
            Self::Wait(seconds) => json!(seconds),
            Self::Text(text) => json!(text),
            Self::Keycode(kc) => json!({ "kc": kc }),
            Self::Consumer(ccc) => json!({ "ccc": ccc }),
            Self::Mouse(action) => json!({ "mse": action }),
            Self::System(sys) => json!({ "sys": sys }),
        }
    }

    /// Returns true for a keycode *release* action (leading `-`).
    #[must_use]
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Keycode(kc) if kc.starts_with('-'))
    }

    /// Returns the bare keycode name with the release prefix stripped,
    /// or `None` for non-keycode values.
    #[must_use]
    pub fn keycode_name(&self) -> Option<&str> {
        match self {
            Self::Keycode(kc) => Some(kc.strip_prefix('-').unwrap_or(kc)),
            _ => None,
        }
    }
}

impl Serialize for MacroValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MacroValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(&value).map_err(DeError::custom)
    }
}
