//! Request/response schema of the serial protocol.
//!
//! Host-to-device requests are `{"command": <string>, "content"?: <json>}`;
//! device-to-host responses are exactly one of `{"ACK": ..., "CONTENT"?: ...}`,
//! `{"ERR": ...}` or `{"WARN": ...}`. The protocol is stateless and not
//! correlated: a response is attributed to a request by its `ACK` tag only.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fmt;

/// `ACK` tag of a macros transfer; the tree rides in `CONTENT`.
pub const ACK_MACROS: &str = "macros";
/// `ACK` tag of a settings transfer.
pub const ACK_SETTINGS: &str = "settings";
/// `ACK` tag of the USB-storage handshake flag.
pub const ACK_USB_ENABLED: &str = "usbenabled";
/// `ACK` tag of the firmware version handshake.
pub const ACK_VERSION: &str = "version";

/// Commands the device understands. Unknown commands are ignored by the
/// device, so this list may trail the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request the full macro tree
    GetMacros,
    /// Transfer a macro tree to the device's working memory
    SetMacros,
    /// Persist the device's working tree to its flash storage
    SaveMacros,
    /// Restart the device firmware
    SoftReset,
    /// Reset the device hardware
    HardReset,
    /// Re-enable the device's USB mass storage
    EnableUsb,
    /// Request the device settings
    GetSettings,
    /// Transfer device settings
    SetSettings,
}

impl Command {
    /// The wire name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetMacros => "get_macros",
            Self::SetMacros => "set_macros",
            Self::SaveMacros => "save_macros",
            Self::SoftReset => "soft_reset",
            Self::HardReset => "hard_reset",
            Self::EnableUsb => "enable_usb",
            Self::GetSettings => "get_settings",
            Self::SetSettings => "set_settings",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One host-to-device request frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Command to execute
    pub command: Command,
    /// Optional command payload
    pub content: Option<Value>,
}

impl Request {
    /// Creates a request without a payload.
    #[must_use]
    pub const fn new(command: Command) -> Self {
        Self {
            command,
            content: None,
        }
    }

    /// Creates a request carrying a payload.
    #[must_use]
    pub const fn with_content(command: Command, content: Value) -> Self {
        Self {
            command,
            content: Some(content),
        }
    }

    /// Encodes the request as one `\n`-terminated wire frame.
    pub fn to_frame(&self) -> Result<Vec<u8>> {
        let mut object = Map::new();
        object.insert("command".to_string(), Value::from(self.command.as_str()));
        if let Some(content) = &self.content {
            object.insert("content".to_string(), content.clone());
        }

        let mut frame =
            serde_json::to_vec(&Value::Object(object)).context("Failed to encode request")?;
        frame.push(b'\n');
        Ok(frame)
    }
}

/// One device-to-host response frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Acknowledgment, optionally carrying a payload in `CONTENT`
    Ack {
        /// The `ACK` tag: a known payload marker or a free-form status string
        tag: String,
        /// Optional payload
        content: Option<Value>,
    },
    /// Error reported by the device; surfaced verbatim to the user
    Err(String),
    /// Non-fatal warning reported by the device
    Warn(String),
}

impl Response {
    /// Parses one framed line into a response.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid UTF-8, malformed JSON, or an object
    /// without any of the `ERR`/`WARN`/`ACK` keys. The caller drops the
    /// line; the stream is not torn down.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(line).context("Frame is not valid JSON")?;
        let object = match value {
            Value::Object(object) => object,
            other => bail!("Frame must be a JSON object, got {other}"),
        };

        if let Some(err) = object.get("ERR") {
            return Ok(Self::Err(stringify(err)));
        }
        if let Some(warn) = object.get("WARN") {
            return Ok(Self::Warn(stringify(warn)));
        }
        if let Some(ack) = object.get("ACK") {
            return Ok(Self::Ack {
                tag: stringify(ack),
                content: object.get("CONTENT").cloned(),
            });
        }
        bail!("Frame has none of the keys ERR, WARN or ACK");
    }
}

/// Renders a tag or message value; devices occasionally send non-strings.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_frame_without_content() {
        let frame = Request::new(Command::GetMacros).to_frame().unwrap();
        assert_eq!(frame, b"{\"command\":\"get_macros\"}\n");
    }

    #[test]
    fn test_request_frame_with_content() {
        let request = Request::with_content(Command::SetSettings, json!({"sleeptime": 5}));
        let frame = request.to_frame().unwrap();
        let value: Value = serde_json::from_slice(&frame[..frame.len() - 1]).unwrap();
        assert_eq!(value["command"], "set_settings");
        assert_eq!(value["content"]["sleeptime"], 5);
        assert_eq!(*frame.last().unwrap(), b'\n');
    }

    #[test]
    fn test_parse_ack_with_content() {
        let response = Response::parse(br#"{"ACK":"macros","CONTENT":{"label":"Macros"}}"#).unwrap();
        let Response::Ack { tag, content } = response else {
            panic!("expected ack");
        };
        assert_eq!(tag, ACK_MACROS);
        assert_eq!(content.unwrap()["label"], "Macros");
    }

    #[test]
    fn test_parse_free_form_ack() {
        let response = Response::parse(br#"{"ACK":"Macros stored"}"#).unwrap();
        assert_eq!(
            response,
            Response::Ack {
                tag: "Macros stored".to_string(),
                content: None
            }
        );
    }

    #[test]
    fn test_parse_err_and_warn() {
        assert_eq!(
            Response::parse(br#"{"ERR":"Unknown command: foo"}"#).unwrap(),
            Response::Err("Unknown command: foo".to_string())
        );
        assert_eq!(
            Response::parse(br#"{"WARN":"Reloaded: macros.json"}"#).unwrap(),
            Response::Warn("Reloaded: macros.json".to_string())
        );
    }

    #[test]
    fn test_err_wins_over_ack() {
        let response = Response::parse(br#"{"ACK":"x","ERR":"boom"}"#).unwrap();
        assert_eq!(response, Response::Err("boom".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Response::parse(b"not json").is_err());
        assert!(Response::parse(b"[1,2]").is_err());
        assert!(Response::parse(b"{\"other\":1}").is_err());
        assert!(Response::parse(&[0xFF, 0xFE]).is_err());
    }
}
