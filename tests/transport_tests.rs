//! Integration tests for the transport framing and protocol schema.

use lazypad::transport::{LineFramer, Request, Response};
use lazypad::transport::Command;

#[test]
fn test_frame_split_across_two_reads() {
    let mut framer = LineFramer::new();

    // First read: one complete ACK plus the start of an ERR frame
    let lines = framer.push(b"{\"ACK\":\"macros\",\"CONTENT\":{\"label\":\"Macros\"}}\n{\"ERR");
    assert_eq!(lines.len(), 1);

    let response = Response::parse(&lines[0]).unwrap();
    let Response::Ack { tag, content } = response else {
        panic!("expected ack");
    };
    assert_eq!(tag, "macros");
    assert_eq!(content.unwrap()["label"], "Macros");

    // The incomplete line produces nothing until its terminator arrives
    assert!(framer.push(b"\":\"boom\"}").is_empty());
    let lines = framer.push(b"\n");
    assert_eq!(lines.len(), 1);
    assert_eq!(
        Response::parse(&lines[0]).unwrap(),
        Response::Err("boom".to_string())
    );
}

#[test]
fn test_unparseable_line_is_an_error_not_a_panic() {
    let mut framer = LineFramer::new();
    let lines = framer.push(b"this is not json\n{\"ACK\":\"ok\"}\n");
    assert_eq!(lines.len(), 2);

    assert!(Response::parse(&lines[0]).is_err());
    assert!(Response::parse(&lines[1]).is_ok());
}

#[test]
fn test_request_wire_shapes() {
    let frame = Request::new(Command::SaveMacros).to_frame().unwrap();
    assert_eq!(frame, b"{\"command\":\"save_macros\"}\n");

    let frame = Request::with_content(Command::SetMacros, serde_json::json!({"label": "Macros"}))
        .to_frame()
        .unwrap();
    let text = String::from_utf8(frame).unwrap();
    assert!(text.ends_with('\n'));
    assert!(text.contains("\"command\":\"set_macros\""));
    assert!(text.contains("\"content\""));
}

#[test]
fn test_all_known_commands_have_wire_names() {
    let commands = [
        (Command::GetMacros, "get_macros"),
        (Command::SetMacros, "set_macros"),
        (Command::SaveMacros, "save_macros"),
        (Command::SoftReset, "soft_reset"),
        (Command::HardReset, "hard_reset"),
        (Command::EnableUsb, "enable_usb"),
        (Command::GetSettings, "get_settings"),
        (Command::SetSettings, "set_settings"),
    ];
    for (command, name) in commands {
        assert_eq!(command.as_str(), name);
    }
}

#[test]
fn test_handshake_responses_parse() {
    let version = Response::parse(br#"{"ACK":"version","CONTENT":"1.4.0"}"#).unwrap();
    assert_eq!(
        version,
        Response::Ack {
            tag: "version".to_string(),
            content: Some(serde_json::json!("1.4.0")),
        }
    );

    let usb = Response::parse(br#"{"ACK":"usbenabled","CONTENT":false}"#).unwrap();
    assert_eq!(
        usb,
        Response::Ack {
            tag: "usbenabled".to_string(),
            content: Some(serde_json::json!(false)),
        }
    );
}
