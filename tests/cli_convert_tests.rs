//! End-to-end tests for `lazypad convert` and `lazypad inspect`.

use std::process::Command;

mod fixtures;
use fixtures::*;

/// Path to the lazypad binary
fn lazypad_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lazypad")
}

#[test]
fn test_convert_nested_to_flat_and_back() {
    let tree = sample_tree();
    let (nested_path, temp_dir) = create_temp_tree_file(&tree);
    let flat_path = temp_dir.path().join("flat.json");
    let back_path = temp_dir.path().join("back.json");

    let output = Command::new(lazypad_bin())
        .args([
            "convert",
            "--file",
            nested_path.to_str().unwrap(),
            "--to",
            "flat",
            "--output",
            flat_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // The flat form is ID-indexed with a "0" root
    let flat: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&flat_path).unwrap()).unwrap();
    assert_eq!(flat["0"]["label"], "Macros");
    assert_eq!(flat["1"]["label"], "x");

    let output = Command::new(lazypad_bin())
        .args([
            "convert",
            "--file",
            flat_path.to_str().unwrap(),
            "--to",
            "nested",
            "--output",
            back_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let restored = lazypad::parser::nested::load(&back_path).unwrap();
    assert_eq!(restored, tree);
}

#[test]
fn test_convert_rejects_bad_flat_input() {
    let (path, temp_dir) = create_temp_file("flat.json", r#"{"1": {}}"#);
    let out_path = temp_dir.path().join("out.json");

    let output = Command::new(lazypad_bin())
        .args([
            "convert",
            "--file",
            path.to_str().unwrap(),
            "--to",
            "nested",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(!out_path.exists());
}

#[test]
fn test_inspect_summary() {
    let (path, _temp_dir) = create_temp_tree_file(&sample_tree());

    let output = Command::new(lazypad_bin())
        .args(["inspect", "--file", path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let summary: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(summary["label"], "Macros");
    assert_eq!(summary["pages"], 1);
    assert_eq!(summary["keys"]["macro"], 2);
    assert_eq!(summary["keys"]["group"], 1);
    assert_eq!(summary["depth"], 2);
}

#[test]
fn test_inspect_human_readable_lists_labels() {
    let (path, _temp_dir) = create_temp_tree_file(&sample_tree());

    let output = Command::new(lazypad_bin())
        .args(["inspect", "--file", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Macros"));
    assert!(stdout.contains('x'));
    assert!(stdout.contains('G'));
}
