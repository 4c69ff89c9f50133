//! Shared test fixtures for integration and E2E CLI tests.
#![allow(dead_code)] // Not every fixture is used by every test binary

use lazypad::constants::PAGE_SIZE;
use lazypad::controller::Controller;
use lazypad::models::{
    EncoderActions, GroupKey, Key, MacroKey, MacroTree, MacroValue, RgbColor,
};
use lazypad::store::KvStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a macro key with one keycode action.
pub fn macro_key(label: &str) -> Key {
    Key::Macro(MacroKey {
        label: label.to_string(),
        color: RgbColor::new(255, 0, 0),
        content: vec![MacroValue::Keycode("A".to_string())],
    })
}

/// Creates a group key with one full page of blanks.
pub fn group_key(label: &str) -> Key {
    Key::Group(GroupKey {
        label: label.to_string(),
        color: RgbColor::new(0, 255, 0),
        content: vec![Key::Blank; PAGE_SIZE],
        encoder: EncoderActions::default(),
    })
}

/// Creates a tree with a macro "x" and a group "G" holding a nested
/// macro "N" (the shape used by the round-trip tests).
pub fn sample_tree() -> MacroTree {
    let mut tree = MacroTree::empty();
    tree.content[0] = Key::Macro(MacroKey {
        label: "x".to_string(),
        color: RgbColor::new(255, 0, 0),
        content: vec![MacroValue::Keycode("A".to_string())],
    });

    let mut nested = vec![Key::Blank; PAGE_SIZE];
    nested[0] = Key::Macro(MacroKey {
        label: "N".to_string(),
        color: RgbColor::new(0, 0, 255),
        content: vec![MacroValue::Text("hi".to_string())],
    });
    tree.content[1] = Key::Group(GroupKey {
        label: "G".to_string(),
        color: RgbColor::new(0, 255, 0),
        content: nested,
        encoder: EncoderActions::default(),
    });
    tree
}

/// Creates a controller backed by a store in a fresh temp directory.
/// The directory must outlive the controller.
pub fn fresh_controller() -> (Controller, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = KvStore::open(dir.path().join("store.json"));
    (Controller::new(store), dir)
}

/// Writes `contents` to a file in a fresh temp directory.
pub fn create_temp_file(name: &str, contents: &str) -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write temp file");
    (path, dir)
}

/// Writes a tree to a nested-form JSON file in a fresh temp directory.
pub fn create_temp_tree_file(tree: &MacroTree) -> (PathBuf, TempDir) {
    let json = serde_json::to_string_pretty(tree).expect("Failed to encode tree");
    create_temp_file("macros.json", &json)
}
