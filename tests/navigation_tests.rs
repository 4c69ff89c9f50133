//! Integration tests for grid navigation and editing through the
//! controller: pagination growth and trim, descend/ascend, reorder, and
//! persistence of every accepted mutation.

mod fixtures;
use fixtures::*;

use lazypad::constants::{PAGE_SIZE, STORE_KEY_MACROS};
use lazypad::controller::Intent;
use lazypad::models::{grid, Key, MacroKey, MacroValue, RgbColor};
use lazypad::store::KvStore;

/// Every group's content length must stay a positive multiple of the
/// chunk size.
fn assert_chunked(content: &[Key]) {
    assert!(!content.is_empty());
    assert_eq!(content.len() % PAGE_SIZE, 0);
    for key in content {
        if let Key::Group(group) = key {
            assert_chunked(&group.content);
        }
    }
}

#[test]
fn test_fresh_start_add_one_macro() {
    let (mut ctl, dir) = fresh_controller();

    // Empty store: root group with one page of blanks
    assert_eq!(ctl.depth(), 1);
    assert_eq!(ctl.page(), 0);
    assert!(ctl.visible_page().unwrap().iter().all(Key::is_blank));

    let proposal = Key::Macro(MacroKey {
        label: "A".to_string(),
        color: RgbColor::new(255, 0, 0),
        content: vec![MacroValue::Keycode("A".to_string())],
    });
    ctl.on_intent(Intent::Edit(0, Some(proposal.clone()))).unwrap();

    assert_eq!(ctl.tree().content[0], proposal);
    assert_eq!(ctl.tree().content.len(), PAGE_SIZE);

    // The persisted store holds the identical serialization
    let store = KvStore::open(dir.path().join("store.json"));
    assert_eq!(store.get(STORE_KEY_MACROS).unwrap(), ctl.save().unwrap());
}

#[test]
fn test_paginate_beyond_end_then_trim() {
    let (mut ctl, _dir) = fresh_controller();

    ctl.on_intent(Intent::Next).unwrap();
    assert_eq!(ctl.tree().content.len(), 2 * PAGE_SIZE);
    assert_eq!(ctl.page(), 1);

    ctl.on_intent(Intent::Prev).unwrap();
    assert_eq!(ctl.tree().content.len(), PAGE_SIZE);
    assert_eq!(ctl.page(), 0);
}

#[test]
fn test_descend_and_ascend() {
    let (mut ctl, _dir) = fresh_controller();

    ctl.on_intent(Intent::Edit(0, Some(group_key("G")))).unwrap();
    ctl.on_intent(Intent::Open(0)).unwrap();

    assert_eq!(ctl.depth(), 2);
    assert_eq!(ctl.page(), 0);
    let page = ctl.visible_page().unwrap();
    assert_eq!(page.len(), PAGE_SIZE);
    assert!(page.iter().all(Key::is_blank));
    assert_eq!(ctl.breadcrumb().unwrap(), vec!["Macros", "G"]);

    // Back on page 0 ascends
    ctl.on_intent(Intent::Prev).unwrap();
    assert_eq!(ctl.depth(), 1);
    assert_eq!(ctl.page(), 0);
}

#[test]
fn test_reorder_via_sortable_permutation() {
    let (mut ctl, _dir) = fresh_controller();
    ctl.on_intent(Intent::Edit(0, Some(macro_key("M1")))).unwrap();
    ctl.on_intent(Intent::Edit(1, Some(macro_key("M2")))).unwrap();

    ctl.on_intent(Intent::Reorder(vec![1, 0, 2, 3, 4, 5, 6, 7, 8]))
        .unwrap();

    let page = ctl.visible_page().unwrap();
    assert_eq!(page[0].label(), Some("M2"));
    assert_eq!(page[1].label(), Some("M1"));
    assert!(page[2..].iter().all(Key::is_blank));
    assert_eq!(ctl.tree().content.len(), PAGE_SIZE);
}

#[test]
fn test_reorder_trims_stale_pages_but_keeps_viewed_one() {
    let (mut ctl, _dir) = fresh_controller();
    ctl.on_intent(Intent::Edit(0, Some(macro_key("M")))).unwrap();

    // Grow to three pages, then reorder while viewing page 2
    ctl.on_intent(Intent::Next).unwrap();
    ctl.on_intent(Intent::Next).unwrap();
    assert_eq!(ctl.tree().content.len(), 3 * PAGE_SIZE);

    let identity: Vec<usize> = (0..PAGE_SIZE).collect();
    ctl.on_intent(Intent::Reorder(identity)).unwrap();

    // Page 2 is in view, so nothing beyond it exists to trim
    assert_eq!(ctl.tree().content.len(), 3 * PAGE_SIZE);
    assert_eq!(ctl.page(), 2);
}

#[test]
fn test_drag_paging_keeps_blank_pages() {
    let (mut ctl, _dir) = fresh_controller();

    ctl.on_intent(Intent::DragNext).unwrap();
    assert_eq!(ctl.page(), 1);
    assert_eq!(ctl.tree().content.len(), 2 * PAGE_SIZE);

    ctl.on_intent(Intent::DragPrev).unwrap();
    assert_eq!(ctl.page(), 0);
    assert_eq!(ctl.tree().content.len(), 2 * PAGE_SIZE);
}

#[test]
fn test_chunk_invariant_after_mutations() {
    let (mut ctl, _dir) = fresh_controller();

    ctl.on_intent(Intent::Edit(0, Some(group_key("G")))).unwrap();
    assert_chunked(&ctl.tree().content);

    ctl.on_intent(Intent::Open(0)).unwrap();
    assert_chunked(&ctl.tree().content);

    ctl.on_intent(Intent::Next).unwrap();
    ctl.on_intent(Intent::Edit(4, Some(macro_key("Deep")))).unwrap();
    assert_chunked(&ctl.tree().content);

    ctl.on_intent(Intent::Prev).unwrap();
    ctl.on_intent(Intent::Prev).unwrap();
    assert_chunked(&ctl.tree().content);
    assert_eq!(ctl.depth(), 1);

    ctl.on_intent(Intent::Delete(0)).unwrap();
    assert_chunked(&ctl.tree().content);
}

#[test]
fn test_trim_leaves_last_page_occupied() {
    let (mut ctl, _dir) = fresh_controller();

    // Put a macro on page 2, go back down; the occupied page survives
    ctl.on_intent(Intent::Next).unwrap();
    ctl.on_intent(Intent::Edit(0, Some(macro_key("Keep")))).unwrap();
    ctl.on_intent(Intent::Prev).unwrap();

    assert_eq!(ctl.tree().content.len(), 2 * PAGE_SIZE);
    let last_page = grid::page_slice(&ctl.tree().content, 1);
    assert!(last_page.iter().any(|k| !k.is_blank()));
}

#[test]
fn test_empty_label_edit_is_rejected() {
    let (mut ctl, _dir) = fresh_controller();
    let proposal = Key::Macro(MacroKey {
        label: String::new(),
        color: RgbColor::default(),
        content: vec![],
    });

    assert!(ctl.on_intent(Intent::Edit(0, Some(proposal))).is_err());
    assert!(ctl.visible_page().unwrap()[0].is_blank());
}

#[test]
fn test_load_save_roundtrip_resets_navigation() {
    let (mut ctl, _dir) = fresh_controller();
    ctl.on_intent(Intent::Edit(0, Some(group_key("G")))).unwrap();
    ctl.on_intent(Intent::Open(0)).unwrap();
    assert_eq!(ctl.depth(), 2);

    let json = ctl.save().unwrap();
    ctl.on_intent(Intent::New).unwrap();
    assert_eq!(ctl.depth(), 1);
    assert!(ctl.visible_page().unwrap().iter().all(Key::is_blank));

    ctl.on_intent(Intent::Load(json.clone())).unwrap();
    assert_eq!(ctl.depth(), 1);
    assert_eq!(ctl.page(), 0);
    assert_eq!(ctl.save().unwrap(), json);
}

#[test]
fn test_controller_restores_tree_from_store() {
    let (mut ctl, dir) = fresh_controller();
    ctl.on_intent(Intent::Edit(2, Some(macro_key("Kept")))).unwrap();
    drop(ctl);

    let store = KvStore::open(dir.path().join("store.json"));
    let ctl = lazypad::controller::Controller::new(store);
    assert_eq!(ctl.visible_page().unwrap()[2].label(), Some("Kept"));
}
