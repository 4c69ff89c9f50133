//! Grid pagination over group content.
//!
//! A group's content is logically a sequence of chunks of
//! [`PAGE_SIZE`](crate::constants::PAGE_SIZE) keys. These operations keep
//! every content list padded to a positive multiple of the chunk size and
//! manage the trailing blank chunks that paginating and reordering create.

use crate::constants::PAGE_SIZE;
use crate::models::{Key, MacroTree};
use anyhow::{bail, Result};

/// Number of pages a content list of `len` keys spans (at least 1).
#[must_use]
pub const fn pages(len: usize) -> usize {
    let len = if len == 0 { 1 } else { len };
    len.div_ceil(PAGE_SIZE)
}

/// Pads `content` with blanks to the next multiple of the chunk size.
///
/// An empty list yields one full chunk of blanks, so group content is
/// always a positive multiple of the chunk size afterwards.
pub fn fill_up(content: &mut Vec<Key>) {
    let target = pages(content.len()) * PAGE_SIZE;
    content.resize(target, Key::Blank);
}

/// Appends one chunk of blank keys.
pub fn append_empty_chunk(content: &mut Vec<Key>) {
    content.resize(content.len() + PAGE_SIZE, Key::Blank);
}

/// Drops the trailing chunk if there is more than one page and the last
/// chunk is entirely blank. Returns whether a chunk was removed.
pub fn trim_trailing_empty_chunk(content: &mut Vec<Key>) -> bool {
    if pages(content.len()) <= 1 {
        return false;
    }
    let tail = content.len() - PAGE_SIZE;
    if content[tail..].iter().all(Key::is_blank) {
        content.truncate(tail);
        return true;
    }
    false
}

/// Drops every trailing blank chunk beyond `page` (0-based).
///
/// Used after a reorder: the currently-viewed page must survive even when
/// it ends up empty, but stale blank pages past it are released.
pub fn trim_beyond_page(content: &mut Vec<Key>, page: usize) {
    while pages(content.len()) > page + 1 && trim_trailing_empty_chunk(content) {}
}

/// Returns the keys visible on `page`.
#[must_use]
pub fn page_slice(content: &[Key], page: usize) -> &[Key] {
    let start = (page * PAGE_SIZE).min(content.len());
    let end = (start + PAGE_SIZE).min(content.len());
    &content[start..end]
}

/// Replays a permutation of the keys on `page`.
///
/// `permutation[i]` names the old in-page index of the key that ends up at
/// slot `i`.
///
/// # Errors
///
/// Returns an error if `permutation` is not a permutation of the page's
/// indices or `page` is out of range.
pub fn reorder_page(content: &mut [Key], page: usize, permutation: &[usize]) -> Result<()> {
    let start = page * PAGE_SIZE;
    if start + PAGE_SIZE > content.len() {
        bail!("Page {page} is out of range");
    }
    if permutation.len() != PAGE_SIZE {
        bail!(
            "Permutation must cover the whole page ({PAGE_SIZE} slots, got {})",
            permutation.len()
        );
    }
    let mut seen = [false; PAGE_SIZE];
    for &index in permutation {
        if index >= PAGE_SIZE || seen[index] {
            bail!("Invalid permutation: {permutation:?}");
        }
        seen[index] = true;
    }

    let old: Vec<Key> = content[start..start + PAGE_SIZE].to_vec();
    for (slot, &index) in permutation.iter().enumerate() {
        content[start + slot] = old[index].clone();
    }
    Ok(())
}

/// Builds the page permutation for a single drag from `from` to `to`.
///
/// This is the shape the sortable collaborator reports: one key moves,
/// the keys in between shift by one.
#[must_use]
pub fn move_permutation(from: usize, to: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..PAGE_SIZE).collect();
    if from < PAGE_SIZE && to < PAGE_SIZE {
        let index = order.remove(from);
        order.insert(to, index);
    }
    order
}

/// Pads every group in the tree, root included, to a positive multiple of
/// the chunk size.
pub fn normalize_tree(tree: &mut MacroTree) {
    fill_up(&mut tree.content);
    for key in &mut tree.content {
        normalize_key(key);
    }
}

/// Pads one key's nested groups, if any, like [`normalize_tree`] does.
pub fn normalize_key(key: &mut Key) {
    if let Key::Group(group) = key {
        fill_up(&mut group.content);
        for child in &mut group.content {
            normalize_key(child);
        }
    }
}
