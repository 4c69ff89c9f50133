//! Navigation through the nested grid.
//!
//! The navigation stack is a breadcrumb of frames, each addressing a group
//! by its index path from the root plus the page currently in view. Groups
//! are never referenced by pointer, so append and trim operations on the
//! tree cannot dangle a frame; paths are resolved against the tree on every
//! access.
//!
//! The stack is never empty: frame 0 is always the root at some page, and
//! going back on the root at page 0 is a no-op.

use crate::constants::PAGE_SIZE;
use crate::models::{grid, Key, MacroTree};
use anyhow::{bail, Context, Result};

/// One breadcrumb entry: a group (by index path) and the page in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Content indices from the root to this group; empty for the root
    pub path: Vec<usize>,
    /// Page currently in view (0-based)
    pub page: usize,
}

/// The breadcrumb stack. Sole authority on which keys are visible.
#[derive(Debug, Clone)]
pub struct NavStack {
    frames: Vec<Frame>,
}

/// Resolves the content list of the group at `path`.
pub fn content_at_path<'t>(tree: &'t MacroTree, path: &[usize]) -> Result<&'t Vec<Key>> {
    let mut content = &tree.content;
    for &index in path {
        match content.get(index) {
            Some(Key::Group(group)) => content = &group.content,
            Some(_) => bail!("Key at index {index} is not a group"),
            None => bail!("Index {index} is out of range"),
        }
    }
    Ok(content)
}

/// Resolves the content list of the group at `path`, mutably.
pub fn content_at_path_mut<'t>(
    tree: &'t mut MacroTree,
    path: &[usize],
) -> Result<&'t mut Vec<Key>> {
    let mut content = &mut tree.content;
    for &index in path {
        match content.get_mut(index) {
            Some(Key::Group(group)) => content = &mut group.content,
            Some(_) => bail!("Key at index {index} is not a group"),
            None => bail!("Index {index} is out of range"),
        }
    }
    Ok(content)
}

/// Resolves the label of the group at `path` (the root label for an empty
/// path).
pub fn label_at_path<'t>(tree: &'t MacroTree, path: &[usize]) -> Result<&'t str> {
    if path.is_empty() {
        return Ok(&tree.label);
    }
    let (last, parents) = path.split_last().expect("path is non-empty");
    let content = content_at_path(tree, parents)?;
    match content.get(*last) {
        Some(Key::Group(group)) => Ok(&group.label),
        Some(_) => bail!("Key at index {last} is not a group"),
        None => bail!("Index {last} is out of range"),
    }
}

impl NavStack {
    /// Creates a stack positioned on the root at page 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                path: Vec::new(),
                page: 0,
            }],
        }
    }

    /// Current breadcrumb depth (always >= 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The frame currently in view.
    #[must_use]
    pub fn current(&self) -> &Frame {
        self.frames.last().expect("navigation stack is never empty")
    }

    fn current_mut(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("navigation stack is never empty")
    }

    /// Returns to the root at page 0, dropping all deeper frames.
    pub fn reset(&mut self) {
        self.frames.truncate(1);
        let root = self.current_mut();
        root.path.clear();
        root.page = 0;
    }

    /// The labels along the breadcrumb, root first.
    pub fn breadcrumb<'t>(&self, tree: &'t MacroTree) -> Result<Vec<&'t str>> {
        self.frames
            .iter()
            .map(|frame| label_at_path(tree, &frame.path))
            .collect()
    }

    /// The keys visible on the current page.
    pub fn visible_page<'t>(&self, tree: &'t MacroTree) -> Result<&'t [Key]> {
        let frame = self.current();
        let content = content_at_path(tree, &frame.path)?;
        Ok(grid::page_slice(content, frame.page))
    }

    /// Opens the group at in-page index `slot`, descending one level.
    ///
    /// The target group's content is padded first if it is empty or not a
    /// multiple of the chunk size.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot does not hold a group key.
    pub fn descend(&mut self, tree: &mut MacroTree, slot: usize) -> Result<()> {
        if slot >= PAGE_SIZE {
            bail!("Slot {slot} is outside the page");
        }
        let frame = self.current();
        let absolute = frame.page * PAGE_SIZE + slot;
        let mut path = frame.path.clone();
        path.push(absolute);

        let content = content_at_path(tree, &frame.path)?;
        match content.get(absolute) {
            Some(Key::Group(_)) => {}
            Some(_) => bail!("Key at slot {slot} is not a group"),
            None => bail!("Slot {slot} is out of range"),
        }

        let group_content = content_at_path_mut(tree, &path)
            .context("Failed to resolve the group being opened")?;
        grid::fill_up(group_content);

        self.frames.push(Frame { path, page: 0 });
        Ok(())
    }

    /// Pops the current frame. No-op on the root; returns whether a frame
    /// was popped.
    pub fn ascend(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            return true;
        }
        false
    }

    /// Advances to the next page, appending a blank chunk when paginating
    /// beyond the current end.
    pub fn next(&mut self, tree: &mut MacroTree) -> Result<()> {
        let path = self.current().path.clone();
        let content = content_at_path_mut(tree, &path)?;
        let page = self.current().page + 1;
        if page >= grid::pages(content.len()) {
            grid::append_empty_chunk(content);
        }
        self.current_mut().page = page;
        Ok(())
    }

    /// Goes back one page, trimming a trailing blank chunk afterwards.
    ///
    /// On page 0 this ascends out of the group instead; on the root at
    /// page 0 it is a no-op.
    pub fn prev(&mut self, tree: &mut MacroTree) -> Result<()> {
        if self.current().page > 0 {
            self.current_mut().page -= 1;
            let path = self.current().path.clone();
            let content = content_at_path_mut(tree, &path)?;
            grid::trim_trailing_empty_chunk(content);
        } else {
            self.ascend();
        }
        Ok(())
    }

    /// Advances to the next page during a drag. Like [`Self::next`], and
    /// kept separate so drags never trim.
    pub fn drag_next(&mut self, tree: &mut MacroTree) -> Result<()> {
        self.next(tree)
    }

    /// Goes back one page during a drag, without trimming and without
    /// leaving the group.
    pub fn drag_prev(&mut self) {
        let frame = self.current_mut();
        frame.page = frame.page.saturating_sub(1);
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}
