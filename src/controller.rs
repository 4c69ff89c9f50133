//! The controller: glue between view intents, the tree, and the device.
//!
//! Holds the one root tree and the navigation stack. User intents from
//! the renderer arrive through [`Controller::on_intent`]; frames from the
//! device arrive by draining [`Controller::pump`]. Every accepted mutation
//! ends with the root tree re-serialized into the local store, so closing
//! the application never loses work.
//!
//! The renderer observes plain snapshots (`visible_page`, `breadcrumb`)
//! and never holds references into the tree.

use crate::constants::{PAGE_SIZE, STORE_KEY_MACROS};
use crate::models::{grid, DeviceSettings, Key, MacroTree};
use crate::parser::nested;
use crate::services::{apply_edit, EditOutcome, NavStack};
use crate::services::navigation::content_at_path_mut;
use crate::store::KvStore;
use crate::transport::{protocol, Command, LinkEvent, LinkState, Request, SerialLink};
use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

/// A user intent delivered by the renderer. Each intent runs to completion
/// synchronously except `DeviceCommand`, which returns once the send is
/// accepted by the port.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Show the next page, growing the grid past its end
    Next,
    /// Show the previous page, or leave the group on page 0
    Prev,
    /// Page forward during a drag (no trimming)
    DragNext,
    /// Page backward during a drag (no trimming, no ascend)
    DragPrev,
    /// Open the group at the given in-page slot
    Open(usize),
    /// Commit (`Some`) or cancel (`None`) an edit of the given slot
    Edit(usize, Option<Key>),
    /// Clear the key at the given slot to blank
    Delete(usize),
    /// Replay a permutation of the visible page (sortable collaborator)
    Reorder(Vec<usize>),
    /// Start over with an empty tree
    New,
    /// Replace the tree from nested JSON (file open)
    Load(String),
    /// Open the serial link on the given port
    Connect(String),
    /// Close the serial link
    Disconnect,
    /// Send a device command; `SetMacros` carries the current tree
    DeviceCommand(Command),
}

/// User-visible outcome of a device frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The link came up or went down
    ConnectionChanged(bool),
    /// The device reported an error; shown verbatim
    DeviceError(String),
    /// The device reported a warning
    DeviceWarning(String),
    /// A free-form status acknowledgment
    Status(String),
    /// The working tree was replaced by a device transfer
    TreeReplaced,
}

/// Central state holder wiring the model, navigation, store and transport.
pub struct Controller {
    tree: MacroTree,
    nav: NavStack,
    store: KvStore,
    link: SerialLink,
    usb_enabled: Option<bool>,
    device_version: Option<String>,
    device_settings: Option<DeviceSettings>,
}

impl Controller {
    /// Creates a controller from the local store. A stored tree that fails
    /// to parse is logged and replaced by an empty root.
    #[must_use]
    pub fn new(store: KvStore) -> Self {
        let tree = match store.get(STORE_KEY_MACROS) {
            Some(json) => nested::from_json(json).unwrap_or_else(|e| {
                warn!(error = %e, "stored tree is invalid, starting empty");
                MacroTree::empty()
            }),
            None => MacroTree::empty(),
        };

        Self {
            tree,
            nav: NavStack::new(),
            store,
            link: SerialLink::new(),
            usb_enabled: None,
            device_version: None,
            device_settings: None,
        }
    }

    /// The working tree.
    #[must_use]
    pub const fn tree(&self) -> &MacroTree {
        &self.tree
    }

    /// Breadcrumb depth (>= 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nav.depth()
    }

    /// Page index of the current view.
    #[must_use]
    pub fn page(&self) -> usize {
        self.nav.current().page
    }

    /// Snapshot of the keys currently visible (always one full page).
    pub fn visible_page(&self) -> Result<Vec<Key>> {
        Ok(self.nav.visible_page(&self.tree)?.to_vec())
    }

    /// Labels along the breadcrumb, root first.
    pub fn breadcrumb(&self) -> Result<Vec<String>> {
        Ok(self
            .nav
            .breadcrumb(&self.tree)?
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// USB-storage flag received in the connection handshake, if any.
    #[must_use]
    pub const fn usb_enabled(&self) -> Option<bool> {
        self.usb_enabled
    }

    /// Firmware version received in the connection handshake, if any.
    #[must_use]
    pub fn device_version(&self) -> Option<&str> {
        self.device_version.as_deref()
    }

    /// Device settings received via `get_settings`, if any.
    #[must_use]
    pub const fn device_settings(&self) -> Option<&DeviceSettings> {
        self.device_settings.as_ref()
    }

    /// Current transport state.
    #[must_use]
    pub const fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Serializes the working tree into its nested JSON form (file save).
    pub fn save(&self) -> Result<String> {
        nested::to_json(&self.tree)
    }

    /// Runs one user intent to completion.
    pub fn on_intent(&mut self, intent: Intent) -> Result<()> {
        debug!(?intent, "intent");
        match intent {
            Intent::Next => {
                self.nav.next(&mut self.tree)?;
                self.persist()
            }
            Intent::Prev => {
                self.nav.prev(&mut self.tree)?;
                self.persist()
            }
            Intent::DragNext => {
                self.nav.drag_next(&mut self.tree)?;
                self.persist()
            }
            Intent::DragPrev => {
                self.nav.drag_prev();
                Ok(())
            }
            Intent::Open(slot) => {
                self.nav.descend(&mut self.tree, slot)?;
                self.persist()
            }
            Intent::Edit(slot, proposal) => self.edit(slot, proposal),
            Intent::Delete(slot) => {
                let key = self.slot_mut(slot)?;
                key.degrade_to_blank();
                self.persist()
            }
            Intent::Reorder(permutation) => self.reorder(&permutation),
            Intent::New => {
                self.tree = MacroTree::empty();
                self.nav.reset();
                self.persist()
            }
            Intent::Load(json) => {
                let tree = nested::from_json(&json).context("Load aborted")?;
                self.tree = tree;
                self.nav.reset();
                self.persist()
            }
            Intent::Connect(port) => {
                self.link.open(&port)?;
                Ok(())
            }
            Intent::Disconnect => {
                self.link.close();
                Ok(())
            }
            Intent::DeviceCommand(command) => self.device_command(command),
        }
    }

    /// Drains pending link events and returns the user-visible notices.
    pub fn pump(&mut self) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        for event in self.link.poll() {
            if let Some(notice) = self.handle_event(event)? {
                notices.push(notice);
            }
        }
        Ok(notices)
    }

    fn edit(&mut self, slot: usize, proposal: Option<Key>) -> Result<()> {
        let key = self.slot_mut(slot)?;
        let outcome = apply_edit(key, proposal)?;
        match outcome {
            EditOutcome::Cancelled => Ok(()),
            EditOutcome::Cleared | EditOutcome::Replaced => self.persist(),
        }
    }

    fn reorder(&mut self, permutation: &[usize]) -> Result<()> {
        let frame = self.nav.current().clone();
        let content = content_at_path_mut(&mut self.tree, &frame.path)?;
        grid::reorder_page(content, frame.page, permutation)?;
        grid::trim_beyond_page(content, frame.page);
        self.persist()
    }

    fn device_command(&mut self, command: Command) -> Result<()> {
        let request = match command {
            Command::SetMacros => {
                let tree = serde_json::to_value(&self.tree)?;
                Request::with_content(command, tree)
            }
            Command::SetSettings => {
                let settings = self
                    .device_settings
                    .as_ref()
                    .context("No device settings known; issue get_settings first")?;
                Request::with_content(command, serde_json::to_value(settings)?)
            }
            _ => Request::new(command),
        };
        self.link.send(&request)?;
        Ok(())
    }

    /// Resolves the key at an in-page slot of the current view.
    fn slot_mut(&mut self, slot: usize) -> Result<&mut Key> {
        if slot >= PAGE_SIZE {
            bail!("Slot {slot} is outside the page");
        }
        let frame = self.nav.current().clone();
        let content = content_at_path_mut(&mut self.tree, &frame.path)?;
        let absolute = frame.page * PAGE_SIZE + slot;
        content
            .get_mut(absolute)
            .with_context(|| format!("Slot {slot} is out of range"))
    }

    fn handle_event(&mut self, event: LinkEvent) -> Result<Option<Notice>> {
        match event {
            LinkEvent::Opened => Ok(Some(Notice::ConnectionChanged(true))),
            LinkEvent::Closed => Ok(Some(Notice::ConnectionChanged(false))),
            LinkEvent::DecodeError(_) => Ok(None),
            LinkEvent::Frame(response) => self.handle_response(response),
        }
    }

    fn handle_response(
        &mut self,
        response: crate::transport::Response,
    ) -> Result<Option<Notice>> {
        use crate::transport::Response;
        match response {
            Response::Err(message) => Ok(Some(Notice::DeviceError(message))),
            Response::Warn(message) => Ok(Some(Notice::DeviceWarning(message))),
            Response::Ack { tag, content } => match tag.as_str() {
                protocol::ACK_MACROS => {
                    let Some(content) = content else {
                        warn!("macros frame without content, dropped");
                        return Ok(None);
                    };
                    match nested::from_value(content) {
                        Ok(tree) => {
                            self.tree = tree;
                            self.nav.reset();
                            self.persist()?;
                            Ok(Some(Notice::TreeReplaced))
                        }
                        Err(e) => {
                            warn!(error = %e, "invalid macros frame, tree unchanged");
                            Ok(None)
                        }
                    }
                }
                protocol::ACK_USB_ENABLED => {
                    self.usb_enabled = content.as_ref().and_then(serde_json::Value::as_bool);
                    Ok(None)
                }
                protocol::ACK_VERSION => {
                    self.device_version = content
                        .as_ref()
                        .and_then(serde_json::Value::as_str)
                        .map(String::from);
                    Ok(None)
                }
                protocol::ACK_SETTINGS => {
                    match content.map(serde_json::from_value::<DeviceSettings>) {
                        Some(Ok(settings)) => self.device_settings = Some(settings),
                        Some(Err(e)) => warn!(error = %e, "invalid settings frame, dropped"),
                        None => warn!("settings frame without content, dropped"),
                    }
                    Ok(None)
                }
                _ => Ok(Some(Notice::Status(tag))),
            },
        }
    }

    /// Re-serializes the root tree into the local store.
    fn persist(&mut self) -> Result<()> {
        let json = nested::to_json(&self.tree)?;
        self.store
            .set(STORE_KEY_MACROS, json)
            .context("Failed to persist the working tree")
    }
}
