//! Local key-value store.
//!
//! A small, single-file string store in the platform config directory.
//! The controller persists the working tree here under the `macros` key
//! after every accepted mutation, so the last state survives restarts
//! without the device being connected.

use crate::config::Config;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed string-to-string store.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl KvStore {
    /// Opens the store at `path`. A missing file yields an empty store; an
    /// unreadable one is logged and treated as empty rather than blocking
    /// startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "store file is corrupt, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    /// Opens the store at its default location in the config directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(Config::config_dir()?.join("store.json")))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Writes `value` under `key` and persists the store.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.into(), value.into());
        self.save()
    }

    /// Removes `key` and persists the store.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Writes the store via a temp file and rename.
    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.entries).context("Failed to encode store")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("store.json"));
        assert_eq!(store.get("macros"), None);
    }

    #[test]
    fn test_set_get_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = KvStore::open(&path);
        store.set("macros", r#"{"label":"Macros"}"#).unwrap();
        assert_eq!(store.get("macros"), Some(r#"{"label":"Macros"}"#));

        let reopened = KvStore::open(&path);
        assert_eq!(reopened.get("macros"), Some(r#"{"label":"Macros"}"#));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let store = KvStore::open(&path);
        assert_eq!(store.get("macros"), None);
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = KvStore::open(dir.path().join("store.json"));
        store.set("macros", "x").unwrap();
        store.remove("macros").unwrap();
        assert_eq!(store.get("macros"), None);

        // Removing an absent key is fine
        store.remove("macros").unwrap();
    }

    #[test]
    fn test_set_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = KvStore::open(&path);
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
