//! Persisted token storage
//!
//! A small named-entry store backed by a JSON file, the CLI analogue of
//! origin-scoped browser storage. Holds exactly two well-known entries, the
//! access and refresh tokens. The store enforces no expiry of its own;
//! staleness is the caller's concern.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Result, TrackError};

/// Entry name of the short-lived access token.
pub const ACCESS_TOKEN: &str = "access_token";
/// Entry name of the long-lived refresh token.
pub const REFRESH_TOKEN: &str = "refresh_token";

/// Handle shared between the HTTP client and the session manager. The two
/// persisted tokens are a process-wide singleton.
pub type SharedTokenStore = Arc<Mutex<TokenStore>>;

/// File-backed named string entries.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TokenStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            entries: BTreeMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Wrap into the shared handle used across client and session manager.
    pub fn into_shared(self) -> SharedTokenStore {
        Arc::new(Mutex::new(self))
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.entries.insert(name.to_string(), value.to_string());
        self.save()
    }

    pub fn clear(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name);
        self.save()
    }

    /// Remove every entry. Both tokens are always cleared together on
    /// logout or an irrecoverable refresh failure.
    pub fn clear_all(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| TrackError::io("Failed to read token storage", e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(());
        }

        self.entries = serde_json::from_str(&content)
            .map_err(|e| TrackError::io("Failed to parse token storage", e.to_string()))?;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TrackError::io("Failed to create storage directory", e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)
            .map_err(|e| TrackError::io("Failed to write token storage", e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let mut store = TokenStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN, "a-token").unwrap();
        store.set(REFRESH_TOKEN, "r-token").unwrap();
        drop(store);

        let store = TokenStore::open(&path).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN).as_deref(), Some("a-token"));
        assert_eq!(store.get(REFRESH_TOKEN).as_deref(), Some("r-token"));
    }

    #[test]
    fn clear_all_removes_both_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let mut store = TokenStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN, "a").unwrap();
        store.set(REFRESH_TOKEN, "r").unwrap();
        store.clear_all().unwrap();

        assert!(store.get(ACCESS_TOKEN).is_none());
        assert!(store.get(REFRESH_TOKEN).is_none());

        let reopened = TokenStore::open(&path).unwrap();
        assert!(reopened.get(ACCESS_TOKEN).is_none());
    }

    #[test]
    fn clear_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TokenStore::open(dir.path().join("t.json")).unwrap();
        store.set(ACCESS_TOKEN, "a").unwrap();
        store.set(REFRESH_TOKEN, "r").unwrap();
        store.clear(ACCESS_TOKEN).unwrap();
        assert!(store.get(ACCESS_TOKEN).is_none());
        assert_eq!(store.get(REFRESH_TOKEN).as_deref(), Some("r"));
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.get(ACCESS_TOKEN).is_none());
    }
}
