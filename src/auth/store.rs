//! Durable key-value storage for session state.
//!
//! The session store persists exactly two keys: the bearer token (raw
//! string) and the serialized user profile (JSON), both under an
//! application-specific prefix. The trait exists so the session store
//! can be exercised in tests against an in-memory fake, and so demo
//! mode never touches the real config directory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::config::APP_NAME;

/// Storage key for the raw bearer token.
pub const TOKEN_KEY: &str = "dormdesk_token";

/// Storage key for the serialized user profile.
pub const USER_KEY: &str = "dormdesk_user";

/// A process-wide, single-writer key-value store. Reads return absent
/// and writes are no-ops when the backing medium is unavailable; they
/// never fail.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed store: one file per key under the platform config
/// directory. When no config directory exists (stripped-down containers,
/// odd platforms), every read is absent and every write a no-op.
pub struct FileStore {
    dir: Option<PathBuf>,
}

impl FileStore {
    pub fn new() -> Self {
        let dir = dirs::config_dir().map(|d| d.join(APP_NAME));
        if dir.is_none() {
            warn!("No config directory available; session will not persist");
        }
        Self { dir }
    }

    /// Store rooted at an explicit directory (tests).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(key))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key)?;
        std::fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(path) = self.path(key) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(key, error = %e, "Failed to create session directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, value) {
            warn!(key, error = %e, "Failed to persist session key");
        }
    }

    fn remove(&self, key: &str) {
        let Some(path) = self.path(key) else {
            return;
        };
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(key, error = %e, "Failed to remove session key");
            } else {
                debug!(key, "Removed session key");
            }
        }
    }
}

/// In-memory store for tests and for demo mode, where nothing should
/// outlive the process.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(TOKEN_KEY), None);

        store.set(TOKEN_KEY, "t1");
        assert_eq!(store.get(TOKEN_KEY), Some("t1".to_string()));

        store.remove(TOKEN_KEY);
        assert_eq!(store.get(TOKEN_KEY), None);

        // Removing an absent key is a no-op, not an error
        store.remove(TOKEN_KEY);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::with_dir(dir.path().to_path_buf());

        assert_eq!(store.get(USER_KEY), None);
        store.set(USER_KEY, r#"{"id":1}"#);
        assert_eq!(store.get(USER_KEY), Some(r#"{"id":1}"#.to_string()));
        store.remove(USER_KEY);
        assert_eq!(store.get(USER_KEY), None);
    }

    #[test]
    fn test_file_store_without_directory_is_inert() {
        let store = FileStore { dir: None };
        store.set(TOKEN_KEY, "t1");
        assert_eq!(store.get(TOKEN_KEY), None);
        store.remove(TOKEN_KEY);
    }
}
