//! Key-value storage backends and the persisted store layout.
//!
//! Only preferences and the UI filter/expansion slice are written. The
//! layout is a versioned JSON envelope:
//!
//! ```json
//! { "state": { "preferences": { ... }, "ui": { "selectedFilters": [], "expandedSections": [] } }, "version": 1 }
//! ```

use super::state::{UiState, UserPreferences};
use super::StoreError;
use log::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Key the persisted slices are stored under.
pub const STORE_KEY: &str = "canvas-store";

/// Current persisted layout version.
pub const STORE_VERSION: u32 = 1;

/// String key-value storage, the shape of `localStorage`/`sessionStorage`.
///
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage. Used for session scope and in tests.
///
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    ///
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_err = |e| StoreError::WriteFailed {
            key: key.to_string(),
            source: e,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut file = fs::File::create(self.path_for(key)).map_err(write_err)?;
        write!(file, "{}", value).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteFailed {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// The slices that survive a reload.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub preferences: UserPreferences,
    pub ui: UiState,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Serialize the persisted slices into the storage envelope.
///
pub fn encode(state: &PersistedState) -> Result<String, StoreError> {
    let envelope = Envelope {
        state: state.clone(),
        version: STORE_VERSION,
    };
    serde_json::to_string(&envelope).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Parse a storage envelope. Unknown older versions are accepted as long as
/// the shape still parses; missing fields fall back to defaults.
///
pub fn decode(raw: &str) -> Result<PersistedState, StoreError> {
    let envelope: Envelope =
        serde_json::from_str(raw).map_err(|e| StoreError::Deserialization(e.to_string()))?;
    if envelope.version != STORE_VERSION {
        debug!(
            "Migrating persisted store from version {} to {}",
            envelope.version, STORE_VERSION
        );
    }
    Ok(envelope.state)
}
