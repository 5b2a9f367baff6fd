//! Session-scoped scroll offsets.
//!
//! Offsets are saved under `scroll-position:<view>` before navigating away
//! and consumed exactly once when the view mounts again.

use super::persist::{MemoryStorage, StorageBackend};
use super::state::View;
use log::*;

pub fn scroll_position_key(view: View) -> String {
    format!("scroll-position:{}", view.as_str())
}

/// Session storage wrapper for one-shot scroll restores.
///
#[derive(Debug, Clone, Default)]
pub struct SessionStore<B: StorageBackend = MemoryStorage> {
    backend: B,
}

impl SessionStore<MemoryStorage> {
    pub fn new() -> Self {
        SessionStore {
            backend: MemoryStorage::new(),
        }
    }
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn with_backend(backend: B) -> Self {
        SessionStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Remember the pixel offset of `view`. Failures are logged and dropped.
    ///
    pub fn save_scroll_position(&mut self, view: View, offset: u64) {
        let key = scroll_position_key(view);
        match self.backend.set(&key, &offset.to_string()) {
            Ok(()) => debug!("Saved scroll offset {} for {}", offset, view.as_str()),
            Err(e) => warn!("Could not save scroll offset for {}: {}", view.as_str(), e),
        }
    }

    /// Read the saved offset without consuming it.
    ///
    pub fn peek_scroll_position(&self, view: View) -> Option<u64> {
        let key = scroll_position_key(view);
        match self.backend.get(&key) {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read scroll offset for {}: {}", view.as_str(), e);
                None
            }
        }
    }

    /// Read and clear the saved offset. A malformed value is discarded.
    ///
    pub fn take_scroll_position(&mut self, view: View) -> Option<u64> {
        let key = scroll_position_key(view);
        let raw = match self.backend.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read scroll offset for {}: {}", view.as_str(), e);
                return None;
            }
        };
        if let Err(e) = self.backend.remove(&key) {
            warn!("Could not clear scroll offset for {}: {}", view.as_str(), e);
        }
        match raw.trim().parse::<u64>() {
            Ok(offset) => Some(offset),
            Err(_) => {
                warn!("Discarding malformed scroll offset '{}' for {}", raw, view.as_str());
                None
            }
        }
    }
}
