use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use lovenote_types::error::RepositoryError;

use super::DraftStore;

/// Process-local draft store.
///
/// Used when no data directory is available and as the test fake. Can be
/// switched to "unavailable" to exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slots: Mutex<HashMap<String, serde_json::Value>>,
    unavailable: AtomicBool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Put a raw value in a slot, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: serde_json::Value) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots
            .lock()
            .map(|slots| slots.contains_key(key))
            .unwrap_or(false)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Connection)
        } else {
            Ok(())
        }
    }
}

impl DraftStore for MemoryDraftStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>, RepositoryError> {
        self.check()?;
        let slots = self
            .slots
            .lock()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), RepositoryError> {
        self.check()?;
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        slots.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        self.check()?;
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        slots.remove(key);
        Ok(())
    }
}
