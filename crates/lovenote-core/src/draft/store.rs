use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use lovenote_types::error::RepositoryError;

/// Persistence interface for draft slots.
///
/// Values are opaque JSON. Uses RPITIT (native async fn in traits)
/// consistent with the repository traits.
pub trait DraftStore: Send + Sync {
    /// Load the value stored under `key`, `None` if the slot is empty.
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Store `value` under `key`, overwriting any prior value.
    fn save(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the slot. No-op if it does not exist.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Fail-soft access to a [`DraftStore`].
///
/// No operation here ever returns an error: a missing, corrupt or
/// unreachable slot reads as the fallback, and failed writes are logged and
/// reported as `false` so the caller carries on memory-only.
pub struct Drafts<S: DraftStore> {
    store: Arc<S>,
}

impl<S: DraftStore> Clone for Drafts<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DraftStore> Drafts<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The stored value under `key` if present and of the requested shape,
    /// else `fallback`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.store.load(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding unreadable draft slot");
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!(key, error = %e, "draft store unavailable, using fallback");
                fallback
            }
        }
    }

    /// Serialize and store `value` under `key`. Returns whether it persisted.
    pub async fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "draft value is not serializable");
                return false;
            }
        };
        match self.store.save(key, &json).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "draft write failed, keeping memory-only");
                false
            }
        }
    }

    /// Remove the slot. Returns whether the removal reached the store.
    pub async fn clear(&self, key: &str) -> bool {
        match self.store.remove(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "draft clear failed");
                false
            }
        }
    }

    /// Open a typed, write-through mirror of one slot.
    pub async fn slot<T>(&self, key: impl Into<String>, fallback: T) -> DraftSlot<S, T>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = key.into();
        let value = self.read(&key, fallback).await;
        DraftSlot {
            drafts: self.clone(),
            key,
            value,
        }
    }
}

/// In-memory value mirrored to a durable slot.
///
/// Every mutation goes through [`DraftSlot::set`] or [`DraftSlot::update`],
/// which persist before returning.
pub struct DraftSlot<S: DraftStore, T> {
    drafts: Drafts<S>,
    key: String,
    value: T,
}

impl<S: DraftStore, T: Serialize + DeserializeOwned> DraftSlot<S, T> {
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn set(&mut self, value: T) -> bool {
        self.value = value;
        self.drafts.write(&self.key, &self.value).await
    }

    /// Mutate in place, then write through.
    pub async fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        f(&mut self.value);
        self.drafts.write(&self.key, &self.value).await
    }

    /// Replace the in-memory value with `value` and remove the durable slot.
    pub async fn clear(&mut self, value: T) -> bool {
        self.value = value;
        self.drafts.clear(&self.key).await
    }
}
