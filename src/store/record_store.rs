use async_trait::async_trait;

use super::error::StoreError;

/// Port for a small keyed store of serialized records.
///
/// This is the host-side counterpart of browser `localStorage`: string
/// values under string keys, typically a single JSON document per key.
/// Writes may fail with [`StoreError::QuotaExceeded`] when the backend is
/// size-limited.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
