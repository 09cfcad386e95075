use async_trait::async_trait;

use super::error::StoreError;

/// Port for a keyed store of binary pixel data.
///
/// The host-side counterpart of an IndexedDB object store keyed by photo
/// id. A backend may be entirely unavailable; callers learn this from
/// [`BlobStore::probe`] before first use.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Checks that the backend can be opened and written.
    async fn probe(&self) -> Result<(), StoreError>;

    async fn put(&self, id: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Returns the bytes stored under `id`, or `None` if absent.
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Deletes `id`. Deleting an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Deletes every blob.
    async fn clear(&self) -> Result<(), StoreError>;
}
