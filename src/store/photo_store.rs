//! # Persistent Photo Store
//!
//! Facade over the two persistence backends of the album:
//!
//! - a [`RecordStore`] holding the ordered photo metadata as one JSON
//!   document under a fixed key, and
//! - an optional [`BlobStore`] holding the compressed pixels keyed by blob id.
//!
//! The blob backend is preferred. It is probed once, lazily, and the first
//! failure (probe, read or write) permanently switches the session to
//! [`Backend::Inline`], where pixels travel inside the metadata records as
//! `data:` URLs. The user is told about the switch exactly once.
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use keepsake::notification::notifier::LogNotifier;
//! use keepsake::store::memory::{
//!     memory_blob_store::MemoryBlobStore, memory_record_store::MemoryRecordStore,
//! };
//! use keepsake::store::photo_store::{PhotoStore, Placement};
//!
//! # async fn run() {
//! let mut store = PhotoStore::new(
//!     Arc::new(MemoryRecordStore::new()),
//!     Some(Arc::new(MemoryBlobStore::new())),
//!     "album",
//!     Arc::new(LogNotifier),
//! );
//! assert_eq!(store.put("photo-1", b"jpeg bytes").await, Placement::Blob);
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{blob_store::BlobStore, error::StoreError, record_store::RecordStore};
use crate::image::geometry::Orientation;
use crate::notification::{notice::Notice, notifier::Notifier};

/// One persisted photo.
///
/// In blob mode `data_url` is absent and pixels live under `blob_id`; in
/// inline mode `data_url` carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, alias = "type")]
    pub orientation: Orientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

impl PhotoRecord {
    /// Key of the pixel blob; defaults to the photo id.
    pub fn blob_key(&self) -> &str {
        self.blob_id.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AlbumState {
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

/// The backend serving pixel data for the rest of the session.
#[derive(Clone)]
pub enum Backend {
    Blob(Arc<dyn BlobStore>),
    Inline,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(_) => f.write_str("Blob"),
            Self::Inline => f.write_str("Inline"),
        }
    }
}

/// Where [`PhotoStore::put`] left the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Blob,
    /// The caller must carry the pixels inline in the metadata.
    Inline,
}

pub struct PhotoStore {
    records: Arc<dyn RecordStore>,
    key: String,
    candidate: Option<Arc<dyn BlobStore>>,
    backend: Option<Backend>,
    notifier: Arc<dyn Notifier>,
    warned: bool,
}

impl PhotoStore {
    /// `blobs = None` runs inline from the start, without a notice.
    pub fn new(
        records: Arc<dyn RecordStore>,
        blobs: Option<Arc<dyn BlobStore>>,
        key: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            records,
            key: key.into(),
            candidate: blobs,
            backend: None,
            notifier,
            warned: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The resolved backend, `None` before [`Self::ensure_ready`].
    pub fn backend(&self) -> Option<&Backend> {
        self.backend.as_ref()
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.backend, Some(Backend::Inline))
    }

    /// Resolves the backend on first call. Returns `true` when the blob
    /// backend is in use.
    pub async fn ensure_ready(&mut self) -> bool {
        if let Some(backend) = &self.backend {
            return matches!(backend, Backend::Blob(_));
        }

        let Some(blobs) = self.candidate.clone() else {
            debug!("no blob backend configured; storing photos inline");
            self.backend = Some(Backend::Inline);
            return false;
        };

        match blobs.probe().await {
            Ok(()) => {
                debug!("blob backend ready");
                self.backend = Some(Backend::Blob(blobs));
                true
            }
            Err(e) => {
                self.downgrade(&e).await;
                false
            }
        }
    }

    /// Switches to [`Backend::Inline`] for the rest of the session.
    ///
    /// The compatibility notice is raised only on the first downgrade.
    pub async fn downgrade(&mut self, cause: &StoreError) {
        if !self.is_inline() {
            warn!(error = %cause, "blob backend failed; switching to inline storage");
        }
        self.backend = Some(Backend::Inline);
        if !self.warned {
            self.warned = true;
            self.notifier.notify(Notice::CompatibilityMode).await;
        }
    }

    fn blobs(&self) -> Option<Arc<dyn BlobStore>> {
        match &self.backend {
            Some(Backend::Blob(b)) => Some(b.clone()),
            _ => None,
        }
    }

    /// Stores pixel data under `blob_id`.
    ///
    /// Never loses the photo: when the blob write fails the store
    /// downgrades and answers [`Placement::Inline`]. Quota exhaustion also
    /// raises the storage-full notice.
    pub async fn put(&mut self, blob_id: &str, bytes: &[u8]) -> Placement {
        if !self.ensure_ready().await {
            return Placement::Inline;
        }
        let Some(blobs) = self.blobs() else {
            return Placement::Inline;
        };

        match blobs.put(blob_id, bytes).await {
            Ok(()) => Placement::Blob,
            Err(e) => {
                let quota = e.is_quota();
                self.downgrade(&e).await;
                if quota {
                    self.notifier.notify(Notice::StorageFull).await;
                }
                Placement::Inline
            }
        }
    }

    /// Reads pixel data. Always `Ok(None)` in inline mode.
    ///
    /// # Errors
    /// A failed read downgrades the store and returns the cause.
    pub async fn get(&mut self, blob_id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if !self.ensure_ready().await {
            return Ok(None);
        }
        let Some(blobs) = self.blobs() else {
            return Ok(None);
        };
        match blobs.get(blob_id).await {
            Ok(found) => Ok(found),
            Err(e) => {
                self.downgrade(&e).await;
                Err(e)
            }
        }
    }

    /// Deletes pixel data. A no-op in inline mode.
    ///
    /// # Errors
    /// A failed delete downgrades the store and returns the cause.
    pub async fn delete(&mut self, blob_id: &str) -> Result<(), StoreError> {
        let Some(blobs) = self.blobs() else {
            return Ok(());
        };
        if let Err(e) = blobs.delete(blob_id).await {
            self.downgrade(&e).await;
            return Err(e);
        }
        Ok(())
    }

    /// Deletes every blob. A no-op in inline mode.
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        if !self.ensure_ready().await {
            return Ok(());
        }
        let Some(blobs) = self.blobs() else {
            return Ok(());
        };
        if let Err(e) = blobs.clear().await {
            self.downgrade(&e).await;
            return Err(e);
        }
        Ok(())
    }

    /// Loads the ordered metadata records.
    ///
    /// Missing, unreadable or malformed metadata yields an empty list.
    pub async fn load_metadata(&self) -> Vec<PhotoRecord> {
        let raw = match self.records.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, key = %self.key, "failed to read album metadata");
                return Vec::new();
            }
        };
        match serde_json::from_str::<AlbumState>(&raw) {
            Ok(state) => state.photos,
            Err(e) => {
                warn!(error = %e, key = %self.key, "ignoring malformed album metadata");
                Vec::new()
            }
        }
    }

    /// Replaces the persisted metadata with `records`, in order.
    ///
    /// # Errors
    /// Propagates the record store failure, e.g. [`StoreError::QuotaExceeded`].
    pub async fn save_metadata(&self, records: &[PhotoRecord]) -> Result<(), StoreError> {
        let state = AlbumState {
            photos: records.to_vec(),
        };
        let json = serde_json::to_string(&state)
            .map_err(|e| StoreError::Unavailable(format!("serialize metadata: {e}")))?;
        self.records.set(&self.key, &json).await?;
        info!(photos = records.len(), bytes = json.len(), "album metadata saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::notifier::testing::RecordingNotifier;
    use crate::store::memory::{
        memory_blob_store::MemoryBlobStore, memory_record_store::MemoryRecordStore,
    };

    const KEY: &str = "album_mvp_step_v6_collage_4_adaptive_2x3";

    struct Fixture {
        records: Arc<MemoryRecordStore>,
        blobs: Arc<MemoryBlobStore>,
        notifier: Arc<RecordingNotifier>,
        store: PhotoStore,
    }

    fn fixture(blobs: MemoryBlobStore) -> Fixture {
        let records = Arc::new(MemoryRecordStore::new());
        let blobs = Arc::new(blobs);
        let notifier = Arc::new(RecordingNotifier::default());
        let store = PhotoStore::new(records.clone(), Some(blobs.clone()), KEY, notifier.clone());
        Fixture {
            records,
            blobs,
            notifier,
            store,
        }
    }

    fn record(id: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.into(),
            created_at: 1_700_000_000_000,
            orientation: Orientation::Portrait,
            blob_id: Some(id.into()),
            data_url: None,
        }
    }

    #[tokio::test]
    async fn healthy_blob_backend_stores_pixels() {
        let mut f = fixture(MemoryBlobStore::new());

        assert_eq!(f.store.put("a", b"px").await, Placement::Blob);
        assert_eq!(f.store.get("a").await.unwrap().as_deref(), Some(&b"px"[..]));
        f.store.delete("a").await.unwrap();
        assert_eq!(f.store.get("a").await.unwrap(), None);
        assert!(f.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn unavailable_backend_falls_back_and_notifies_once() {
        let mut f = fixture(MemoryBlobStore::unavailable());

        assert!(!f.store.ensure_ready().await);
        assert_eq!(f.store.put("a", b"px").await, Placement::Inline);
        assert_eq!(f.store.put("b", b"px").await, Placement::Inline);
        assert_eq!(f.store.get("a").await.unwrap(), None);

        assert!(f.store.is_inline());
        assert_eq!(f.notifier.notices(), vec![Notice::CompatibilityMode]);
    }

    #[tokio::test]
    async fn fallback_is_one_way() {
        let mut f = fixture(MemoryBlobStore::new());
        assert!(f.store.ensure_ready().await);

        f.blobs.set_unavailable(true);
        assert_eq!(f.store.put("a", b"px").await, Placement::Inline);

        f.blobs.set_unavailable(false);
        assert_eq!(f.store.put("b", b"px").await, Placement::Inline);
        assert_eq!(f.blobs.put_count(), 0);
        assert_eq!(f.notifier.count(&Notice::CompatibilityMode), 1);
    }

    #[tokio::test]
    async fn blob_quota_raises_storage_full() {
        let mut f = fixture(MemoryBlobStore::with_quota(2));

        assert_eq!(f.store.put("a", b"too big").await, Placement::Inline);
        assert_eq!(
            f.notifier.notices(),
            vec![Notice::CompatibilityMode, Notice::StorageFull]
        );
    }

    #[tokio::test]
    async fn read_failure_downgrades_and_reports() {
        let mut f = fixture(MemoryBlobStore::new());
        assert!(f.store.ensure_ready().await);
        f.blobs.set_unavailable(true);

        assert!(f.store.get("a").await.is_err());
        assert!(f.store.is_inline());
        assert_eq!(f.store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn no_blob_backend_is_inline_without_notice() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = PhotoStore::new(
            Arc::new(MemoryRecordStore::new()),
            None,
            KEY,
            notifier.clone(),
        );
        assert_eq!(store.put("a", b"px").await, Placement::Inline);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn metadata_round_trip_preserves_order() {
        let f = fixture(MemoryBlobStore::new());
        let recs = vec![record("b"), record("a"), record("c")];

        f.store.save_metadata(&recs).await.unwrap();
        assert_eq!(f.store.load_metadata().await, recs);

        let raw = f.records.get(KEY).await.unwrap().unwrap();
        assert!(raw.starts_with("{\"photos\":["));
        assert!(raw.contains("\"createdAt\":1700000000000"));
        assert!(raw.contains("\"blobId\":\"b\""));
        assert!(!raw.contains("dataUrl"));
    }

    #[tokio::test]
    async fn malformed_metadata_loads_empty() {
        let f = fixture(MemoryBlobStore::new());
        for raw in ["not json", "[]", "{\"photos\":\"nope\"}", "{\"photos\":[{\"x\":1}]}"] {
            f.records.set(KEY, raw).await.unwrap();
            assert!(f.store.load_metadata().await.is_empty(), "{raw}");
        }
        f.records.set(KEY, "{}").await.unwrap();
        assert!(f.store.load_metadata().await.is_empty());
    }

    #[tokio::test]
    async fn legacy_records_are_understood() {
        let f = fixture(MemoryBlobStore::new());
        f.records
            .set(
                KEY,
                r#"{"photos":[{"id":"x","createdAt":5,"type":"landscape","dataUrl":"data:image/jpeg;base64,AA=="}]}"#,
            )
            .await
            .unwrap();

        let recs = f.store.load_metadata().await;
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].orientation, Orientation::Landscape);
        assert_eq!(recs[0].blob_key(), "x");
        assert!(recs[0].data_url.is_some());
    }

    #[tokio::test]
    async fn metadata_quota_is_reported() {
        let records = Arc::new(MemoryRecordStore::with_quota(10));
        let store = PhotoStore::new(
            records,
            None,
            KEY,
            Arc::new(RecordingNotifier::default()),
        );
        let err = store.save_metadata(&[record("a")]).await.unwrap_err();
        assert!(err.is_quota());
    }
}
