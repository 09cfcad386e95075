//! # Photo Collection Manager
//!
//! Owns the in-memory album: a bounded, ordered list of [`Photo`]s kept
//! consistent with the [`PhotoStore`].
//!
//! Every mutating operation takes `&mut self`, so only one add, swap or
//! remove can be pending on a collection at a time. Failures are turned
//! into user notices here, at the action boundary, and returned as
//! [`AlbumError`].
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use keepsake::album::manager::AlbumManager;
//! use keepsake::album::photo::Upload;
//! use keepsake::config::album::AlbumConfig;
//! use keepsake::image::image_rs_processor::ImageRsProcessor;
//! use keepsake::notification::notifier::{AutoConfirm, LogNotifier};
//! use keepsake::store::memory::memory_record_store::MemoryRecordStore;
//! use keepsake::store::photo_store::PhotoStore;
//! use keepsake::time::system_clock::SystemClock;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let notifier = Arc::new(LogNotifier);
//! let store = PhotoStore::new(Arc::new(MemoryRecordStore::new()), None, "album", notifier.clone());
//! let mut album = AlbumManager::new(
//!     AlbumConfig::default(),
//!     Arc::new(ImageRsProcessor),
//!     store,
//!     Arc::new(SystemClock::new("America/Sao_Paulo")?),
//!     notifier,
//!     Arc::new(AutoConfirm(true)),
//! );
//! album.hydrate().await;
//! let photo = album.add(&Upload::new("image/jpeg", std::fs::read("party.jpg")?)).await?;
//! println!("added {} ({:?})", photo.id, photo.orientation);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::handles::HandleRegistry;
use super::photo::{Photo, PhotoId, Upload, sniff_content_type};
use crate::config::album::AlbumConfig;
use crate::error::{album::AlbumError, entity::NotFoundError};
use crate::image::geometry::{Orientation, detect_orientation};
use crate::image::processor::ImageProcessor;
use crate::notification::notice::{ConfirmPrompt, Notice};
use crate::notification::notifier::{Confirmer, Notifier};
use crate::store::data_url::decode_data_url;
use crate::store::photo_store::{PhotoRecord, PhotoStore, Placement};
use crate::time::clock::Clock;
use crate::time::local::from_epoch_millis;

/// Outcome of [`AlbumManager::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The user declined the confirmation.
    Declined,
    /// No photo with that id.
    Absent,
}

/// Position of a persisted record in the hydrated album.
enum Slot {
    Loaded(usize),
    Unread(PhotoRecord),
}

/// A normalised upload, ready to be stored.
struct Prepared {
    orientation: Orientation,
    content_type: &'static str,
    pixels: Arc<[u8]>,
}

pub struct AlbumManager {
    config: AlbumConfig,
    codec: Arc<dyn ImageProcessor>,
    store: PhotoStore,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    photos: Vec<Photo>,
    handles: HandleRegistry,
}

impl AlbumManager {
    pub fn new(
        config: AlbumConfig,
        codec: Arc<dyn ImageProcessor>,
        store: PhotoStore,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            config,
            codec,
            store,
            clock,
            notifier,
            confirmer,
            photos: Vec::new(),
            handles: HandleRegistry::new(),
        }
    }

    /// Replaces the handle registry (e.g. one with a release hook).
    pub fn with_handles(mut self, handles: HandleRegistry) -> Self {
        self.handles = handles;
        self
    }

    /// Photos in display order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.max_photos
    }

    pub fn is_full(&self) -> bool {
        self.photos.len() >= self.config.max_photos
    }

    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    /// Rebuilds the collection from persisted state.
    ///
    /// Records whose blob is missing but which carry inline pixels are
    /// recovered from them and, while the blob backend is healthy, migrated
    /// back into it. Records with no recoverable pixels are skipped. If the
    /// blob backend fails part-way, the photos already read are saved inline
    /// and the unread records are kept as they were.
    /// Returns the number of photos loaded.
    pub async fn hydrate(&mut self) -> usize {
        let started_on_blobs = self.store.ensure_ready().await;

        let stored = self.store.load_metadata().await;
        if stored.is_empty() {
            self.commit(Vec::new());
            return 0;
        }

        let mut hydrated: Vec<Photo> = Vec::with_capacity(stored.len());
        let mut slots: Vec<Slot> = Vec::with_capacity(stored.len());
        let mut seen = HashSet::new();
        let mut needs_save = false;
        let (mut migrated, mut skipped) = (0usize, 0usize);

        for record in stored {
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, "duplicate photo id in metadata; skipping");
                skipped += 1;
                continue;
            }

            let blob_key = record.blob_key().to_string();
            let inline = record.data_url.as_deref().and_then(decode_data_url);
            let mut from_blob = None;

            if !self.store.is_inline() {
                match self.store.get(&blob_key).await {
                    Ok(Some(bytes)) => {
                        // the inline copy is redundant now
                        needs_save |= record.data_url.is_some();
                        from_blob = Some((sniff_content_type(&bytes).to_string(), bytes));
                    }
                    Ok(None) => {
                        if let Some((_, bytes)) = &inline {
                            if self.store.put(&blob_key, bytes).await == Placement::Blob {
                                migrated += 1;
                                needs_save = true;
                            }
                        }
                    }
                    Err(e) => warn!(id = %record.id, error = %e, "blob read failed during hydrate"),
                }
            }

            let Some((content_type, bytes)) = from_blob.or(inline) else {
                warn!(id = %record.id, "no pixel data for photo; skipping");
                skipped += 1;
                if started_on_blobs && self.store.is_inline() {
                    // the blob may still exist once the backend recovers
                    slots.push(Slot::Unread(record));
                }
                continue;
            };

            slots.push(Slot::Loaded(hydrated.len()));
            hydrated.push(Photo {
                id: PhotoId::from(record.id),
                created_at: from_epoch_millis(record.created_at),
                orientation: record.orientation,
                pixels: Arc::from(bytes),
                content_type,
                blob_id: blob_key,
                handle: self.handles.issue(),
            });
        }

        if hydrated.len() > self.config.max_photos {
            warn!(
                photos = hydrated.len(),
                max = self.config.max_photos,
                "persisted album exceeds capacity"
            );
        }

        self.commit(hydrated);

        if started_on_blobs && self.store.is_inline() {
            // Lost the blob backend mid-way: inline what was read and keep
            // the unread records as they were.
            let records: Vec<PhotoRecord> = slots
                .into_iter()
                .map(|slot| match slot {
                    Slot::Loaded(i) => self.photos[i].to_record(true),
                    Slot::Unread(record) => record,
                })
                .collect();
            if let Err(e) = self.store.save_metadata(&records).await {
                warn!(error = %e, "failed to save metadata after downgrade");
            }
        } else if needs_save {
            let snapshot = self.photos.clone();
            if let Err(e) = self.persist(&snapshot).await {
                warn!(error = %e, "failed to save migrated metadata");
            }
        }

        info!(
            photos = self.photos.len(),
            migrated,
            skipped,
            inline = self.store.is_inline(),
            "album hydrated"
        );
        self.photos.len()
    }

    /// Adds a photo at the end of the collection.
    ///
    /// # Errors
    /// [`AlbumError::NotAnImage`], [`AlbumError::CapacityExceeded`],
    /// [`AlbumError::Decode`], or a storage error when metadata cannot be
    /// saved. The collection is unchanged on error.
    pub async fn add(&mut self, upload: &Upload) -> Result<Photo, AlbumError> {
        let result = self.try_add(upload).await;
        if let Err(e) = &result {
            warn!(error = %e, content_type = %upload.content_type, "add photo failed");
            if let Some(notice) = e.add_notice(self.config.max_photos) {
                self.notifier.notify(notice).await;
            }
        }
        result
    }

    async fn try_add(&mut self, upload: &Upload) -> Result<Photo, AlbumError> {
        if !upload.is_image() {
            return Err(AlbumError::NotAnImage {
                content_type: upload.content_type.clone(),
            });
        }
        if self.is_full() {
            return Err(AlbumError::CapacityExceeded {
                max: self.config.max_photos,
            });
        }

        let prepared = self.prepare(upload)?;
        let id = PhotoId::generate();
        let blob_id = id.to_string();
        let placement = self.store.put(&blob_id, &prepared.pixels).await;

        let photo = Photo {
            id,
            created_at: self.clock.now(),
            orientation: prepared.orientation,
            pixels: prepared.pixels,
            content_type: prepared.content_type.to_string(),
            blob_id,
            handle: self.handles.issue(),
        };

        let mut next = self.photos.clone();
        next.push(photo.clone());

        if let Err(e) = self.persist(&next).await {
            self.handles.release(photo.handle);
            if placement == Placement::Blob {
                if let Err(err) = self.store.delete(&photo.blob_id).await {
                    warn!(id = %photo.id, error = %err, "failed to delete orphaned blob");
                    let current = self.photos.clone();
                    self.reinline(&current).await;
                }
            }
            return Err(e);
        }

        self.commit(next);
        info!(
            id = %photo.id,
            orientation = ?photo.orientation,
            bytes = photo.pixels.len(),
            ?placement,
            count = self.photos.len(),
            "photo added"
        );
        Ok(photo)
    }

    /// Replaces the pixels of an existing photo, keeping its id and position.
    ///
    /// Orientation and timestamp are taken from the new upload.
    pub async fn swap(&mut self, id: &PhotoId, upload: &Upload) -> Result<Photo, AlbumError> {
        let result = self.try_swap(id, upload).await;
        if let Err(e) = &result {
            warn!(%id, error = %e, "swap photo failed");
            if let Some(notice) = e.swap_notice() {
                self.notifier.notify(notice).await;
            }
        }
        result
    }

    async fn try_swap(&mut self, id: &PhotoId, upload: &Upload) -> Result<Photo, AlbumError> {
        if !upload.is_image() {
            return Err(AlbumError::NotAnImage {
                content_type: upload.content_type.clone(),
            });
        }
        let index = self
            .position(id)
            .ok_or_else(|| NotFoundError::photo(id.as_str()))?;

        let prepared = self.prepare(upload)?;
        let current = self.photos[index].clone();
        let placement = self.store.put(&current.blob_id, &prepared.pixels).await;

        let photo = Photo {
            id: current.id.clone(),
            created_at: self.clock.now(),
            orientation: prepared.orientation,
            pixels: prepared.pixels,
            content_type: prepared.content_type.to_string(),
            blob_id: current.blob_id.clone(),
            handle: self.handles.issue(),
        };

        let mut next = self.photos.clone();
        next[index] = photo.clone();

        if let Err(e) = self.persist(&next).await {
            self.handles.release(photo.handle);
            if placement == Placement::Blob {
                // put the previous pixels back so blob and metadata agree
                if self.store.put(&current.blob_id, &current.pixels).await == Placement::Inline {
                    let photos = self.photos.clone();
                    self.reinline(&photos).await;
                }
            }
            return Err(e);
        }

        self.commit(next);
        info!(%id, orientation = ?photo.orientation, index, "photo swapped");
        Ok(photo)
    }

    /// Removes a photo after confirmation. Removing an absent id is a no-op.
    pub async fn remove(&mut self, id: &PhotoId) -> Result<Removal, AlbumError> {
        let Some(index) = self.position(id) else {
            debug!(%id, "remove: photo not in album");
            return Ok(Removal::Absent);
        };
        if !self.confirmer.confirm(ConfirmPrompt::RemovePhoto).await {
            return Ok(Removal::Declined);
        }

        let mut next = self.photos.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;

        if let Err(e) = self.store.delete(&removed.blob_id).await {
            warn!(%id, error = %e, "failed to delete photo blob");
            self.reinline(&next).await;
        }

        self.commit(next);
        info!(%id, count = self.photos.len(), "photo removed");
        Ok(Removal::Removed)
    }

    /// Removes every photo after confirmation. Returns `false` when the user
    /// declined.
    pub async fn clear_all(&mut self) -> Result<bool, AlbumError> {
        if !self.confirmer.confirm(ConfirmPrompt::ClearAlbum).await {
            return Ok(false);
        }

        self.persist(&[]).await?;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear photo blobs");
        }

        let count = self.photos.len();
        self.commit(Vec::new());
        info!(removed = count, "album cleared");
        Ok(true)
    }

    /// Releases every display handle and drops the in-memory collection.
    /// Persisted state is untouched.
    pub fn shutdown(&mut self) -> usize {
        self.photos.clear();
        let released = self.handles.release_all();
        debug!(released, "album manager shut down");
        released
    }

    fn position(&self, id: &PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| &p.id == id)
    }

    fn prepare(&self, upload: &Upload) -> Result<Prepared, AlbumError> {
        let bitmap = self.codec.decode(&upload.bytes)?;
        let orientation = detect_orientation(&bitmap);
        let opts = self
            .config
            .device
            .compress_options(self.codec.supports("image/webp"))
            .with_target_ratio(orientation.target_ratio(self.config.photo_ratio));
        let pixels = self.codec.normalize(&bitmap, &opts)?;
        Ok(Prepared {
            orientation,
            content_type: opts.format.content_type(),
            pixels: Arc::from(pixels),
        })
    }

    /// Saves metadata for `next`, raising the matching notice on failure.
    async fn persist(&mut self, next: &[Photo]) -> Result<(), AlbumError> {
        self.store.ensure_ready().await;
        let inline = self.store.is_inline();
        let records: Vec<_> = next.iter().map(|p| p.to_record(inline)).collect();

        if let Err(e) = self.store.save_metadata(&records).await {
            error!(error = %e, photos = records.len(), inline, "failed to save album metadata");
            let notice = if e.is_quota() {
                Notice::StorageFull
            } else {
                Notice::SaveFailed
            };
            self.notifier.notify(notice).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Re-saves `photos` with inline pixels once a blob cleanup has
    /// downgraded the store, so no saved record depends on a blob that can
    /// no longer be read.
    async fn reinline(&mut self, photos: &[Photo]) {
        if !self.store.is_inline() || photos.is_empty() {
            return;
        }
        match self.persist(photos).await {
            Ok(()) => info!(photos = photos.len(), "metadata re-saved with inline pixels"),
            Err(e) => warn!(error = %e, "failed to re-save metadata inline"),
        }
    }

    fn commit(&mut self, next: Vec<Photo>) {
        self.photos = next;
        let released = self.handles.sync(self.photos.iter().map(|p| p.handle));
        if !released.is_empty() {
            debug!(count = released.len(), "released display handles");
        }
    }
}
