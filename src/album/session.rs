//! # Album Session Factory
//!
//! Builds a ready-to-use album from an [`AppConfig`]: filesystem stores
//! under the data directory, the image codec, the clock, the manager
//! (already hydrated), the exporter and the artifact storage.
//!
//! Nothing is cached globally; each call opens a fresh session, which
//! keeps hosts and tests in charge of the lifecycle.
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use keepsake::album::photo::Upload;
//! use keepsake::album::session::AlbumSession;
//! use keepsake::config::app::AppConfig;
//! use keepsake::notification::notifier::{AutoConfirm, LogNotifier};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let cfg = AppConfig::from_env();
//! let mut session = AlbumSession::open(&cfg, Arc::new(LogNotifier), Arc::new(AutoConfirm(true))).await?;
//!
//! session.manager.add(&Upload::new("image/jpeg", std::fs::read("cake.jpg")?)).await?;
//! let collage = session.exporter.collage(session.manager.photos()).await?;
//! let saved = session.save(&collage)?;
//! println!("collage at {}", saved.path);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::export::AlbumExporter;
use super::manager::AlbumManager;
use crate::artifact::local_storage::LocalArtifactStorage;
use crate::artifact::storage::{Artifact, ArtifactStorage, SavedArtifact};
use crate::config::app::AppConfig;
use crate::image::image_rs_processor::ImageRsProcessor;
use crate::image::processor::ImageProcessor;
use crate::notification::notifier::{Confirmer, Notifier};
use crate::store::blob_store::BlobStore;
use crate::store::fs::{fs_blob_store::FsBlobStore, fs_record_store::FsRecordStore};
use crate::store::photo_store::PhotoStore;
use crate::time::system_clock::SystemClock;

pub struct AlbumSession {
    pub manager: AlbumManager,
    pub exporter: AlbumExporter,
    pub artifacts: LocalArtifactStorage,
}

impl AlbumSession {
    /// Opens the stores under `cfg.storage`, hydrates the album and
    /// prepares the exporter.
    ///
    /// # Errors
    /// Fails when the configured timezone is invalid.
    pub async fn open(
        cfg: &AppConfig,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Result<Self> {
        let storage = &cfg.storage;
        let records = Arc::new(FsRecordStore::new(storage.records_dir(), storage.quota_bytes));
        let blobs: Option<Arc<dyn BlobStore>> = storage
            .blob_backend
            .then(|| Arc::new(FsBlobStore::new(storage.blobs_dir(), storage.quota_bytes)) as Arc<dyn BlobStore>);
        let store = PhotoStore::new(records, blobs, cfg.album.storage_key.clone(), notifier.clone());

        let codec: Arc<dyn ImageProcessor> = Arc::new(ImageRsProcessor);
        let clock = Arc::new(SystemClock::new(&cfg.render.timezone)?);

        let mut manager = AlbumManager::new(
            cfg.album.clone(),
            codec.clone(),
            store,
            clock.clone(),
            notifier.clone(),
            confirmer,
        );
        let restored = manager.hydrate().await;

        let exporter = AlbumExporter::new(cfg.render.clone(), cfg.album.device, codec, clock, notifier)?;
        let artifacts = LocalArtifactStorage::new(storage.artifacts_dir());

        info!(
            data_dir = %storage.data_dir.display(),
            restored,
            inline = manager.store().is_inline(),
            "album session opened"
        );
        Ok(Self {
            manager,
            exporter,
            artifacts,
        })
    }

    /// Saves an exported artifact under the artifacts directory.
    pub fn save(&self, artifact: &Artifact) -> Result<SavedArtifact> {
        self.artifacts.store(artifact)
    }

    /// Releases display handles and drops the in-memory album.
    pub fn close(mut self) -> usize {
        self.manager.shutdown()
    }
}
