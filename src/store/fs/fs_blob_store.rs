//! # Filesystem Blob Store
//!
//! A [`BlobStore`] that keeps each blob as `{root}/{id}.bin`, the host-side
//! stand-in for the browser's IndexedDB photo table.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::dir::KeyedDir;
use crate::store::{blob_store::BlobStore, error::StoreError};

const PROBE_FILE: &str = ".probe";

#[derive(Clone, Debug)]
pub struct FsBlobStore {
    dir: KeyedDir,
}

impl FsBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P, quota: Option<u64>) -> Self {
        Self {
            dir: KeyedDir::new(root.into(), "bin", quota),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.root()
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    /// Creates the root directory and round-trips a probe file through it.
    async fn probe(&self) -> Result<(), StoreError> {
        let root = self.dir.root();
        fs::create_dir_all(root)
            .await
            .map_err(|e| StoreError::Unavailable(format!("create {}: {e}", root.display())))?;

        let probe = root.join(PROBE_FILE);
        fs::write(&probe, b"ok")
            .await
            .map_err(|e| StoreError::Unavailable(format!("write {}: {e}", probe.display())))?;
        let _ = fs::remove_file(&probe).await;
        Ok(())
    }

    async fn put(&self, id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.dir.write(id, bytes).await?;
        debug!(id, bytes = bytes.len(), "blob stored");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.dir.read(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.dir.remove(id).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let removed = self.dir.clear().await?;
        debug!(removed, "blob store cleared");
        Ok(())
    }
}
