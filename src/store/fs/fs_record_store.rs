//! # Filesystem Record Store
//!
//! A [`RecordStore`] that keeps each record as `{root}/{key}.json`.
//!
//! # Example
//! ```rust,no_run
//! use keepsake::store::fs::fs_record_store::FsRecordStore;
//! use keepsake::store::record_store::RecordStore;
//!
//! # async fn run() -> Result<(), keepsake::store::error::StoreError> {
//! let store = FsRecordStore::new("/tmp/keepsake/records", None);
//! store.set("greeting", "{\"hello\":1}").await?;
//! assert_eq!(store.get("greeting").await?.as_deref(), Some("{\"hello\":1}"));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::dir::KeyedDir;
use crate::store::{error::StoreError, record_store::RecordStore};

#[derive(Clone, Debug)]
pub struct FsRecordStore {
    dir: KeyedDir,
}

impl FsRecordStore {
    /// Creates a store under `root`. `quota` bounds the total bytes of all
    /// records.
    pub fn new<P: Into<PathBuf>>(root: P, quota: Option<u64>) -> Self {
        Self {
            dir: KeyedDir::new(root.into(), "json", quota),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.root()
    }
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .dir
            .read(key)
            .await?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.dir.write(key, value.as_bytes()).await?;
        debug!(key, bytes = value.len(), "record saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.dir.remove(key).await
    }
}
