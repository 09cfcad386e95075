//! # Local Artifact Storage
//!
//! Saves exported files under a root directory on the local filesystem.
//! Parent directories are created on demand and relative paths are
//! sanitised so nothing escapes the root.
//!
//! # Example
//! ```rust,no_run
//! use keepsake::artifact::local_storage::LocalArtifactStorage;
//! use keepsake::artifact::storage::{Artifact, ArtifactStorage};
//!
//! let storage = LocalArtifactStorage::new("/tmp/keepsake/artifacts");
//! let saved = storage
//!     .store(&Artifact::new("album-heitor.jpg", "image/jpeg", vec![0xFF, 0xD8]))
//!     .unwrap();
//! println!("saved to {}", saved.path);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tracing::info;

use super::storage::ArtifactStorage;

#[derive(Clone, Debug)]
pub struct LocalArtifactStorage {
    root: PathBuf,
}

/// Makes `rel_path` safe to join under a root: backslashes become `/`,
/// leading slashes are trimmed and `..` is replaced with `_`.
pub fn sanitize_rel_path(rel_path: &str) -> String {
    rel_path
        .replace('\\', "/")
        .trim_start_matches('/')
        .replace("..", "_")
}

impl LocalArtifactStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Writes `bytes` under the root and returns the absolute path.
    ///
    /// # Errors
    /// Fails on an empty path or when the file cannot be written.
    pub fn save_file(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
        let safe = sanitize_rel_path(rel_path);
        if safe.is_empty() {
            bail!("empty artifact path {rel_path:?}");
        }
        let full = self.root.join(&safe);
        if let Some(dir) = full.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {dir:?}"))?;
        }
        fs::write(&full, bytes).with_context(|| format!("write {:?}", &full))?;
        info!(path = %full.display(), bytes = bytes.len(), "artifact saved");
        Ok(full.to_string_lossy().into_owned())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStorage for LocalArtifactStorage {
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
        self.save_file(rel_path, bytes)
    }
}
