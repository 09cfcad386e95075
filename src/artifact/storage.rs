//! # Artifact Storage Abstractions
//!
//! Exported files (collages, PDFs, booth photos) are handed to an
//! [`ArtifactStorage`] backend as [`Artifact`]s and come back as
//! [`SavedArtifact`] metadata.
//!
//! # Example
//! ```rust
//! use keepsake::artifact::storage::{Artifact, ArtifactStorage};
//! use anyhow::Result;
//!
//! struct TempStorage;
//!
//! impl ArtifactStorage for TempStorage {
//!     fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String> {
//!         let tmp = std::env::temp_dir().join(rel_path);
//!         std::fs::write(&tmp, bytes)?;
//!         Ok(tmp.to_string_lossy().into_owned())
//!     }
//! }
//!
//! let artifact = Artifact::new("album-doc-example.pdf", "application/pdf", b"%PDF".to_vec());
//! let saved = TempStorage.store(&artifact).unwrap();
//!
//! assert!(saved.path.ends_with("album-doc-example.pdf"));
//! assert_eq!(saved.bytes, 4);
//! ```

use anyhow::Result;

/// A rendered file ready to be downloaded or saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested download name, e.g. `album-heitor.jpg`.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Metadata for a stored artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Path to the stored file (relative or absolute).
    pub path: String,
    pub content_type: String,
    /// File size in bytes.
    pub bytes: u64,
}

impl SavedArtifact {
    pub fn new(path: impl Into<String>, content_type: impl Into<String>, bytes: u64) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A backend that persists exported files.
pub trait ArtifactStorage: Send + Sync {
    /// Saves `bytes` at `rel_path` and returns the final path.
    ///
    /// # Errors
    /// Returns an [`anyhow::Error`] if saving fails.
    fn save(&self, rel_path: &str, bytes: &[u8]) -> Result<String>;

    /// Saves `artifact` under its file name.
    fn store(&self, artifact: &Artifact) -> Result<SavedArtifact> {
        let path = self.save(&artifact.file_name, &artifact.bytes)?;
        Ok(SavedArtifact::new(
            path,
            artifact.content_type.clone(),
            artifact.bytes.len() as u64,
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockStorage;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn artifact_reports_length() {
        let a = Artifact::new("a.jpg", "image/jpeg", vec![1, 2, 3]);
        assert_eq!(a.len(), 3);
        assert!(!a.is_empty());
        assert!(Artifact::new("b", "x/y", vec![]).is_empty());
    }

    #[test]
    fn store_saves_under_file_name_and_reports_metadata() {
        let storage = Arc::new(MockStorage::new("/abs"));
        let artifact = Artifact::new("album-heitor.pdf", "application/pdf", b"%PDF-1.5".to_vec());

        let saved = storage.store(&artifact).expect("should save");
        assert_eq!(
            saved,
            SavedArtifact::new("/abs/album-heitor.pdf", "application/pdf", 8)
        );
        assert_eq!(storage.calls(), vec![("album-heitor.pdf".to_string(), 8)]);
    }

    #[test]
    fn store_propagates_errors() {
        let storage = MockStorage::failing();
        let err = storage
            .store(&Artifact::new("x.jpg", "image/jpeg", vec![0]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("cannot save"));
    }

    fn assert_send_sync<T: ?Sized + Send + Sync>() {}
    #[test]
    fn dyn_storage_is_send_sync() {
        assert_send_sync::<dyn ArtifactStorage>();
    }
}
