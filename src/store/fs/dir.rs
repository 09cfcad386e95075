//! Shared plumbing for the one-file-per-key filesystem backends.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::store::{error::StoreError, key::file_stem};

/// A directory holding one `{key}.{ext}` file per entry, with an optional
/// byte quota across all entries.
#[derive(Clone, Debug)]
pub struct KeyedDir {
    root: PathBuf,
    ext: &'static str,
    quota: Option<u64>,
}

impl KeyedDir {
    pub fn new(root: PathBuf, ext: &'static str, quota: Option<u64>) -> Self {
        Self { root, ext, quota }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(format!("{}.{}", file_stem(key)?, self.ext)))
    }

    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temporary file and a rename, so readers never see
    /// a half-written entry.
    pub async fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;

        if let Some(quota) = self.quota {
            let others = self.used_bytes(Some(&path)).await?;
            let needed = others + bytes.len() as u64;
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        let tmp = path.with_extension(format!("{}.tmp", self.ext));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every entry with this directory's extension.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in self.entries().await? {
            fs::remove_file(&path).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Total size of all entries, optionally skipping one path (the entry
    /// about to be replaced).
    pub async fn used_bytes(&self, skip: Option<&Path>) -> Result<u64, StoreError> {
        let mut total = 0;
        for path in self.entries().await? {
            if Some(path.as_path()) == skip {
                continue;
            }
            total += fs::metadata(&path).await?.len();
        }
        Ok(total)
    }

    async fn entries(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut out = Vec::new();
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(self.ext) {
                out.push(path);
            }
        }
        Ok(out)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::unique_temp_root;
    use super::*;

    #[tokio::test]
    async fn write_read_remove() {
        let root = unique_temp_root("keyed-dir");
        let dir = KeyedDir::new(root.clone(), "bin", None);

        assert_eq!(dir.read("a").await.unwrap(), None);
        dir.write("a", b"abc").await.unwrap();
        assert_eq!(dir.read("a").await.unwrap().as_deref(), Some(&b"abc"[..]));
        dir.remove("a").await.unwrap();
        dir.remove("a").await.unwrap();
        assert_eq!(dir.read("a").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn quota_counts_other_entries_only() {
        let root = unique_temp_root("keyed-dir-quota");
        let dir = KeyedDir::new(root.clone(), "bin", Some(10));

        dir.write("a", &[0; 6]).await.unwrap();
        // replacing "a" does not count its old size
        dir.write("a", &[0; 8]).await.unwrap();
        let err = dir.write("b", &[0; 3]).await.unwrap_err();
        assert!(err.is_quota(), "{err}");
        assert_eq!(dir.used_bytes(None).await.unwrap(), 8);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn clear_only_touches_own_extension() {
        let root = unique_temp_root("keyed-dir-clear");
        let blobs = KeyedDir::new(root.clone(), "bin", None);
        let records = KeyedDir::new(root.clone(), "json", None);

        blobs.write("a", b"1").await.unwrap();
        blobs.write("b", b"2").await.unwrap();
        records.write("meta", b"{}").await.unwrap();

        assert_eq!(blobs.clear().await.unwrap(), 2);
        assert!(records.read("meta").await.unwrap().is_some());

        let _ = std::fs::remove_dir_all(&root);
    }
}
