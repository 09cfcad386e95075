//! # Storage Configuration
//!
//! Where album metadata, photo blobs and exported artifacts live on the
//! host.
//!
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `KEEPSAKE_DATA_DIR` | Root data directory | `./var/keepsake` |
//! | `KEEPSAKE_STORAGE_QUOTA_MB` | Per-backend quota in MiB, `0` = unlimited | `0` |
//! | `KEEPSAKE_BLOB_STORE` | Use the blob backend (otherwise inline only) | `true` |

use std::path::PathBuf;

use crate::config::env::{read_flag_from, read_string_from, read_u32_from};

pub const DEFAULT_DATA_DIR: &str = "./var/keepsake";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Byte quota applied to each backend.
    pub quota_bytes: Option<u64>,
    /// When `false` the album starts directly in inline mode.
    pub blob_backend: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            quota_bytes: None,
            blob_backend: true,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self::from_provider(|k| std::env::var(k).ok())
    }

    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let quota_mb = read_u32_from(&provider, "KEEPSAKE_STORAGE_QUOTA_MB", 0);
        Self {
            data_dir: PathBuf::from(read_string_from(&provider, "KEEPSAKE_DATA_DIR", DEFAULT_DATA_DIR)),
            quota_bytes: (quota_mb > 0).then(|| quota_mb as u64 * 1024 * 1024),
            blob_backend: read_flag_from(&provider, "KEEPSAKE_BLOB_STORE", true),
        }
    }

    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.data_dir.join("artifacts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = StorageConfig::from_provider(|_| None);
        assert_eq!(cfg, StorageConfig::default());
        assert_eq!(cfg.blobs_dir(), PathBuf::from("./var/keepsake/blobs"));
    }

    #[test]
    fn quota_in_megabytes() {
        let cfg = StorageConfig::from_provider(|k| match k {
            "KEEPSAKE_STORAGE_QUOTA_MB" => Some("5".into()),
            "KEEPSAKE_BLOB_STORE" => Some("off".into()),
            "KEEPSAKE_DATA_DIR" => Some("/data".into()),
            _ => None,
        });
        assert_eq!(cfg.quota_bytes, Some(5 * 1024 * 1024));
        assert!(!cfg.blob_backend);
        assert_eq!(cfg.records_dir(), PathBuf::from("/data/records"));
        assert_eq!(cfg.artifacts_dir(), PathBuf::from("/data/artifacts"));
    }
}
