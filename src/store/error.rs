use std::io::ErrorKind;

use thiserror::Error;

/// Failures reported by record and blob backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be used in this environment (missing directory,
    /// disabled, failed probe...).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// `true` for quota exhaustion, including a full disk.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::QuotaExceeded { .. } => true,
            Self::Io(e) => e.kind() == ErrorKind::StorageFull,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_detection() {
        assert!(StoreError::QuotaExceeded { needed: 10, quota: 5 }.is_quota());
        assert!(StoreError::Io(std::io::Error::from(ErrorKind::StorageFull)).is_quota());
        assert!(!StoreError::Io(std::io::Error::from(ErrorKind::NotFound)).is_quota());
        assert!(!StoreError::Unavailable("x".into()).is_quota());
    }

    #[test]
    fn display_mentions_sizes() {
        let e = StoreError::QuotaExceeded { needed: 10, quota: 5 };
        assert_eq!(e.to_string(), "storage quota exceeded: 10 bytes needed, 5 allowed");
    }
}
