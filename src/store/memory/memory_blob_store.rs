use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::store::{blob_store::BlobStore, error::StoreError};

/// An in-process [`BlobStore`].
///
/// Besides an optional byte quota, the store can be switched into an
/// unavailable state (every call, including [`BlobStore::probe`], fails),
/// which lets hosts and tests exercise the compatibility fallback.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<u64>,
    unavailable: AtomicBool,
    puts: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: u64) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// A store whose probe fails.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_unavailable(true);
        store
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `put` calls.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Direct read that bypasses the availability switch.
    pub fn get_blob(&self, id: &str) -> Option<Vec<u8>> {
        self.blobs.lock().ok().and_then(|b| b.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory blob store disabled".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, StoreError> {
        self.check()?;
        self.blobs
            .lock()
            .map_err(|_| StoreError::Unavailable("blob store lock poisoned".into()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn probe(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn put(&self, id: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut blobs = self.lock()?;
        if let Some(quota) = self.quota {
            let others: u64 = blobs
                .iter()
                .filter(|(k, _)| k.as_str() != id)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = others + bytes.len() as u64;
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        blobs.insert(id.to_string(), bytes.to_vec());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.lock()?.remove(id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_and_clear() {
        let store = MemoryBlobStore::new();
        store.probe().await.unwrap();
        store.put("a", b"1").await.unwrap();
        store.put("b", b"2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some(&b"1"[..]));
        assert_eq!(store.put_count(), 2);

        store.clear().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_everything() {
        let store = MemoryBlobStore::unavailable();
        assert!(store.probe().await.is_err());
        assert!(store.put("a", b"1").await.is_err());
        assert!(store.get("a").await.is_err());

        store.set_unavailable(false);
        store.put("a", b"1").await.unwrap();
    }

    #[tokio::test]
    async fn quota_is_enforced() {
        let store = MemoryBlobStore::with_quota(4);
        store.put("a", b"123").await.unwrap();
        let err = store.put("b", b"12").await.unwrap_err();
        assert!(err.is_quota());
        assert_eq!(store.len(), 1);
    }
}
