//! Numbered file names for saved booth photos (`foto_1.jpg`, `foto_2.jpg`,
//! ...). The next number survives restarts in a [`RecordStore`].

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use super::storage::{Artifact, ArtifactStorage, SavedArtifact};
use crate::store::record_store::RecordStore;

pub const SAVE_COUNTER_KEY: &str = "photoBoothSaveCounter";

/// Parses a stored counter. Anything that is not a finite number of at
/// least 1 restarts the sequence at 1; fractions are floored.
pub fn parse_counter(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.floor() as u64)
        .unwrap_or(1)
}

pub struct SaveSequence {
    store: Arc<dyn RecordStore>,
    next: u64,
}

impl SaveSequence {
    /// Reads the persisted counter. A failing store starts at 1.
    pub async fn load(store: Arc<dyn RecordStore>) -> Self {
        let raw = match store.get(SAVE_COUNTER_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "could not read save counter");
                None
            }
        };
        let next = parse_counter(raw.as_deref());
        Self { store, next }
    }

    pub fn current(&self) -> u64 {
        self.next
    }

    pub fn file_name(&self) -> String {
        format!("foto_{}.jpg", self.next)
    }

    /// Moves to the next number and persists it. A failed write only
    /// logs: the in-memory sequence still advances.
    pub async fn advance(&mut self) {
        self.next += 1;
        if let Err(e) = self.store.set(SAVE_COUNTER_KEY, &self.next.to_string()).await {
            warn!(error = %e, next = self.next, "could not persist save counter");
        }
    }

    /// Stores a composed booth JPEG under the current name, then advances.
    /// The counter only moves when the save succeeds.
    pub async fn save_photo(
        &mut self,
        storage: &dyn ArtifactStorage,
        jpeg: Vec<u8>,
    ) -> Result<SavedArtifact> {
        let saved = storage.store(&Artifact::new(self.file_name(), "image/jpeg", jpeg))?;
        self.advance().await;
        Ok(saved)
    }
}
