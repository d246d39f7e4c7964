//! Snapshot persistence: whole-image flushes to a single blob slot.
//!
//! Every mutation takes a generation number from [`Snapshotter::mark_dirty`]
//! and then awaits [`Snapshotter::flush_through`] for it. Flushes run one at
//! a time behind an async gate, and the image is captured inside the gate,
//! so images reach the blob store in the order they were taken. A flush
//! whose generation is already covered by a completed flush writes nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::blob::BlobStore;

/// Blob key holding the serialized engine image.
pub const SNAPSHOT_KEY: &str = "db";

/// What a flush request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// A new image was written
    Written { bytes: usize },
    /// A flush that completed meanwhile already covered this request
    Coalesced,
}

pub struct Snapshotter {
    blob: Arc<dyn BlobStore>,
    generation: AtomicU64,
    /// Highest generation known to be in the blob store.
    written: Mutex<u64>,
}

impl Snapshotter {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            generation: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    /// Read the last snapshot. An empty slot counts as no snapshot.
    pub async fn load(&self) -> Result<Option<Vec<u8>>> {
        let image = self.blob.get(SNAPSHOT_KEY).await?;
        Ok(image.filter(|bytes| !bytes.is_empty()))
    }

    /// Record that in-memory state changed; returns the generation to flush.
    pub fn mark_dirty(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Make sure the blob store holds an image at least as new as `wanted`.
    ///
    /// `capture` serializes the engine; it runs while the flush gate is held.
    /// On failure nothing is recorded as written, so the next flush retries
    /// with the latest state.
    pub async fn flush_through<F>(&self, wanted: u64, capture: F) -> Result<FlushOutcome>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let mut written = self.written.lock().await;
        if *written >= wanted {
            tracing::debug!(wanted, written = *written, "snapshot flush coalesced");
            return Ok(FlushOutcome::Coalesced);
        }

        let covered = self.generation.load(Ordering::SeqCst);
        let image = capture()?;
        let bytes = image.len();
        self.blob.put(SNAPSHOT_KEY, image).await?;
        *written = covered;

        tracing::debug!(generation = covered, bytes, "snapshot flushed");
        Ok(FlushOutcome::Written { bytes })
    }
}
