//! The store façade: generic CRUD over records, backed by the in-memory
//! engine and flushed to a blob store after every mutation.
//!
//! Until [`Store::init`] has completed, reads return empty results and
//! mutations do nothing. Storage failures inside CRUD calls are logged and
//! degrade the same way; only lifecycle calls return errors.

mod collection;
mod dynamic;
mod lifecycle;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{BrainError, Result};
use crate::model::Record;
use crate::schema::ALL_TABLES;
use crate::settings::Settings;
use crate::storage::blob::{BlobStore, MemoryBlobStore};
use crate::storage::database::Database;
use crate::storage::snapshot::Snapshotter;

pub use collection::Collection;
pub use lifecycle::LifecycleState;

/// Row count of one table, as reported by [`Store::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: u64,
}

struct Inner {
    state: LifecycleState,
    db: Option<Database>,
}

pub struct Store {
    blob: Arc<dyn BlobStore>,
    snapshots: Snapshotter,
    inner: Mutex<Inner>,
    /// Serializes `init` and `reset`.
    lifecycle_gate: tokio::sync::Mutex<()>,
}

impl Store {
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            snapshots: Snapshotter::new(Arc::clone(&blob)),
            blob,
            inner: Mutex::new(Inner {
                state: LifecycleState::Uninitialized,
                db: None,
            }),
            lifecycle_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// A store whose snapshots live only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBlobStore::new()))
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LifecycleState::Ready
    }

    /// Typed handle for one record kind.
    pub fn collection<R: Record>(&self) -> Collection<'_, R> {
        Collection::new(self)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }

    /// Every record of kind `R`, in storage order.
    pub fn get_all<R: Record>(&self) -> Vec<R> {
        self.read("get_all", |db| db.select_all::<R>())
            .unwrap_or_default()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.read("get", |db| db.select_one::<R>(id)).flatten()
    }

    /// Insert or replace `record`, then flush. Returns whether it was applied.
    pub async fn upsert<R: Record>(&self, record: &R) -> bool {
        self.mutate("upsert", |db| db.upsert(record)).await
    }

    /// Insert or replace several records atomically, then flush once.
    pub async fn upsert_many<R: Record>(&self, records: &[R]) -> bool {
        self.mutate("upsert_many", |db| db.upsert_all(records)).await
    }

    /// Delete by primary key, clearing references to it, then flush.
    ///
    /// Deleting a missing id still counts as applied.
    pub async fn delete<R: Record>(&self, id: &str) -> bool {
        self.mutate("delete", |db| db.delete::<R>(id).map(|_| ()))
            .await
    }

    /// Write a snapshot now, reporting failure to the caller.
    pub async fn flush(&self) -> Result<()> {
        if !self.is_ready() {
            return Err(BrainError::NotReady);
        }
        let wanted = self.snapshots.mark_dirty();
        self.snapshots
            .flush_through(wanted, || self.capture())
            .await
            .map(|_| ())
    }

    /// Run the engine integrity check and count rows per table.
    pub fn check(&self) -> Result<Vec<TableCount>> {
        let inner = self.lock();
        let db = ready_db(&inner)?;
        db.integrity_check()?;
        ALL_TABLES
            .iter()
            .map(|table| {
                Ok(TableCount {
                    table: table.name,
                    rows: db.row_count(table)?,
                })
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: LifecycleState) {
        let mut inner = self.lock();
        tracing::debug!(from = %inner.state, to = %state, "lifecycle transition");
        inner.state = state;
    }

    fn read<T>(&self, op: &'static str, f: impl FnOnce(&Database) -> Result<T>) -> Option<T> {
        let inner = self.lock();
        let db = match ready_db(&inner) {
            Ok(db) => db,
            Err(_) => {
                tracing::debug!(op, "store not ready, returning empty result");
                return None;
            }
        };
        match f(db) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(op, error = %err, "read failed");
                None
            }
        }
    }

    async fn mutate(&self, op: &'static str, f: impl FnOnce(&mut Database) -> Result<()>) -> bool {
        {
            let mut inner = self.lock();
            let ready = inner.state == LifecycleState::Ready;
            let Some(db) = inner.db.as_mut().filter(|_| ready) else {
                tracing::debug!(op, "store not ready, mutation ignored");
                return false;
            };
            if let Err(err) = f(db) {
                tracing::warn!(op, error = %err, "mutation failed");
                return false;
            }
        }
        let wanted = self.snapshots.mark_dirty();
        self.flush_through(wanted).await;
        true
    }

    /// Flush up to `wanted`, logging failure. Returns whether it succeeded.
    async fn flush_through(&self, wanted: u64) -> bool {
        match self.snapshots.flush_through(wanted, || self.capture()).await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "snapshot flush failed, keeping in-memory state");
                false
            }
        }
    }

    fn capture(&self) -> Result<Vec<u8>> {
        let inner = self.lock();
        inner.db.as_ref().ok_or(BrainError::NotReady)?.image()
    }
}

fn ready_db(inner: &Inner) -> Result<&Database> {
    match (inner.state, inner.db.as_ref()) {
        (LifecycleState::Ready, Some(db)) => Ok(db),
        _ => Err(BrainError::NotReady),
    }
}
