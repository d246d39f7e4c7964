use std::fmt;

use chrono::Utc;

use super::Store;
use crate::error::{BrainError, Result};
use crate::legacy::{self, LEGACY_STATE_KEY};
use crate::seed::SeedData;
use crate::storage::database::{clear_tables, Database};

/// Where the store is in its startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    /// Fresh engine with schema, no data yet
    SeedingNeeded,
    /// Fresh engine populated, first snapshot pending
    Seeded,
    Ready,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Loading => "loading",
            LifecycleState::SeedingNeeded => "seeding-needed",
            LifecycleState::Seeded => "seeded",
            LifecycleState::Ready => "ready",
        };
        f.write_str(name)
    }
}

impl Store {
    /// Open the store: restore the last snapshot, or create, populate and
    /// snapshot a fresh engine.
    ///
    /// Safe to call repeatedly and concurrently. Later callers wait for the
    /// first one and return once the store is ready. On failure the store
    /// stays uninitialized and the error is returned.
    pub async fn init(&self) -> Result<()> {
        let _gate = self.lifecycle_gate.lock().await;
        if self.is_ready() {
            return Ok(());
        }

        self.set_state(LifecycleState::Loading);
        match self.open().await {
            Ok(()) => {
                self.set_state(LifecycleState::Ready);
                tracing::info!("store ready");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to open store");
                let mut inner = self.lock();
                inner.db = None;
                inner.state = LifecycleState::Uninitialized;
                Err(err)
            }
        }
    }

    async fn open(&self) -> Result<()> {
        if let Some(image) = self.snapshots.load().await? {
            let db = Database::from_image(&image)?;
            db.apply_schema()?;
            tracing::info!(bytes = image.len(), "snapshot loaded");
            self.install(db);
            return Ok(());
        }

        tracing::info!("no snapshot found, creating a fresh store");
        let mut db = Database::create()?;
        db.apply_schema()?;
        self.set_state(LifecycleState::SeedingNeeded);

        let now = Utc::now();
        let imported = match legacy::read(self.blob.as_ref()).await {
            Some(state) => match db.transaction(|conn| state.insert(conn, now)) {
                Ok(summary) => {
                    tracing::info!(?summary, "legacy state imported");
                    true
                }
                Err(err) => {
                    tracing::warn!(error = %err, "legacy import failed, seeding defaults instead");
                    false
                }
            },
            None => false,
        };
        if !imported {
            let seed = SeedData::defaults(now)?;
            db.transaction(|conn| seed.insert(conn))?;
            tracing::info!("seed data inserted");
        }
        self.set_state(LifecycleState::Seeded);
        self.install(db);

        let wanted = self.snapshots.mark_dirty();
        let flushed = self.flush_through(wanted).await;
        if imported && flushed {
            if let Err(err) = self.blob.remove(LEGACY_STATE_KEY).await {
                tracing::warn!(error = %err, "could not remove imported legacy state");
            }
        }
        Ok(())
    }

    /// Replace every record with the default seed data.
    ///
    /// Fails with [`BrainError::NotReady`] unless the store is ready. The
    /// clear and the re-seed happen in one transaction.
    pub async fn reset(&self) -> Result<()> {
        let _gate = self.lifecycle_gate.lock().await;
        {
            let mut inner = self.lock();
            if inner.state != LifecycleState::Ready {
                return Err(BrainError::NotReady);
            }
            let db = inner.db.as_mut().ok_or(BrainError::NotReady)?;
            let seed = SeedData::defaults(Utc::now())?;
            db.transaction(|conn| {
                clear_tables(conn)?;
                seed.insert(conn)
            })?;
        }
        tracing::info!("store reset to seed data");

        let wanted = self.snapshots.mark_dirty();
        self.flush_through(wanted).await;
        Ok(())
    }

    fn install(&self, db: Database) {
        self.lock().db = Some(db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    #[tokio::test]
    async fn test_state_moves_to_ready() {
        let store = Store::in_memory();
        assert_eq!(store.state(), LifecycleState::Uninitialized);
        store.init().await.unwrap();
        assert_eq!(store.state(), LifecycleState::Ready);
        assert_eq!(store.get_all::<Task>().len(), 8);
    }

    #[tokio::test]
    async fn test_reset_before_init_is_not_ready() {
        let store = Store::in_memory();
        assert!(matches!(store.reset().await, Err(BrainError::NotReady)));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::SeedingNeeded.to_string(), "seeding-needed");
    }
}
