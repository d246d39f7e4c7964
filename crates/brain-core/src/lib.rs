//! # Brain Core
//!
//! Local persistence engine for Brain, a personal planner and finance
//! workspace.
//!
//! All records live in an in-memory relational engine. After every change
//! the whole engine image is written to a [`BlobStore`], and on startup the
//! last image is restored. A first run (or a reset) fills the store with
//! default seed data.
//!
//! ## Architecture
//!
//! - **value**: conversions between application values and stored primitives
//! - **schema**: the table registry and entity kinds
//! - **model**: record types and their row mappings
//! - **storage**: engine handle, blob stores, snapshot flushing
//! - **store**: the CRUD façade and its lifecycle
//! - **settings**: JSON-valued key-value settings
//! - **seed** / **legacy**: initial data and import of the old JSON format

pub mod error;
pub mod fs;
pub mod legacy;
pub mod model;
pub mod schema;
pub mod seed;
pub mod settings;
pub mod storage;
pub mod store;
pub mod value;

pub use error::{BrainError, Result};
pub use schema::EntityKind;
pub use settings::{Setting, Settings};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, SNAPSHOT_KEY};
pub use store::{Collection, LifecycleState, Store, TableCount};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
