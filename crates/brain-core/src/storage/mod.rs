//! Storage layers beneath the store façade.
//!
//! - [`database`]: the in-memory SQLite engine and its serialized image
//! - [`row`]: column-name keyed encoding and decoding of rows
//! - [`blob`]: async blob stores that hold snapshots
//! - [`snapshot`]: ordered, coalesced snapshot flushes

pub mod blob;
pub mod database;
pub mod row;
pub mod snapshot;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use database::Database;
pub use row::{EncodedRow, RowBuilder, RowValues};
pub use snapshot::{FlushOutcome, Snapshotter, SNAPSHOT_KEY};
