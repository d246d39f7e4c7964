//! Error types for Brain core operations.
//!
//! Errors are descriptive at the core level. The `Store` façade decides
//! which of them reach callers and which degrade to defaults.

use thiserror::Error;

/// Result type alias for Brain operations.
pub type Result<T> = std::result::Result<T, BrainError>;

/// Core error type for Brain operations.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The store has not finished initializing
    #[error("Store is not ready")]
    NotReady,

    /// Registry or row mapping mismatch
    #[error("Schema error: {0}")]
    Schema(String),

    /// A stored value could not be decoded into its application type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Storage engine error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Blob store read/write error
    #[error("Blob store error: {0}")]
    BlobStore(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
