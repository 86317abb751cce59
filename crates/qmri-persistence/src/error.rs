//! Error types for snapshot persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while producing, encoding, or reconciling model snapshots.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O failed while reading or writing a snapshot artifact.
    #[error("failed to {operation} snapshot file {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded to its byte format.
    #[error("failed to encode snapshot: {reason}")]
    Encode { reason: String },

    /// Snapshot bytes could not be decoded into a snapshot record.
    #[error("failed to decode snapshot: {reason}")]
    Decode { reason: String },

    /// A declared model property could not be represented in the
    /// persisted format.
    #[error("property '{property}' is not representable in a snapshot")]
    Serialization { property: String },

    /// The incoming snapshot carries no version tag.
    #[error("snapshot is missing its version tag")]
    SchemaMismatch,

    /// A property name outside the model's declared schema was assigned.
    #[error("model has no property named '{name}'")]
    UnknownProperty { name: String },
}

impl PersistenceError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
