//! Error types for the file-backed store.
//!
//! All errors are propagated via [`DbError`], which records the path the
//! failing operation touched. The economy sees them as
//! [`StoreError::Backend`] through the `From` conversion below.

use std::path::PathBuf;

use reservoir_core::StoreError;

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading, writing, or renaming the state file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The state file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The state file was written by an incompatible format version.
    #[error("Unsupported state file version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found on disk.
        found: u32,
        /// Version this build reads and writes.
        expected: u32,
    },
}

impl DbError {
    /// Attach a path to an I/O error.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Serialization(inner) => Self::Serialization(inner),
            other => Self::Backend(other.to_string()),
        }
    }
}
