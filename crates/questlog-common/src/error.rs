//! Error types for QuestLog.

use thiserror::Error;

use crate::version::SchemaVersion;

/// Top-level error type for QuestLog operations that touch the outside world.
#[derive(Debug, Error)]
pub enum QuestlogError {
    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version found in the data
        actual: SchemaVersion,
    },
}

impl From<serde_json::Error> for QuestlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for QuestLog operations.
pub type QuestlogResult<T> = Result<T, QuestlogError>;
