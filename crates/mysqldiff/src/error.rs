//! Error types for schema fetching and comparison.

use std::fmt;
use std::path::PathBuf;

/// Which side of the comparison a setting or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The desired schema (`--src-*`).
    Reference,
    /// The current schema (`--dst-*`).
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reference => "src",
            Self::Target => "dst",
        })
    }
}

/// Errors that can occur while fetching or comparing schemas.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The SQL file describing a schema could not be read.
    #[error("Failed to read schema file '{path}': {source}")]
    SchemaFile {
        /// Path to the SQL file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Database error while connecting, loading or introspecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (writing the report).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (JSON report).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for schema fetching and comparison.
pub type Result<T> = std::result::Result<T, DiffError>;
