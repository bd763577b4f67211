//! Error types for the profile-data crate.
//!
//! Everything here deals with small local files (settings, cookies, the
//! known-candidate list, the forbidden list), so the variants are mostly
//! about I/O and about content that could not be understood.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing local state
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O error occurred while reading or writing a file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted known-candidate data could not be decoded
    ///
    /// The store recovers from this itself; the variant exists so callers
    /// can report what was discarded.
    #[error("Corrupted known-candidate file {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// The known-candidate set could not be encoded
    #[error("Failed to encode known candidates: {0}")]
    Encode(#[from] serde_json::Error),

    /// A setting had a value that is valid for its type but not for its meaning
    #[error("Invalid value for {key}: {value}")]
    InvalidSetting { key: String, value: String },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataError>;
