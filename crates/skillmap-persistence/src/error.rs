//! Error types for worker store operations

use skillmap_types::SkillError;
use thiserror::Error;

/// Worker store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another worker already uses this name
    #[error("Worker '{0}' already exists")]
    DuplicateName(String),

    /// No worker with this name (only raised by update; reads return `None`)
    #[error("Worker '{0}' not found")]
    NotFound(String),

    /// A skill level outside the allowed range; nothing was written
    #[error(transparent)]
    Invalid(#[from] SkillError),

    /// Backup destination already exists
    #[error("Backup target '{0}' already exists")]
    BackupExists(String),

    /// The database could not be opened, read or written
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// A stored skill vector is not a JSON array of levels
    #[error("Corrupt skill levels for worker '{name}': {source}")]
    Encoding {
        /// Worker whose row failed to decode
        name: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Map a failed insert/update, turning UNIQUE violations into `DuplicateName`
    pub(crate) fn from_write(err: sqlx::Error, name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::DuplicateName(name.to_string())
            }
            _ => Self::Persistence(err),
        }
    }
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
