use huddle_shared::error::HuddleError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error. Raised by a failed commit, in which case nothing from
    /// the batch was written.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A required raw batch was empty or could not be decoded.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A handler was asked about a table it does not know.
    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// The writer thread behind an operator handle has stopped.
    #[error("Store runtime is closed")]
    RuntimeClosed,
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_unknown_entity_kind(&self) -> bool {
        matches!(self, StoreError::UnknownEntityKind(_))
    }
}

impl From<HuddleError> for StoreError {
    fn from(e: HuddleError) -> Self {
        match e {
            HuddleError::UnknownTable(table) => StoreError::UnknownEntityKind(table),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
