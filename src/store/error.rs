//! Entry store error types

use thiserror::Error;

/// Errors that can occur in the entry store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Payload is obfuscated and the passphrase is missing or wrong
    #[error("Wrong or missing passphrase for obfuscated store")]
    WrongPassphrase,

    /// Requested entry does not exist
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Invalid mood value outside [1, 5]
    #[error("Invalid mood value: {0} (expected 1-5)")]
    InvalidMood(u8),

    /// Backup payload could not be decoded
    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
