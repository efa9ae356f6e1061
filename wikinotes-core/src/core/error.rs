//! Error types for the Wikinotes core library.
//!
//! Tree operations never fail on stale ids; they return the forest unchanged.
//! [`WikiError`] is reserved for the persistence boundary and for explicit
//! validation of externally supplied documents.

use thiserror::Error;

/// All errors that can occur within the Wikinotes core library.
#[derive(Debug, Error)]
pub enum WikiError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A document ID was requested that does not exist in the store.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A document failed validation (duplicate ids, broken parent links, bad format).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`WikiError`].
pub type Result<T> = std::result::Result<T, WikiError>;

impl WikiError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::DocumentNotFound(_) => "Document no longer exists".to_string(),
            Self::InvalidDocument(msg) => format!("Could not read document: {msg}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
