//! Error types for peerconnect.
//!
//! This module defines the error type shared by the storage layer, the
//! configuration loader, the student directory and the profile manager.
//! View operations never return these for ordinary user actions; they turn
//! write failures into notices instead (see [`crate::notice`]).

use std::path::PathBuf;
use thiserror::Error;

use crate::directory::StudentId;

/// The main error type for peerconnect operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Writing a value to the key-value store failed.
    #[error("failed to write '{key}' to storage: {source}")]
    StorageWrite {
        /// The storage key being written.
        key: String,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A stored value could not be decoded.
    #[error("stored value for '{key}' is corrupt: {source}")]
    CorruptValue {
        /// The storage key being read.
        key: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Directory Errors ===
    /// Two directory records share an id.
    #[error("duplicate student id {0} in directory")]
    DuplicateStudent(StudentId),

    /// No directory record has this id.
    #[error("no student with id {0}")]
    UnknownStudent(StudentId),

    // === Navigation Errors ===
    /// No page is routed at this path.
    #[error("no page at {0}")]
    UnknownRoute(String),

    // === Profile Errors ===
    /// A profile picture could not be read.
    #[error("failed to read picture {path}: {source}")]
    PictureRead {
        /// Path of the picture file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for peerconnect operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a storage write error for the given key.
    #[must_use]
    pub fn storage_write(key: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::StorageWrite {
            key: key.into(),
            source,
        }
    }

    /// Create a corrupt value error for the given key.
    #[must_use]
    pub fn corrupt_value(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptValue {
            key: key.into(),
            source,
        }
    }

    /// Check if this error is a failed write to the key-value store.
    #[must_use]
    pub fn is_storage_write(&self) -> bool {
        matches!(self, Self::StorageWrite { .. })
    }

    /// Check if this error is an undecodable stored value.
    #[must_use]
    pub fn is_corrupt_value(&self) -> bool {
        matches!(self, Self::CorruptValue { .. })
    }
}
