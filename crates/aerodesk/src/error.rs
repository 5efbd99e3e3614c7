//! Error types for aerodesk.
//!
//! This module defines all error types used throughout the aerodesk crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for aerodesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Catalog Errors ===
    /// Failed to open or create the catalog database.
    #[error("failed to open catalog database at {path}: {source}")]
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

    /// A name collides with an existing entry.
    #[error("duplicate name '{name}' for {kind}")]
    DuplicateName {
        /// Kind of entity (aircraft, characteristic, category, option, selection).
        kind: &'static str,
        /// The offending name.
        name: String,
    },

    /// A requested entity does not exist.
    #[error("{kind} not found: {ident}")]
    NotFound {
        /// Kind of entity.
        kind: &'static str,
        /// Identifier or name that was looked up.
        ident: String,
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

    // === Project Errors ===
    /// The project directory or manifest does not exist.
    #[error("project '{name}' does not exist")]
    ProjectNotFound {
        /// Name of the project.
        name: String,
    },

    /// A project with this name already exists.
    #[error("project '{name}' already exists")]
    ProjectExists {
        /// Name of the project.
        name: String,
    },

    // === Document Errors ===
    /// A document field or value failed validation.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
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

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for aerodesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a duplicate-name error.
    #[must_use]
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(kind: &'static str, ident: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            ident: ident.to_string(),
        }
    }

    /// Check if this error is a not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ProjectNotFound { .. })
    }

    /// Check if this error is a duplicate-name condition.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }
}
