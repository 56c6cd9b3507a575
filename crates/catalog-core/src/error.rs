//! Error types for the catalog.
//!
//! Callers see two kinds of failure: validation failures, which carry
//! per-field messages meant for the user, and persistence failures, which
//! carry only a generic message. Everything else is internal detail that the
//! service layer folds into one of those two.

use crate::config::EntityKind;
use crate::model::Operation;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Field name to list of messages, in field order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Main error type for the catalog library.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{message}")]
    Validation {
        message: String,
        details: FieldErrors,
    },

    #[error("{} not found", .kind.singular_label())]
    NotFound { kind: EntityKind, id: String },

    #[error("Failed to {} {}", .operation.verb(), .kind.as_str())]
    Persistence {
        kind: EntityKind,
        operation: Operation,
    },

    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Store task failed: {message}")]
    Task { message: String },
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl CatalogError {
    pub const VALIDATION_MESSAGE: &'static str = "Validation error";

    /// Build a validation error from collected field messages.
    pub fn validation(details: FieldErrors) -> Self {
        CatalogError::Validation {
            message: Self::VALIDATION_MESSAGE.to_string(),
            details,
        }
    }

    /// Validation error on a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut details = FieldErrors::new();
        details.insert(field.to_string(), vec![message.into()]);
        Self::validation(details)
    }

    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        CatalogError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    pub fn lock_poisoned() -> Self {
        CatalogError::Database {
            message: "Failed to acquire connection lock".to_string(),
            source: None,
        }
    }

    /// Map to the HTTP status the web layer answers with.
    ///
    /// - 400: validation failure
    /// - 404: record not found
    /// - 500: everything else
    pub fn http_status_code(&self) -> u16 {
        match self {
            CatalogError::Validation { .. } => 400,
            CatalogError::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Check if this error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation { .. } | CatalogError::NotFound { .. }
        )
    }

    /// Per-field messages, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CatalogError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// First message for `field`, used when re-rendering a form.
    pub fn first_field_message(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .and_then(|d| d.get(field))
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }
}
