//! Unified application error types for DocVault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Adapters classify failures at the
//! point where they happen, so higher layers only ever inspect [`ErrorKind`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Missing, invalid or expired bearer token, or the token's user no longer exists.
    Unauthorized,
    /// A user with the same email is already registered.
    DuplicateEmail,
    /// Unknown email or wrong password at login.
    InvalidCredentials,
    /// A required input (file, date, share recipient) was not supplied.
    MissingInput,
    /// A calendar date string could not be parsed.
    InvalidDate,
    /// The requested resource was not found.
    NotFound,
    /// The object store or the metadata index failed or could not be reached.
    UpstreamUnavailable,
    /// A staged local file could not be removed. Logged, never surfaced.
    LocalCleanupFailed,
    /// A request body failed validation.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::DuplicateEmail => write!(f, "DUPLICATE_EMAIL"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::MissingInput => write!(f, "MISSING_INPUT"),
            Self::InvalidDate => write!(f, "INVALID_DATE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UpstreamUnavailable => write!(f, "UPSTREAM_UNAVAILABLE"),
            Self::LocalCleanupFailed => write!(f, "LOCAL_CLEANUP_FAILED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocVault.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a duplicate-email error.
    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateEmail, message)
    }

    /// Create an invalid-credentials error.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredentials, message)
    }

    /// Create a missing-input error.
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingInput, message)
    }

    /// Create an invalid-date error.
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDate, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an upstream-unavailable error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error reports a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Reclassify as [`ErrorKind::UpstreamUnavailable`], keeping `NotFound` intact.
    ///
    /// Used at the custody boundary so that any adapter failure other than
    /// a missing object surfaces under one category.
    pub fn into_upstream(self) -> Self {
        match self.kind {
            ErrorKind::NotFound | ErrorKind::UpstreamUnavailable => self,
            _ => Self {
                kind: ErrorKind::UpstreamUnavailable,
                message: self.message,
                source: self.source,
            },
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
