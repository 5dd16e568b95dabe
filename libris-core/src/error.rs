//! Error types for Libris Core

use thiserror::Error;

/// Result type alias using LibrisError
pub type Result<T> = std::result::Result<T, LibrisError>;

/// Top-level error type for all Libris operations
#[derive(Debug, Error)]
pub enum LibrisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LibrisError {
    /// Message suitable for showing to the user.
    ///
    /// Validation errors use their own text; API errors use the server text
    /// when there is one and `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.user_message(fallback),
            other => other.to_string(),
        }
    }
}

/// Client-side rule violations. These never reach the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("You already have {max} active reservations. Cannot reserve more.")]
    QuotaExceeded { max: usize },

    #[error("Lending period must be between 1 and 28 days (got {days}).")]
    InvalidPeriod { days: u32 },

    #[error("Please select a return library.")]
    MissingReturnLibrary,

    #[error("This book has no copy that can be reserved.")]
    MissingCopy,

    #[error("Please login first.")]
    NotSignedIn,

    #[error("Your account is not allowed to do that.")]
    Forbidden,

    #[error("Invalid or missing token.")]
    MissingToken,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Failures talking to the catalog API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("{}", message.as_deref().unwrap_or("request rejected"))]
    Rejected { status: u16, message: Option<String> },

    /// The bearer token was missing, expired or refused
    #[error("Unauthorized - please login again")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Server text for a duplicate registration
const DUPLICATE_EMAIL: &str = "Email already registered.";

impl ApiError {
    /// Server-supplied message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server text verbatim, or `fallback` when the server gave none
    pub fn user_message(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Whether a registration failed because the email is taken
    pub fn is_duplicate_email(&self) -> bool {
        self.message().map(str::trim) == Some(DUPLICATE_EMAIL)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Cover lookup failures. Always folded into a `NotFound` cover entry.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("cover lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cover lookup returned status {0}")]
    Status(u16),
}

/// Errors that occur in the key-value store backing the session
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt store: {0}")]
    Corrupt(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors that occur while reading client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be at least 1")]
    OutOfRange { key: &'static str },

    #[error("No session file location; set LIBRIS_SESSION_FILE")]
    NoSessionPath,

    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Copy already reserved.".to_string()),
        };
        assert_eq!(err.user_message("Failed to reserve."), "Copy already reserved.");
        assert_eq!(err.to_string(), "Copy already reserved.");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to reserve."), "Failed to reserve.");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message("Failed to reserve."), "Failed to reserve.");
    }

    #[test]
    fn test_duplicate_email_detection() {
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Email already registered.".to_string()),
        };
        assert!(err.is_duplicate_email());
        assert!(!ApiError::Unauthorized.is_duplicate_email());
    }

    #[test]
    fn test_validation_passes_through_top_level() {
        let err = LibrisError::from(ValidationError::MissingReturnLibrary);
        assert_eq!(err.user_message("ignored"), "Please select a return library.");
    }
}
