//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CalendarProvider;

/// Main error type for Studyflow
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StudyflowError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A stale credential cannot be refreshed without a refresh token.
    #[error("no refresh token stored for integration")]
    MissingRefreshToken,

    /// The provider's token endpoint rejected a refresh attempt.
    #[error("token refresh failed for {provider}: {response_body}")]
    TokenRefreshFailed {
        provider: CalendarProvider,
        response_body: String,
    },

    /// A create/update/list call against a provider event API returned
    /// non-success. Delete failures are reported but treated as soft by
    /// callers.
    #[error("{provider} {operation} request failed: {response_body}")]
    ProviderRequestFailed {
        provider: CalendarProvider,
        operation: String,
        response_body: String,
    },

    /// Control-flow signal: an equivalent notification already exists inside
    /// the dedup window. Not a user-visible failure.
    #[error("duplicate notification suppressed")]
    DuplicateSuppressed,

    /// A time block carried an unparseable "HH:MM" boundary.
    #[error("malformed time block: {0}")]
    MalformedTimeBlock(String),
}

/// Result type alias for Studyflow operations
pub type Result<T> = std::result::Result<T, StudyflowError>;
