//! Error types for the chat client
//!
//! Transport failures are kept apart from session errors: the former are
//! rendered to the user as a generic message, the latter are caller mistakes.

use thiserror::Error;

/// Errors raised while talking to the query backend
///
/// Every variant is a tier-one (infrastructure) failure. Application-level
/// failures arrive inside a successful response and never become a
/// `TransportError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the connection dropped
    #[error("Failed to reach query backend: {0}")]
    Network(String),

    /// The backend answered with a non-success status code
    #[error("Query backend returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for logs only
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// No response arrived within the configured timeout
    #[error("Query backend did not respond within {0} seconds")]
    Timeout(u64),
}

/// Errors returned by chat session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// A history index did not refer to a saved conversation
    #[error("History index {index} is out of range (history has {len} items)")]
    HistoryIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of saved conversations
        len: usize,
    },

    /// The backend could not be reached or answered unusably
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration loading failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be used
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
