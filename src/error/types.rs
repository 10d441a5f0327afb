//! Error types
//!
//! Defines the errors surfaced by the authentication adapter. None of them
//! are caught internally, the host decides how to recover.

use std::fmt;

/// Authentication adapter errors
#[derive(Debug)]
pub enum AuthError {
    /// The credential POST never produced a usable response. Covers
    /// connect and DNS failures, timeouts and non-2xx statuses.
    Transport(reqwest::Error),
    /// The response body was not parseable JSON.
    InvalidJson(serde_json::Error),
    /// The response body, or the value under the configured base key,
    /// did not have the expected JSON shape.
    UnexpectedBody(String),
    /// A mapped key was absent from a non-empty response object. Signals
    /// a mismatch between the mapping configuration and the endpoint.
    MissingField(String),
    /// A user field was requested under an unknown name, or before any
    /// authentication attempt populated the record.
    InvalidField(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Transport(e) => write!(f, "Authentication request failed: {}", e),
            AuthError::InvalidJson(e) => write!(f, "Malformed JSON response: {}", e),
            AuthError::UnexpectedBody(s) => write!(f, "Unexpected response body: {}", s),
            AuthError::MissingField(k) => write!(f, "Response is missing expected field: {}", k),
            AuthError::InvalidField(n) => write!(f, "Invalid user field name: {}", n),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        AuthError::Transport(error)
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        AuthError::InvalidJson(error)
    }
}
