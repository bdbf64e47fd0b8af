//! Error types for the todolink crates.
//!
//! One unified error type with explicit variants for transport,
//! authentication, protocol, input validation and storage failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for todolink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (unexpected status codes or bodies).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true if the server answered with 401 or 403, or the session
    /// could not be recovered.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Protocol(err) => err.is_auth_error(),
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The session expired and could not be refreshed.
    #[error("session expired")]
    SessionExpired,

    /// The refresh endpoint did not issue new tokens.
    #[error("token refresh failed: {reason}")]
    RefreshFailed { reason: String },
}

/// Protocol-level errors from the remote API.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, or a description of the bad body.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A token cannot be carried in an HTTP header.
    #[error("token is not a valid header value")]
    HeaderValue,

    /// Unknown theme name or ordinal.
    #[error("invalid theme '{value}'")]
    Theme { value: String },

    /// Unknown language code.
    #[error("invalid language '{value}'")]
    Language { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file does not contain a valid key/value document.
    #[error("corrupt store {path}: {message}")]
    Corrupt { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_display_includes_message() {
        let err = ProtocolError::new(500, Some("boom".to_string()));
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(ProtocolError::new(404, None).to_string(), "HTTP 404");
    }

    #[test]
    fn forbidden_counts_as_auth_error() {
        assert!(Error::from(ProtocolError::new(403, None)).is_auth_error());
        assert!(Error::from(ProtocolError::new(401, None)).is_auth_error());
        assert!(!Error::from(ProtocolError::new(500, None)).is_auth_error());
        assert!(Error::from(AuthError::SessionExpired).is_auth_error());
    }
}
