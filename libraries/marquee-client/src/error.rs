//! Error types for the Marquee client.

use thiserror::Error;

/// Errors that can occur when interacting with a catalog backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend rejected the request with an `{"error": ...}` body
    #[error("Request rejected ({status}): {error}")]
    ApiError { status: u16, error: String },

    /// Server returned an error response without a structured body
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available or token rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for poster loading
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error while reading a poster
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server is offline, unreachable, or did not answer in time
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// Message the backend supplied for a rejected write, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { error, .. } if !error.trim().is_empty() => Some(error.as_str()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
