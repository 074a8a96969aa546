//! Configuration types for the Marquee client.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to a catalog backend.
///
/// The access token travels with the configuration (and the client built
/// from it) rather than being installed as a process-wide default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://catalog.example.com/api")
    pub url: String,
    /// Bearer token sent with every request, if any
    pub access_token: Option<String>,
    /// Upper bound for a single request, connect included
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a config with an access token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Timing and limits for the add-form controls.
#[derive(Debug, Clone)]
pub struct FormSettings {
    /// Debounce before each duplicate check fires
    pub duplicate_debounce: Duration,
    /// Debounce before a suggest query fires
    pub suggest_debounce: Duration,
    /// Maximum number of suggestions requested and kept
    pub suggest_limit: u32,
    /// Minimum trimmed query length (in characters) before suggesting
    pub suggest_min_chars: usize,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            duplicate_debounce: Duration::from_millis(350),
            suggest_debounce: Duration::from_millis(250),
            suggest_limit: 8,
            suggest_min_chars: 2,
        }
    }
}
