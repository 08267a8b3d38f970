//! Error types for Censys search requests.

use thiserror::Error;

pub const INVALID_CREDENTIALS: &str = "Your Censys credentials look invalid.";
pub const RATE_LIMITED: &str = "Looks like you exceeded your Censys account limits rate. Exiting";

/// Failure of a search request. Every variant is fatal to a run; none are retried.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP 401
    #[error("{}", INVALID_CREDENTIALS)]
    Authentication,

    /// HTTP 429
    #[error("{}", RATE_LIMITED)]
    RateLimited,

    /// Any other non-success status
    #[error("Censys API error: {status}")]
    Api { status: u16 },

    #[error("HTTP error: {0}")]
    Transport(#[from] wreq::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            429 => Self::RateLimited,
            _ => Self::Api { status },
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
