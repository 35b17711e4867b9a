//! Directions provider error types.

use super::polyline::PolylineError;

/// Errors from a directions provider.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// No API key configured; the request was never sent
    #[error("directions API key is not configured")]
    MissingApiKey,

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("directions API error {status}: {message}")]
    Api { status: u16, message: String },

    /// API answered 200 but reported a failure in its payload
    #[error("directions provider returned {status}: {message}")]
    Provider { status: String, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Request succeeded but the provider had no route
    #[error("no route found ({detail})")]
    NoRoute { detail: String },

    /// Encoded route geometry could not be decoded
    #[error("invalid route polyline: {0}")]
    Polyline(#[from] PolylineError),

    /// The request did not complete in time
    #[error("directions request timed out")]
    Timeout,

    /// Opaque transport failure, possibly without a message
    #[error("{0}")]
    Transport(String),
}

impl DirectionsError {
    /// Whether a local estimate is an acceptable substitute for this failure.
    ///
    /// Only network trouble and server-side (5xx) errors qualify. Rejected
    /// credentials, bad requests, unreadable payloads and "no route" answers
    /// are surfaced.
    pub fn is_transient(&self) -> bool {
        match self {
            DirectionsError::Http(_) | DirectionsError::Timeout | DirectionsError::Transport(_) => {
                true
            }
            DirectionsError::Api { status, .. } => *status >= 500,
            DirectionsError::MissingApiKey
            | DirectionsError::Provider { .. }
            | DirectionsError::Json { .. }
            | DirectionsError::NoRoute { .. }
            | DirectionsError::Polyline(_) => false,
        }
    }
}
