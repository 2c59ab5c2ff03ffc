//! Error taxonomy shared by every [`SearchProvider`](crate::provider::SearchProvider).
//!
//! Controllers treat [`ProviderError::Cancelled`] as a silent outcome and
//! surface everything else as a human-readable message. Nothing here is
//! retried automatically.

use thiserror::Error;

/// A failure reported by a remote provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The operation was superseded or explicitly cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// No connectivity, DNS failure, timeout, or a dropped connection.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{}", status_message(.status))]
    Server { status: u16, body: String },

    /// The response body could not be decoded into the expected shape.
    #[error("unexpected response from server: {message}")]
    Decode { message: String, body: String },
}

impl ProviderError {
    /// True for the cancellation path, which callers must swallow.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }

    /// HTTP status for [`ProviderError::Server`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_message(status: &u16) -> String {
    match *status {
        400 => "the server rejected the request (HTTP 400)".to_string(),
        401 | 403 => format!("not authorized (HTTP {})", status),
        404 => "not found (HTTP 404)".to_string(),
        429 => "too many requests, try again shortly (HTTP 429)".to_string(),
        500..=599 => format!("the server had a problem (HTTP {})", status),
        other => format!("server returned HTTP {}", other),
    }
}
