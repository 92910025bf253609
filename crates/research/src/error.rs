//! Provider-side failures.

use std::time::Duration;

/// Errors from setup providers and the text model behind them.
///
/// `Timeout` and `MalformedResponse` are kept apart from the generic
/// upstream failures so callers can tell "try again" from "service
/// unavailable" from "the model answered nonsense".
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered but produced no text.
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Provider-side failure reported in-band.
    #[error("Provider error: {0}")]
    Upstream(String),

    /// The call did not finish within its deadline.
    #[error("Provider call timed out after {}s", after.as_secs())]
    Timeout { after: Duration },

    /// The response could not be recovered into structured data.
    #[error("Malformed provider response: {reason}")]
    MalformedResponse {
        reason: String,
        /// Full response text, kept for diagnostics.
        raw: String,
    },
}

impl ResearchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
