//! Error types for remote mediation calls.

use thiserror::Error;

/// Failure modes of a mediation or rewrite request.
///
/// `Cancelled` is special: it must never produce a state mutation or any
/// user-visible effect. Everything else is a retryable transport/service
/// failure that the caller degrades from (stale risk state, local
/// suggestions) rather than surfacing as a hard error.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request exceeded the connect or read timeout.
    #[error("request timed out")]
    Timeout,

    /// No connectivity, DNS failure, or connection refused.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a non-2xx status.
    #[error("server error: {0}")]
    Server(u16),

    /// The response body could not be parsed against the contract.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request was superseded before its result was applied.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Short notice shown when a rewrite request degrades to local
    /// suggestions. Non-blocking; never an error badge.
    pub fn offline_notice(&self) -> &'static str {
        match self {
            ApiError::Timeout => "Request timed out - using offline suggestions",
            ApiError::Unreachable(_) => "No internet connection - using offline suggestions",
            ApiError::Server(_) => "Server error - using offline suggestions",
            ApiError::Malformed(_) => "Unexpected reply - using offline suggestions",
            ApiError::Cancelled => "",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}
