// src/error.rs

use thiserror::Error;

/// Failure to obtain a record set from the remote source.
///
/// Callers treat every variant the same way: log it and render "no data".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unexpected payload shape: {0}")]
    Shape(String),
    /// Raised by in-memory sources switched into failure mode.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Transport and status failures are worth another attempt; a body that
    /// arrived but does not parse will not get better on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Request { .. } | FetchError::Timeout { .. } | FetchError::Status { .. }
        )
    }
}

/// Which side of a comparison a resolution failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("both regions must be selected")]
    MissingSelection,
    #[error("{which:?} region {name:?} is not in the fetched record set")]
    NotFound { which: Side, name: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Geolocation capability failures. Both are surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("location access denied")]
    PermissionDenied,
    #[error("geolocation not supported")]
    Unsupported,
}
