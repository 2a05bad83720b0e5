use std::time::Duration;

use thiserror::Error;

/// Failure of one logical GET, after redirect handling.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed with status {status}")]
    Http { url: String, status: u16 },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure of the fan-out as a whole. No partial data accompanies it.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("status resolution for {source_id} was cancelled: {reason}")]
    Cancelled { source_id: String, reason: String },
}
