//! Error types for the digest job.

use crate::channel::Channel;

/// Top-level error for a digest run.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("channel listing failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("posting digest failed: {0}")]
    Notify(#[source] SlackError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid target date {value:?}: expected YYYYMMDD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from a single Slack Web API call.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("{method}: request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method}: HTTP status {status}")]
    Status {
        method: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{method}: API error: {error}")]
    Api { method: &'static str, error: String },

    #[error("{method}: malformed response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A listing page failed. Carries whatever was accumulated before it.
#[derive(Debug, thiserror::Error)]
#[error("page {page}: {source}")]
pub struct FetchError {
    /// 1-based index of the page that failed.
    pub page: usize,
    #[source]
    pub source: SlackError,
    /// Channels collected from the pages that succeeded.
    pub partial: Vec<Channel>,
}
