use common::Metric;
use std::time::Duration;
use thiserror::Error;

/// Missing or malformed configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid backend URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Failure reported by the remote store for a single view query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with an error status.
    #[error("HTTP {status}: {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
        hint: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl QueryError {
    /// The store's own error code (e.g. `42P01` for a missing relation).
    pub fn code(&self) -> Option<&str> {
        match self {
            QueryError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Why a metric fetch fell back to its empty value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Error fetching {metric}: {source}")]
    Query {
        metric: Metric,
        #[source]
        source: QueryError,
    },

    /// A row could not be mapped onto the metric's view-model.
    #[error("Error transforming {metric}: {message}")]
    Transform { metric: Metric, message: String },
}

impl FetchError {
    pub fn metric(&self) -> Metric {
        match self {
            FetchError::Query { metric, .. } | FetchError::Transform { metric, .. } => *metric,
        }
    }
}
