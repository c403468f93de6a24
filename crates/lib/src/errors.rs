use thiserror::Error;

/// Custom error types for the search aggregator.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to upstream '{source_name}' failed: {error}")]
    Request {
        source_name: &'static str,
        error: reqwest::Error,
    },
    #[error("Upstream '{source_name}' returned status {status}: {message}")]
    UpstreamStatus {
        source_name: &'static str,
        status: u16,
        message: String,
    },
    #[error("Failed to deserialize response from upstream '{source_name}': {error}")]
    Deserialization {
        source_name: &'static str,
        error: serde_json::Error,
    },
    #[error("Circuit breaker is open for upstream '{0}'")]
    CircuitOpen(&'static str),
    #[error("Upstream search unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    Validation(String),
    #[error("The {0} source is not configured")]
    MissingSource(&'static str),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl SearchError {
    /// Whether this error originated from (or on behalf of) an upstream service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SearchError::Request { .. }
                | SearchError::UpstreamStatus { .. }
                | SearchError::Deserialization { .. }
                | SearchError::CircuitOpen(_)
                | SearchError::UpstreamUnavailable(_)
        )
    }
}
