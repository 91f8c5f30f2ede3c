//! Error types for API access and configuration loading.

use thiserror::Error;

/// Failures while talking to the dashboard API.
///
/// Any of these aborts the current refresh cycle; none is fatal to the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network-level failure (request never produced a response)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("Request failed: {status} ({url})")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }
}

/// Static dashboard configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Config JSON could not be parsed
    #[error("Invalid dashboard config: {0}")]
    Parse(String),

    /// A chart entry has an empty id
    #[error("Chart #{index} has an empty id")]
    EmptyChartId { index: usize },

    /// Two charts share the same id
    #[error("Duplicate chart id '{0}'")]
    DuplicateChart(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
