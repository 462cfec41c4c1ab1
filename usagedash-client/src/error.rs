use thiserror::Error;

/// Failures surfaced by the API client.
///
/// Non-2xx responses only carry the status code; error bodies are never
/// parsed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Http(String),
    #[error("API Error: {}", status.as_u16())]
    Status { status: reqwest::StatusCode },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}
