use std::io;

use thiserror::Error;

/// Result type used across the usagedash core crate.
pub type Result<T> = std::result::Result<T, UsageDashError>;

/// Canonical error representation shared by the client crates.
#[derive(Debug, Error)]
pub enum UsageDashError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<serde_json::Error> for UsageDashError {
    fn from(err: serde_json::Error) -> Self {
        UsageDashError::DeserializationError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<ConfigError> for UsageDashError {
    fn from(value: ConfigError) -> Self {
        UsageDashError::ConfigError(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_into_core_errors() {
        let err: UsageDashError = ConfigError::InvalidValue {
            key: "USAGEDASH_PAGE_SIZE".into(),
            value: "many".into(),
            reason: "invalid digit found in string".into(),
        }
        .into();
        let message = err.to_string();
        assert!(message.starts_with("configuration error"));
        assert!(message.contains("USAGEDASH_PAGE_SIZE"));
    }
}
