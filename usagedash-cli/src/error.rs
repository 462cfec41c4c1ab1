use std::io;

use usagedash_client::ApiError;
use usagedash_core::UsageDashError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Core(#[from] UsageDashError),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to load dashboard: {0}")]
    Overview(String),
    /// A search finished with an error message in the session state.
    #[error("search failed: {0}")]
    Search(String),
    #[error("{0}")]
    Validation(String),
}
