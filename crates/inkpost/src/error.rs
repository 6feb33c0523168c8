//! CLI error types.

use inkpost_config::ConfigError;
use inkpost_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}

impl CliError {
    /// Follow-up hint for failures that may go away on their own.
    pub(crate) fn retry_hint(&self) -> Option<&'static str> {
        match self {
            Self::Store(err) if err.is_retryable() => {
                Some("The store reported a temporary failure; retrying may succeed.")
            }
            _ => None,
        }
    }
}
