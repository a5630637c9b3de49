//! CLI error types.

use mdpub_config::ConfigError;
use mdpub_confluence::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Validation(String),
}
