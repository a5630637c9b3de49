//! Error types for document loading.

use std::path::PathBuf;

/// Front matter block that could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Malformed YAML, or a recognised key with the wrong type.
    #[error("Invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Valid YAML that is not a key/value mapping.
    #[error("Front matter must be a mapping, found {0}")]
    NotMapping(&'static str),
}

/// Errors from loading a source document.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// File could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File was read but its front matter is broken.
    #[error("{}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}
