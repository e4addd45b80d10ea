//! Error types for folio_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur loading or writing the site
#[derive(Error, Debug)]
pub enum FolioError {
    /// Failed to read or write a file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for a site
    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize the config
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The config parsed but describes an impossible site
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, FolioError>;
