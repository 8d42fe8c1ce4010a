//! Table loading errors.

use std::path::PathBuf;

/// Errors loading or validating runner tables
#[derive(Debug, thiserror::Error)]
pub enum TablesError {
    #[error("Failed to read tables file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid tables: {0}")]
    Invalid(String),
}
