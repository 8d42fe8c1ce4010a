//! Configuration errors.

use std::path::PathBuf;

use testrunner_descriptor::{Capability, DescriptorError};
use testrunner_tables::TablesError;

/// Any inconsistency found while resolving the run configuration.
///
/// Resolution stops at the first one; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("Failed to scan {} for builds: {reason}", .path.display())]
    BuildScan { path: PathBuf, reason: String },

    #[error("Attempted to set {field} to {requested}, while build is {actual}.")]
    Conflict {
        field: String,
        requested: String,
        actual: String,
    },

    #[error("Attempted to turn on {0}, but it's not available.")]
    Unavailable(Capability),

    #[error("Unknown mode {0}")]
    UnknownMode(String),

    #[error("Unknown architecture {0}")]
    UnknownArch(String),

    #[error("Malformed arch-and-mode entry '{0}', expected 'arch.mode'")]
    MalformedArchAndMode(String),

    #[error(transparent)]
    Tables(#[from] TablesError),
}

impl ConfigurationError {
    /// Name of the option the error is about, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Conflict { field, .. } => Some(field.as_str()),
            Self::Unavailable(cap) => Some(cap.as_str()),
            Self::UnknownMode(_) => Some("mode"),
            Self::UnknownArch(_) => Some("arch"),
            Self::MalformedArchAndMode(_) => Some("arch_and_mode"),
            Self::Descriptor(_) | Self::BuildScan { .. } | Self::Tables(_) => None,
        }
    }
}
