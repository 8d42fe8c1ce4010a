//! Descriptor loading errors.

use std::path::PathBuf;

/// Errors raised while reading a build descriptor.
///
/// A missing descriptor is not an error; see [`crate::BuildDescriptor::load`].
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exists but contains invalid json ({reason}). Is your build up-to-date?", .path.display())]
    InvalidJson { path: PathBuf, reason: String },
}
