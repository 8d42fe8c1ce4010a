//! Build modes and their canonical names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Debug-like or release-like behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Debug,
    Release,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => f.write_str("debug"),
            Self::Release => f.write_str("release"),
        }
    }
}

/// What a build mode means to the runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDescriptor {
    /// Extra flags passed to every test binary
    pub flags: Vec<String>,

    /// Multiplier applied to the base test timeout
    pub timeout_scalefactor: u32,

    /// Which expectation section of the status files applies.
    ///
    /// Release builds with dchecks enabled behave like debug builds here.
    pub status_mode: Flavor,

    /// How the binaries themselves behave
    pub execution_mode: Flavor,

    /// Folder name of the build products, appended to the architecture
    pub output_folder: String,
}

/// Canonicalize a mode name.
///
/// Buildbot and ninja-on-Windows configurations are upper case and may carry
/// an `_x64` suffix; runner modes never do.
pub fn canonical_mode(name: &str) -> String {
    name.strip_suffix("_x64").unwrap_or(name).to_lowercase()
}
