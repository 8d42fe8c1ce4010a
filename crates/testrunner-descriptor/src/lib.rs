//! Build descriptor for compiled test-runner builds.
//!
//! A finished build leaves a `v8_build_config.json` next to its products. The
//! descriptor records the target CPU, whether the build is a debug build and
//! which capabilities (sanitizers, dchecks, coverage, i18n, snapshot) were
//! compiled in. The test runner reads it to auto-detect its configuration.

mod capability;
mod descriptor;
mod error;

pub use capability::Capability;
pub use descriptor::{BuildDescriptor, LoadedDescriptor};
pub use error::DescriptorError;

/// File name of the descriptor inside a build output directory.
pub const BUILD_CONFIG_FILE: &str = "v8_build_config.json";
