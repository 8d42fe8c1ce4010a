//! Build descriptor model and loader.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::DescriptorError;

/// Configuration of a completed build, as written by the build system.
///
/// Only the keys the runner reconciles against are modelled; the real file
/// carries many more, which are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildDescriptor {
    /// Target CPU in build-system naming (e.g. "x86", "x64", "arm64")
    pub v8_target_cpu: String,

    pub is_debug: bool,
    pub is_asan: bool,
    pub is_msan: bool,
    pub is_tsan: bool,
    pub is_ubsan_vptr: bool,
    pub v8_enable_i18n_support: bool,
    pub v8_use_snapshot: bool,
    pub dcheck_always_on: bool,
    pub is_gcov_coverage: bool,
}

/// A descriptor together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    pub descriptor: BuildDescriptor,

    /// Path the descriptor was read from
    pub path: PathBuf,

    /// SHA-256 of the raw file bytes, hex encoded
    pub digest: String,
}

impl LoadedDescriptor {
    /// Directory containing the descriptor, i.e. the build output directory
    pub fn build_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl BuildDescriptor {
    /// Parse a descriptor from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Load a descriptor from disk.
    ///
    /// Returns `Ok(None)` when no file exists at `path`. A file that exists
    /// but does not hold a valid descriptor is always an error.
    pub fn load(path: &Path) -> Result<Option<LoadedDescriptor>, DescriptorError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DescriptorError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let descriptor = Self::from_slice(&bytes).map_err(|e| DescriptorError::InvalidJson {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        Ok(Some(LoadedDescriptor {
            descriptor,
            path: path.to_path_buf(),
            digest,
        }))
    }

    /// Target architecture in test-runner naming.
    ///
    /// The build system calls 32-bit Intel "x86"; the runner calls it "ia32".
    pub fn target_arch(&self) -> &str {
        match self.v8_target_cpu.as_str() {
            "x86" => "ia32",
            other => other,
        }
    }

    /// Runner mode implied by the build: "debug" or "release"
    pub fn mode(&self) -> &'static str {
        if self.is_debug {
            "debug"
        } else {
            "release"
        }
    }
}
