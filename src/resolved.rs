//! Resolved run configuration with provenance
//!
//! The resolved config is what the resolver hands to the code that runs the
//! tests: the (architecture, mode) pairs, where their binaries live, the
//! capabilities the run must assume, and a record of everything that was
//! inferred rather than given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use testrunner_descriptor::{Capability, LoadedDescriptor};
use testrunner_tables::{canonical_mode, Flavor, ModeDescriptor};

use crate::suites::TestSelection;

/// Schema version for resolved_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "testrunner/resolved_config@1";

/// Where an auto-detected configuration came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSource {
    /// Descriptor file path
    pub path: PathBuf,

    /// SHA-256 digest of the raw descriptor bytes
    pub digest: String,
}

impl From<&LoadedDescriptor> for DescriptorSource {
    fn from(loaded: &LoadedDescriptor) -> Self {
        Self {
            path: loaded.path.clone(),
            digest: loaded.digest.clone(),
        }
    }
}

/// Something the resolver inferred or corrected on the user's behalf.
///
/// Purely informational; never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// `--gn` picked this build directory
    LatestBuild { dir: PathBuf },

    /// `--gn` found nothing to pick; the plain outdir is used instead
    NoBuildFound { scanned: PathBuf, fallback: PathBuf },

    /// A value was taken from the build descriptor
    AutoDetected { field: String, value: String },

    /// The descriptor fixes the single arch/mode, so the pairing is dropped
    ArchAndModeIgnored { value: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestBuild { dir } => write!(f, "Latest GN build found: {}", dir.display()),
            Self::NoBuildFound { scanned, fallback } => write!(
                f,
                "No build found in {}, using {}",
                scanned.display(),
                fallback.display()
            ),
            Self::AutoDetected { field, value } => write!(f, "Auto-detected {}={}", field, value),
            Self::ArchAndModeIgnored { value } => {
                write!(f, "Ignoring arch-and-mode {} in favor of the detected build", value)
            }
        }
    }
}

/// One (architecture, mode) combination to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPair {
    pub arch: String,

    /// Canonical mode name
    pub mode: String,

    /// Directory holding the test binaries for this pair
    pub build_dir: PathBuf,

    /// Extra flags for every test binary
    pub flags: Vec<String>,

    pub timeout_scalefactor: u32,
    pub status_mode: Flavor,
    pub execution_mode: Flavor,
}

impl ResolvedPair {
    pub(crate) fn new(arch: &str, mode: &str, descriptor: &ModeDescriptor, build_dir: PathBuf) -> Self {
        Self {
            arch: arch.to_string(),
            mode: canonical_mode(mode),
            build_dir,
            flags: descriptor.flags.clone(),
            timeout_scalefactor: descriptor.timeout_scalefactor,
            status_mode: descriptor.status_mode,
            execution_mode: descriptor.execution_mode,
        }
    }

    /// `arch.mode`, the form `--arch-and-mode` accepts
    pub fn label(&self) -> String {
        format!("{}.{}", self.arch, self.mode)
    }
}

/// The validated outcome of configuration resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// Output directory; the descriptor's directory when auto-detected
    pub outdir: PathBuf,

    /// Whether a build descriptor decided the configuration
    pub auto_detected: bool,

    /// Architectures, in request order
    pub archs: Vec<String>,

    /// Canonical modes, in request order
    pub modes: Vec<String>,

    /// Combinations to run
    pub pairs: Vec<ResolvedPair>,

    /// Capabilities the run must assume
    pub capabilities: BTreeMap<Capability, bool>,

    /// Descriptor provenance (None unless auto-detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<DescriptorSource>,

    /// Selected test suites (set later)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestSelection>,

    /// Values inferred along the way
    pub notices: Vec<Notice>,
}

impl ResolvedConfig {
    /// Resolved value of a capability (false when never mentioned)
    pub fn capability(&self, capability: Capability) -> bool {
        self.capabilities.get(&capability).copied().unwrap_or(false)
    }

    /// `(arch, mode)` tuples, in run order
    pub fn arch_mode_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .map(|p| (p.arch.as_str(), p.mode.as_str()))
            .collect()
    }

    /// Set the test selection
    pub fn with_tests(mut self, tests: TestSelection) -> Self {
        self.tests = Some(tests);
        self
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Human-readable summary
    pub fn to_human_readable(&self) -> String {
        let mut lines = Vec::new();

        let origin = if self.auto_detected { " (auto-detected)" } else { "" };
        lines.push(format!("Output directory: {}{}", self.outdir.display(), origin));
        if let Some(ref source) = self.descriptor {
            lines.push(format!("  Descriptor: {}", source.path.display()));
            lines.push(format!("  Digest: {}", source.digest));
        }
        lines.push(format!("Architectures: {}", self.archs.join(", ")));
        lines.push(format!("Modes: {}", self.modes.join(", ")));

        lines.push(String::new());
        lines.push(format!("Configurations ({} total):", self.pairs.len()));
        for pair in &self.pairs {
            lines.push(format!("  {}", pair.label()));
            lines.push(format!("    Build dir: {}", pair.build_dir.display()));
            lines.push(format!(
                "    Timeout scale: x{}, status: {}, execution: {}",
                pair.timeout_scalefactor, pair.status_mode, pair.execution_mode
            ));
            if !pair.flags.is_empty() {
                lines.push(format!("    Flags: {}", pair.flags.join(" ")));
            }
        }

        let enabled: Vec<&str> = self
            .capabilities
            .iter()
            .filter(|(_, on)| **on)
            .map(|(cap, _)| cap.as_str())
            .collect();
        lines.push(String::new());
        if enabled.is_empty() {
            lines.push("Capabilities: none".to_string());
        } else {
            lines.push(format!("Capabilities: {}", enabled.join(", ")));
        }

        if let Some(ref tests) = self.tests {
            lines.push(format!("Suites: {}", tests.suites.join(", ")));
            if !tests.filters.is_empty() {
                lines.push(format!("Filters: {}", tests.filters.join(", ")));
            }
        }

        lines.join("\n")
    }
}
