//! Runner tables and their built-in values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TablesError;
use crate::mode::{canonical_mode, Flavor, ModeDescriptor};

const DEBUG_FLAGS: &[&str] = &["--nohard-abort", "--enable-slow-asserts", "--verify-heap"];
const RELEASE_FLAGS: &[&str] = &["--nohard-abort"];

const SUPPORTED_ARCHS: &[&str] = &[
    "android_arm",
    "android_arm64",
    "android_ia32",
    "android_x64",
    "arm",
    "ia32",
    "mips",
    "mipsel",
    "mips64",
    "mips64el",
    "s390",
    "s390x",
    "ppc",
    "ppc64",
    "x64",
    "x32",
    "arm64",
];

const DEFAULT_ARCHS: &[&str] = &["ia32", "x64", "arm"];
const DEFAULT_MODES: &[&str] = &["release", "debug"];

/// Suite groups, ordered slowest suites first. The bots run each group as a
/// separate step.
const SUITE_GROUPS: &[(&str, &[&str])] = &[
    (
        "bot_default",
        &[
            "debugger",
            "mjsunit",
            "cctest",
            "wasm-spec-tests",
            "inspector",
            "webkit",
            "mkgrokdump",
            "fuzzer",
            "message",
            "preparser",
            "intl",
            "unittests",
        ],
    ),
    (
        "default",
        &[
            "debugger",
            "mjsunit",
            "cctest",
            "wasm-spec-tests",
            "inspector",
            "mkgrokdump",
            "fuzzer",
            "message",
            "preparser",
            "intl",
            "unittests",
        ],
    ),
    (
        "optimize_for_size",
        &["debugger", "mjsunit", "cctest", "inspector", "webkit", "intl"],
    ),
    ("unittests", &["unittests"]),
];

/// Name of the suite group run when no tests are named
pub const DEFAULT_SUITE_GROUP: &str = "default";

/// Immutable tables handed to the resolver.
///
/// Any section omitted from a TOML tables file keeps its built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTables {
    /// Architectures the runner knows how to run
    pub supported_archs: Vec<String>,

    /// Architectures used when `--arch` is not given
    pub default_archs: Vec<String>,

    /// Modes used when `--mode` is not given
    pub default_modes: Vec<String>,

    /// Mode table keyed by canonical (lowercase) mode name
    pub modes: BTreeMap<String, ModeDescriptor>,

    /// Named groups of test suites
    pub test_suites: BTreeMap<String, Vec<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn mode_entry(
    flags: Vec<String>,
    timeout_scalefactor: u32,
    status_mode: Flavor,
    execution_mode: Flavor,
    output_folder: &str,
) -> ModeDescriptor {
    ModeDescriptor {
        flags,
        timeout_scalefactor,
        status_mode,
        execution_mode,
        output_folder: output_folder.to_string(),
    }
}

impl Default for RunnerTables {
    fn default() -> Self {
        let debug_flags = strings(DEBUG_FLAGS);
        let release_flags = strings(RELEASE_FLAGS);
        let mut slow_release_flags = release_flags.clone();
        slow_release_flags.push("--enable-slow-asserts".to_string());

        let mut modes = BTreeMap::new();
        modes.insert(
            "debug".to_string(),
            mode_entry(debug_flags.clone(), 4, Flavor::Debug, Flavor::Debug, "debug"),
        );
        modes.insert(
            "optdebug".to_string(),
            mode_entry(debug_flags, 4, Flavor::Debug, Flavor::Debug, "optdebug"),
        );
        modes.insert(
            "release".to_string(),
            mode_entry(release_flags.clone(), 1, Flavor::Release, Flavor::Release, "release"),
        );
        // Trybot release builds have dchecks on, so status files must assume
        // debug-like behaviour.
        modes.insert(
            "tryrelease".to_string(),
            mode_entry(release_flags, 1, Flavor::Debug, Flavor::Release, "release"),
        );
        // Requires a build with dchecks and slow dchecks.
        modes.insert(
            "slowrelease".to_string(),
            mode_entry(slow_release_flags, 2, Flavor::Debug, Flavor::Release, "release"),
        );

        let test_suites = SUITE_GROUPS
            .iter()
            .map(|(name, suites)| (name.to_string(), strings(suites)))
            .collect();

        Self {
            supported_archs: strings(SUPPORTED_ARCHS),
            default_archs: strings(DEFAULT_ARCHS),
            default_modes: strings(DEFAULT_MODES),
            modes,
            test_suites,
        }
    }
}

impl RunnerTables {
    /// Load tables from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, TablesError> {
        let content = std::fs::read_to_string(path).map_err(|source| TablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate tables from a TOML string
    pub fn parse(content: &str) -> Result<Self, TablesError> {
        let tables: RunnerTables = toml::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check the tables are internally consistent
    pub fn validate(&self) -> Result<(), TablesError> {
        if self.supported_archs.is_empty() {
            return Err(TablesError::Invalid("supported_archs is empty".to_string()));
        }

        for name in self.modes.keys() {
            if name.as_str() != canonical_mode(name) {
                return Err(TablesError::Invalid(format!(
                    "mode '{}' is not in canonical form",
                    name
                )));
            }
        }

        for arch in &self.default_archs {
            if !self.is_supported_arch(arch) {
                return Err(TablesError::Invalid(format!(
                    "default arch '{}' is not a supported arch",
                    arch
                )));
            }
        }

        for mode in &self.default_modes {
            if self.mode(mode).is_none() {
                return Err(TablesError::Invalid(format!(
                    "default mode '{}' is not in the mode table",
                    mode
                )));
            }
        }

        Ok(())
    }

    /// Look up a mode by any spelling that canonicalizes to a known mode
    pub fn mode(&self, name: &str) -> Option<&ModeDescriptor> {
        self.modes.get(&canonical_mode(name))
    }

    /// Whether `arch` is in the supported set
    pub fn is_supported_arch(&self, arch: &str) -> bool {
        self.supported_archs.iter().any(|a| a == arch)
    }

    /// Suites belonging to a named group
    pub fn suite_group(&self, name: &str) -> Option<&[String]> {
        self.test_suites.get(name).map(|v| v.as_slice())
    }
}
