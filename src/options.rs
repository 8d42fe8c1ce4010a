//! Options the resolver works from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use testrunner_descriptor::Capability;
use testrunner_tables::DEFAULT_OUTDIR;

/// An option that may be left unset, or explicitly set either way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// The explicit value, if any
    pub fn explicit(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }

    pub fn is_unset(self) -> bool {
        self == Self::Unset
    }

    /// The explicit value, or `default` when unset
    pub fn unwrap_or(self, default: bool) -> bool {
        self.explicit().unwrap_or(default)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::True,
            Some(false) => Self::False,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Self::from(Some(value))
    }
}

/// User-supplied options, as parsed from the command line.
///
/// `arch` and `mode` are comma-separated lists; `arch_and_mode` is a
/// comma-separated list of `arch.mode` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Checkout root; build directories are looked up relative to it
    pub root: PathBuf,

    /// Base directory with compile output
    pub outdir: String,

    /// Use the most recently modified build under `out.gn`
    pub gn: bool,

    /// Buildbot path layout: descriptor lives in `<outdir>/<mode>/`
    pub buildbot: bool,

    pub arch: Option<String>,
    pub arch_and_mode: Option<String>,
    pub mode: Option<String>,

    /// Capability assertions; absent entries are unset
    pub capabilities: BTreeMap<Capability, TriState>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            outdir: DEFAULT_OUTDIR.to_string(),
            gn: false,
            buildbot: false,
            arch: None,
            arch_and_mode: None,
            mode: None,
            capabilities: BTreeMap::new(),
        }
    }
}

impl RunnerOptions {
    /// Options rooted at `root`, everything else default
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// What the user asserted about `capability`
    pub fn capability(&self, capability: Capability) -> TriState {
        self.capabilities
            .get(&capability)
            .copied()
            .unwrap_or_default()
    }

    /// Record an assertion about `capability`
    pub fn set_capability(&mut self, capability: Capability, value: impl Into<TriState>) {
        let value = value.into();
        if value.is_unset() {
            self.capabilities.remove(&capability);
        } else {
            self.capabilities.insert(capability, value);
        }
    }
}
