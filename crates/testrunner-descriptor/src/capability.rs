//! Capability flags a build may carry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BuildDescriptor;

/// A boolean build capability the runner must agree with.
///
/// `NoI18n` and `NoSnap` are the runner's inverted spellings of the
/// descriptor's `v8_enable_i18n_support` and `v8_use_snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Asan,
    DcheckAlwaysOn,
    GcovCoverage,
    Msan,
    NoI18n,
    NoSnap,
    Tsan,
    UbsanVptr,
}

impl Capability {
    /// All capabilities, in reconciliation order
    pub const ALL: [Capability; 8] = [
        Capability::Asan,
        Capability::DcheckAlwaysOn,
        Capability::GcovCoverage,
        Capability::Msan,
        Capability::NoI18n,
        Capability::NoSnap,
        Capability::Tsan,
        Capability::UbsanVptr,
    ];

    /// Option name as used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asan => "asan",
            Self::DcheckAlwaysOn => "dcheck_always_on",
            Self::GcovCoverage => "gcov_coverage",
            Self::Msan => "msan",
            Self::NoI18n => "no_i18n",
            Self::NoSnap => "no_snap",
            Self::Tsan => "tsan",
            Self::UbsanVptr => "ubsan_vptr",
        }
    }

    /// Value of this capability in runner terms for the given build
    pub fn value_in(&self, build: &BuildDescriptor) -> bool {
        match self {
            Self::Asan => build.is_asan,
            Self::DcheckAlwaysOn => build.dcheck_always_on,
            Self::GcovCoverage => build.is_gcov_coverage,
            Self::Msan => build.is_msan,
            Self::NoI18n => !build.v8_enable_i18n_support,
            Self::NoSnap => !build.v8_use_snapshot,
            Self::Tsan => build.is_tsan,
            Self::UbsanVptr => build.is_ubsan_vptr,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
