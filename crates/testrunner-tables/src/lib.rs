//! Static tables driving the test runner.
//!
//! Supported architectures, the mode table (flags, timeout scaling, status
//! grouping, output folder per build mode), default architecture/mode lists
//! and named groups of test suites. The tables are plain values handed to the
//! resolver, so callers and tests can swap in their own.

mod error;
mod host;
mod mode;
mod tables;

pub use error::TablesError;
pub use host::{guess_host_arch, host_arch_for};
pub use mode::{canonical_mode, Flavor, ModeDescriptor};
pub use tables::{RunnerTables, DEFAULT_SUITE_GROUP};

/// Output directory used when none is given
pub const DEFAULT_OUTDIR: &str = "out";

/// Directory scanned for the most recent build
pub const DEFAULT_OUT_GN: &str = "out.gn";

/// Architecture requests meaning "whatever this host is"
pub const AUTO_ARCHS: &[&str] = &["auto", "native"];
