//! Test runner configuration front end
//!
//! Decides which architectures and build modes a test run covers, either from
//! explicit options or by auto-detecting the configuration of an existing
//! build from its `v8_build_config.json` descriptor, and hands the resolved
//! (architecture, mode) pairs to whatever actually runs the tests.

pub mod error;
pub mod options;
pub mod resolved;
pub mod resolver;
pub mod suites;

pub use error::ConfigurationError;
pub use options::{RunnerOptions, TriState};
pub use resolved::{DescriptorSource, Notice, ResolvedConfig, ResolvedPair};
pub use resolver::ConfigResolver;
pub use suites::TestSelection;

pub use testrunner_descriptor::{BuildDescriptor, Capability, BUILD_CONFIG_FILE};
pub use testrunner_tables::{canonical_mode, Flavor, ModeDescriptor, RunnerTables};
