//! Test selection from positional arguments.
//!
//! Arguments are either suite group names (expanded through the tables),
//! suite names, or test paths `suite/path/to/test`. With no arguments the
//! `default` group runs.

use serde::{Deserialize, Serialize};
use testrunner_tables::DEFAULT_SUITE_GROUP;

use crate::RunnerTables;

/// Suites to load and the test paths to filter them by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSelection {
    /// Suite names, in first-mentioned order, without duplicates
    pub suites: Vec<String>,

    /// Test path filters (arguments naming tests inside a suite)
    pub filters: Vec<String>,
}

impl TestSelection {
    /// Build the selection for the given positional arguments
    pub fn from_args(args: &[String], tables: &RunnerTables) -> Self {
        let mut selection = Self::default();

        if args.is_empty() {
            if let Some(group) = tables.suite_group(DEFAULT_SUITE_GROUP) {
                for suite in group {
                    selection.add_suite(suite);
                }
            }
            return selection;
        }

        for arg in args {
            if let Some(group) = tables.suite_group(arg) {
                for suite in group {
                    selection.add_suite(suite);
                }
                continue;
            }

            match arg.split_once('/') {
                Some((suite, rest)) if !rest.is_empty() => {
                    selection.add_suite(suite);
                    selection.filters.push(arg.clone());
                }
                _ => selection.add_suite(arg.trim_end_matches('/')),
            }
        }

        selection
    }

    fn add_suite(&mut self, suite: &str) {
        if !self.suites.iter().any(|s| s == suite) {
            self.suites.push(suite.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_default_group() {
        let tables = RunnerTables::default();
        let selection = TestSelection::from_args(&[], &tables);

        assert_eq!(selection.suites, tables.suite_group("default").unwrap());
        assert!(selection.filters.is_empty());
    }

    #[test]
    fn test_group_expansion_dedupes() {
        let tables = RunnerTables::default();
        let selection = TestSelection::from_args(&args(&["unittests", "optimize_for_size"]), &tables);

        assert_eq!(
            selection.suites,
            vec!["unittests", "debugger", "mjsunit", "cctest", "inspector", "webkit", "intl"]
        );
    }

    #[test]
    fn test_paths_become_filters() {
        let tables = RunnerTables::default();
        let selection = TestSelection::from_args(
            &args(&["mjsunit/regress/regress-123", "cctest", "mjsunit/array-sort"]),
            &tables,
        );

        assert_eq!(selection.suites, vec!["mjsunit", "cctest"]);
        assert_eq!(
            selection.filters,
            vec!["mjsunit/regress/regress-123", "mjsunit/array-sort"]
        );
    }

    #[test]
    fn test_trailing_slash_is_whole_suite() {
        let tables = RunnerTables::default();
        let selection = TestSelection::from_args(&args(&["message/"]), &tables);

        assert_eq!(selection.suites, vec!["message"]);
        assert!(selection.filters.is_empty());
    }
}
