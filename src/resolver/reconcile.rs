//! Reconciliation of user options with a detected build.
//!
//! Every value the user set explicitly must agree with the build; values left
//! unset are taken from the build. Arch, mode and any capability the build
//! turns on are reported as auto-detected.

use std::collections::BTreeMap;

use testrunner_descriptor::{Capability, LoadedDescriptor};
use testrunner_tables::{canonical_mode, AUTO_ARCHS};

use super::Selection;
use crate::error::ConfigurationError;
use crate::options::{RunnerOptions, TriState};
use crate::resolved::Notice;

/// Derive the selection from a detected build.
pub(crate) fn reconcile(
    loaded: &LoadedDescriptor,
    options: &RunnerOptions,
    notices: &mut Vec<Notice>,
) -> Result<Selection, ConfigurationError> {
    let build = &loaded.descriptor;

    let arch = build.target_arch().to_string();
    let requested_arch = options
        .arch
        .as_deref()
        .filter(|a| !AUTO_ARCHS.contains(a));
    check_value("arch", requested_arch, &arch, notices)?;

    // Mode spelling is not used for paths here, so compare in runner form.
    let mode = build.mode().to_string();
    let requested_mode = options.mode.as_deref().map(canonical_mode);
    check_value("mode", requested_mode.as_deref(), &mode, notices)?;

    let mut capabilities = BTreeMap::new();
    for capability in Capability::ALL {
        let actual = capability.value_in(build);
        check_capability(capability, options.capability(capability), actual, notices)?;
        capabilities.insert(capability, actual);
    }

    if let Some(ref pairing) = options.arch_and_mode {
        notices.push(Notice::ArchAndModeIgnored {
            value: pairing.clone(),
        });
    }

    Ok(Selection {
        archs: vec![arch],
        modes: vec![mode],
        paired: false,
        outdir: loaded.build_dir().to_path_buf(),
        capabilities,
    })
}

fn check_value(
    field: &str,
    requested: Option<&str>,
    actual: &str,
    notices: &mut Vec<Notice>,
) -> Result<(), ConfigurationError> {
    match requested {
        Some(value) if value != actual => Err(ConfigurationError::Conflict {
            field: field.to_string(),
            requested: value.to_string(),
            actual: actual.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            notices.push(Notice::AutoDetected {
                field: field.to_string(),
                value: actual.to_string(),
            });
            Ok(())
        }
    }
}

fn check_capability(
    capability: Capability,
    requested: TriState,
    actual: bool,
    notices: &mut Vec<Notice>,
) -> Result<(), ConfigurationError> {
    match requested.explicit() {
        Some(true) if !actual => Err(ConfigurationError::Unavailable(capability)),
        Some(value) if value != actual => Err(ConfigurationError::Conflict {
            field: capability.as_str().to_string(),
            requested: value.to_string(),
            actual: actual.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            if actual {
                notices.push(Notice::AutoDetected {
                    field: capability.as_str().to_string(),
                    value: actual.to_string(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use testrunner_descriptor::BuildDescriptor;

    fn loaded(cpu: &str, is_debug: bool) -> LoadedDescriptor {
        LoadedDescriptor {
            descriptor: BuildDescriptor {
                v8_target_cpu: cpu.to_string(),
                is_debug,
                is_asan: false,
                is_msan: false,
                is_tsan: true,
                is_ubsan_vptr: false,
                v8_enable_i18n_support: true,
                v8_use_snapshot: false,
                dcheck_always_on: false,
                is_gcov_coverage: false,
            },
            path: PathBuf::from("/src/out/x64.release/v8_build_config.json"),
            digest: "00".repeat(32),
        }
    }

    #[test]
    fn test_unset_options_are_auto_detected() {
        let mut notices = Vec::new();
        let selection = reconcile(&loaded("x86", false), &RunnerOptions::default(), &mut notices).unwrap();

        assert_eq!(selection.archs, vec!["ia32"]);
        assert_eq!(selection.modes, vec!["release"]);
        assert_eq!(selection.outdir, PathBuf::from("/src/out/x64.release"));
        assert!(selection.capabilities[&Capability::Tsan]);
        assert!(selection.capabilities[&Capability::NoSnap]);
        assert!(!selection.capabilities[&Capability::NoI18n]);
        // arch, mode and the two capabilities the build has
        assert_eq!(notices.len(), 4);
        assert!(notices.contains(&Notice::AutoDetected {
            field: "tsan".to_string(),
            value: "true".to_string()
        }));
        assert!(notices.contains(&Notice::AutoDetected {
            field: "no_snap".to_string(),
            value: "true".to_string()
        }));
    }

    #[test]
    fn test_capabilities_off_in_build_are_quiet() {
        let mut notices = Vec::new();
        let selection = reconcile(&loaded("x64", false), &RunnerOptions::default(), &mut notices).unwrap();

        assert!(!selection.capabilities[&Capability::Asan]);
        for notice in &notices {
            if let Notice::AutoDetected { field, value } = notice {
                assert_ne!(field, "asan");
                assert_ne!(field, "no_i18n");
                assert_ne!(value, "false", "{field}");
            }
        }
    }

    #[test]
    fn test_matching_explicit_values_are_quiet() {
        let mut options = RunnerOptions::default();
        options.arch = Some("x64".to_string());
        options.mode = Some("Debug_x64".to_string());
        options.set_capability(Capability::Tsan, true);

        let mut notices = Vec::new();
        reconcile(&loaded("x64", true), &options, &mut notices).unwrap();

        let fields: Vec<&str> = notices
            .iter()
            .filter_map(|n| match n {
                Notice::AutoDetected { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert!(!fields.contains(&"arch"));
        assert!(!fields.contains(&"mode"));
        assert!(!fields.contains(&"tsan"));
        assert!(!fields.contains(&"asan"));
        assert!(fields.contains(&"no_snap"));
    }

    #[test]
    fn test_arch_conflict() {
        let mut options = RunnerOptions::default();
        options.arch = Some("arm".to_string());

        let err = reconcile(&loaded("x64", false), &options, &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::Conflict { ref field, ref requested, ref actual }
                if field == "arch" && requested == "arm" && actual == "x64"
        ));
    }

    #[test]
    fn test_auto_arch_is_not_a_conflict() {
        let mut options = RunnerOptions::default();
        options.arch = Some("native".to_string());

        let selection = reconcile(&loaded("arm64", false), &options, &mut Vec::new()).unwrap();
        assert_eq!(selection.archs, vec!["arm64"]);
    }

    #[test]
    fn test_mode_conflict_after_canonicalization() {
        let mut options = RunnerOptions::default();
        options.mode = Some("Release".to_string());

        let err = reconcile(&loaded("x64", true), &options, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Attempted to set mode to release, while build is debug."));
    }

    #[test]
    fn test_unavailable_capability() {
        let mut options = RunnerOptions::default();
        options.set_capability(Capability::Asan, true);

        let err = reconcile(&loaded("x64", false), &options, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::Unavailable(Capability::Asan)));
    }

    #[test]
    fn test_explicit_false_contradicting_build() {
        let mut options = RunnerOptions::default();
        options.set_capability(Capability::NoSnap, false);

        let err = reconcile(&loaded("x64", false), &options, &mut Vec::new()).unwrap_err();
        assert_eq!(err.field(), Some("no_snap"));
    }

    #[test]
    fn test_arch_and_mode_dropped() {
        let mut options = RunnerOptions::default();
        options.arch_and_mode = Some("arm.debug,x64.release".to_string());

        let mut notices = Vec::new();
        let selection = reconcile(&loaded("x64", false), &options, &mut notices).unwrap();

        assert!(!selection.paired);
        assert!(notices.contains(&Notice::ArchAndModeIgnored {
            value: "arm.debug,x64.release".to_string()
        }));
    }
}
