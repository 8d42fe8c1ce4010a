//! Resolution without a build descriptor: options and defaults only.

mod fixtures;

use std::path::PathBuf;

use fixtures::Checkout;
use testrunner::{Capability, ConfigResolver, ConfigurationError, RunnerOptions, RunnerTables};

fn resolver() -> ConfigResolver {
    ConfigResolver::new(RunnerTables::default(), Some("x64"))
}

fn options(checkout: &Checkout) -> RunnerOptions {
    RunnerOptions::with_root(checkout.root())
}

#[test]
fn test_defaults_without_descriptor() {
    let checkout = Checkout::new();
    let config = resolver().resolve(&options(&checkout)).unwrap();

    assert!(!config.auto_detected);
    assert_eq!(config.outdir, PathBuf::from("out"));
    assert_eq!(config.archs, vec!["ia32", "x64", "arm"]);
    assert_eq!(config.modes, vec!["release", "debug"]);
    assert_eq!(
        config.arch_mode_pairs(),
        vec![
            ("ia32", "release"),
            ("ia32", "debug"),
            ("x64", "release"),
            ("x64", "debug"),
            ("arm", "release"),
            ("arm", "debug"),
        ]
    );
    assert!(config.descriptor.is_none());
    assert!(config.notices.is_empty());
}

#[test]
fn test_every_supported_arch_resolves_alone() {
    let checkout = Checkout::new();
    let resolver = resolver();

    for arch in &resolver.tables().supported_archs {
        let mut opts = options(&checkout);
        opts.arch = Some(arch.clone());

        let config = resolver.resolve(&opts).unwrap();
        assert_eq!(config.archs, vec![arch.clone()]);
    }
}

#[test]
fn test_unknown_arch_fails_for_any_mode() {
    let checkout = Checkout::new();
    let resolver = resolver();

    for mode in [None, Some("debug"), Some("release"), Some("bogus")] {
        let mut opts = options(&checkout);
        opts.arch = Some("vax".to_string());
        opts.mode = mode.map(str::to_string);

        let err = resolver.resolve(&opts).unwrap_err();
        match mode {
            // Modes are validated first
            Some("bogus") => assert!(matches!(err, ConfigurationError::UnknownMode(_))),
            _ => assert!(matches!(err, ConfigurationError::UnknownArch(ref a) if a == "vax")),
        }
    }
}

#[test]
fn test_unknown_mode() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.mode = Some("release,fastdebug".to_string());

    let err = resolver().resolve(&opts).unwrap_err();
    assert_eq!(err.to_string(), "Unknown mode fastdebug");
}

#[test]
fn test_buildbot_modes_are_canonicalized() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.arch = Some("x64".to_string());
    opts.mode = Some("Release_x64,Debug".to_string());

    let config = resolver().resolve(&opts).unwrap();
    assert_eq!(config.modes, vec!["release", "debug"]);
}

#[test]
fn test_arch_and_mode_pairs_not_product() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.arch_and_mode = Some("arm.debug,x64.release".to_string());
    // Separate lists are ignored when pairs are given
    opts.arch = Some("ia32".to_string());
    opts.mode = Some("optdebug".to_string());

    let config = resolver().resolve(&opts).unwrap();
    assert_eq!(config.arch_mode_pairs(), vec![("arm", "debug"), ("x64", "release")]);
    assert_eq!(config.archs, vec!["arm", "x64"]);
    assert_eq!(config.modes, vec!["debug", "release"]);
}

#[test]
fn test_arch_and_mode_validated() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.arch_and_mode = Some("arm.debug,vax.release".to_string());

    let err = resolver().resolve(&opts).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownArch(ref a) if a == "vax"));
}

#[test]
fn test_auto_arch_uses_host() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.arch = Some("auto".to_string());
    opts.mode = Some("release".to_string());

    let config = resolver().resolve(&opts).unwrap();
    assert_eq!(config.arch_mode_pairs(), vec![("x64", "release")]);
}

#[test]
fn test_build_dirs_follow_output_folder() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.arch = Some("x64".to_string());
    opts.mode = Some("tryrelease,optdebug".to_string());

    let config = resolver().resolve(&opts).unwrap();
    assert_eq!(
        config.pairs[0].build_dir,
        checkout.root().join("out").join("x64.release")
    );
    assert_eq!(
        config.pairs[1].build_dir,
        checkout.root().join("out").join("x64.optdebug")
    );
    assert_eq!(config.pairs[0].timeout_scalefactor, 1);
    assert_eq!(config.pairs[1].timeout_scalefactor, 4);
}

#[test]
fn test_buildbot_build_dir_uses_mode_spelling() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.buildbot = true;
    opts.arch = Some("x64".to_string());
    opts.mode = Some("Release_x64".to_string());

    let config = resolver().resolve(&opts).unwrap();
    assert!(!config.auto_detected);
    assert_eq!(config.modes, vec!["release"]);
    assert_eq!(
        config.pairs[0].build_dir,
        checkout.root().join("out").join("Release_x64")
    );
}

#[test]
fn test_capabilities_from_options() {
    let checkout = Checkout::new();
    let mut opts = options(&checkout);
    opts.set_capability(Capability::Asan, true);
    opts.set_capability(Capability::NoSnap, false);

    let config = resolver().resolve(&opts).unwrap();
    assert!(config.capability(Capability::Asan));
    assert!(!config.capability(Capability::NoSnap));
    assert!(!config.capability(Capability::Tsan));
    assert_eq!(config.capabilities.len(), Capability::ALL.len());
}

#[test]
fn test_custom_tables() {
    let tables = RunnerTables::parse(
        r#"
supported_archs = ["x64", "riscv64"]
default_archs = ["riscv64"]
default_modes = ["debug"]
"#,
    )
    .unwrap();
    let resolver = ConfigResolver::new(tables, None);

    let checkout = Checkout::new();
    let config = resolver.resolve(&options(&checkout)).unwrap();
    assert_eq!(config.arch_mode_pairs(), vec![("riscv64", "debug")]);

    let mut opts = options(&checkout);
    opts.arch = Some("arm".to_string());
    assert!(resolver.resolve(&opts).is_err());
}
