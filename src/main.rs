//! Test runner CLI
//!
//! Entry point for the `run-tests` command-line tool. Resolves which
//! architectures and modes to test and prints the result.

use clap::{Args, CommandFactory, Parser};
use std::path::PathBuf;
use std::process;

use testrunner::{
    Capability, ConfigResolver, ConfigurationError, ResolvedConfig, RunnerOptions, RunnerTables,
    TestSelection,
};
use testrunner_tables::{guess_host_arch, DEFAULT_OUTDIR};

#[derive(Parser)]
#[command(name = "run-tests")]
#[command(about = "Resolve the build configurations to run tests under", version)]
struct Cli {
    /// Checkout root that build directories are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Base directory with compile output
    #[arg(long, default_value = DEFAULT_OUTDIR)]
    outdir: String,

    /// Scan out.gn for the last built configuration
    #[arg(long)]
    gn: bool,

    /// Adapt to path structure used on buildbots
    #[arg(long)]
    buildbot: bool,

    /// The architectures to run tests for (comma-separated), 'auto' or 'native' for auto-detect
    #[arg(long)]
    arch: Option<String>,

    /// Architecture and mode pairs in the format 'arch.mode' (comma-separated)
    #[arg(long)]
    arch_and_mode: Option<String>,

    /// The test modes in which to run (comma-separated, uppercase for ninja and buildbot builds)
    #[arg(long, short = 'm')]
    mode: Option<String>,

    #[command(flatten)]
    capabilities: CapabilityArgs,

    /// Alternate tables file (TOML) replacing the built-in archs, modes and suites
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Write the resolved configuration to this file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Test suites, suite groups or test paths
    tests: Vec<String>,
}

/// Assertions about the build. A bare flag means true; `--flag=false` is an
/// explicit false; leaving it out lets the build decide.
#[derive(Args)]
struct CapabilityArgs {
    /// Build uses the address sanitizer
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    asan: Option<bool>,

    /// Build uses the memory sanitizer
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    msan: Option<bool>,

    /// Build uses the thread sanitizer
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    tsan: Option<bool>,

    /// Build uses the undefined behavior sanitizer (vptr)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    ubsan_vptr: Option<bool>,

    /// Build has dchecks enabled in release
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    dcheck_always_on: Option<bool>,

    /// Build is instrumented for gcov coverage
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    gcov_coverage: Option<bool>,

    /// Build has no internationalization support
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    no_i18n: Option<bool>,

    /// Build does not use a snapshot
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    no_snap: Option<bool>,
}

impl CapabilityArgs {
    fn entries(&self) -> [(Capability, Option<bool>); 8] {
        [
            (Capability::Asan, self.asan),
            (Capability::DcheckAlwaysOn, self.dcheck_always_on),
            (Capability::GcovCoverage, self.gcov_coverage),
            (Capability::Msan, self.msan),
            (Capability::NoI18n, self.no_i18n),
            (Capability::NoSnap, self.no_snap),
            (Capability::Tsan, self.tsan),
            (Capability::UbsanVptr, self.ubsan_vptr),
        ]
    }
}

impl Cli {
    fn to_options(&self) -> RunnerOptions {
        let mut options = RunnerOptions {
            root: self.root.clone(),
            outdir: self.outdir.clone(),
            gn: self.gn,
            buildbot: self.buildbot,
            arch: self.arch.clone(),
            arch_and_mode: self.arch_and_mode.clone(),
            mode: self.mode.clone(),
            ..RunnerOptions::default()
        };
        for (capability, value) in self.capabilities.entries() {
            options.set_capability(capability, value);
        }
        options
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            Cli::command().print_help().ok();
            process::exit(1);
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = config.write_to_file(path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    if cli.json {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        for notice in &config.notices {
            println!(">>> {}", notice);
        }
        println!("{}", config.to_human_readable());
    }
}

fn resolve(cli: &Cli) -> Result<ResolvedConfig, ConfigurationError> {
    let tables = match cli.tables {
        Some(ref path) => RunnerTables::from_toml_file(path)?,
        None => RunnerTables::default(),
    };

    let resolver = ConfigResolver::new(tables, guess_host_arch());
    let config = resolver.resolve(&cli.to_options())?;
    let tests = TestSelection::from_args(&cli.tests, resolver.tables());

    Ok(config.with_tests(tests))
}
