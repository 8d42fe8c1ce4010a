//! Configuration resolution
//!
//! Turns [`RunnerOptions`] into a [`ResolvedConfig`]:
//! 1. Pick the output directory (`--gn` scans `out.gn` for the newest build)
//! 2. Look for a build descriptor there; a corrupt one is fatal
//! 3. With a descriptor, reconcile the options against it
//! 4. Without one, take architectures and modes from the options or defaults
//! 5. Validate every mode and architecture against the tables
//! 6. Expand to (arch, mode) pairs

mod outdir;
mod reconcile;

pub use outdir::latest_build_dir;

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use testrunner_descriptor::{BuildDescriptor, Capability, BUILD_CONFIG_FILE};
use testrunner_tables::{
    canonical_mode, guess_host_arch, ModeDescriptor, RunnerTables, AUTO_ARCHS, DEFAULT_OUT_GN,
};

use crate::error::ConfigurationError;
use crate::options::RunnerOptions;
use crate::resolved::{DescriptorSource, Notice, ResolvedConfig, ResolvedPair, SCHEMA_ID, SCHEMA_VERSION};

/// Architectures and modes before validation
#[derive(Debug)]
pub(crate) struct Selection {
    pub archs: Vec<String>,
    pub modes: Vec<String>,

    /// `archs[i]` and `modes[i]` form explicit pairs
    pub paired: bool,

    pub outdir: PathBuf,
    pub capabilities: BTreeMap<Capability, bool>,
}

/// Resolves run configurations against a fixed set of tables
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    tables: RunnerTables,

    /// What `auto`/`native` stand for; None if the host is unknown
    host_arch: Option<String>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(RunnerTables::default(), guess_host_arch())
    }
}

impl ConfigResolver {
    pub fn new(tables: RunnerTables, host_arch: Option<&str>) -> Self {
        Self {
            tables,
            host_arch: host_arch.map(str::to_string),
        }
    }

    pub fn tables(&self) -> &RunnerTables {
        &self.tables
    }

    /// Resolve `options` into a validated configuration
    pub fn resolve(&self, options: &RunnerOptions) -> Result<ResolvedConfig, ConfigurationError> {
        let mut notices = Vec::new();

        let outdir = self.candidate_outdir(options, &mut notices)?;

        let detected = match descriptor_path(options, &outdir) {
            Some(path) => BuildDescriptor::load(&path)?,
            None => None,
        };

        let selection = match detected {
            Some(ref loaded) => reconcile::reconcile(loaded, options, &mut notices)?,
            None => self.manual(options, outdir)?,
        };
        let auto_detected = detected.is_some();

        let mut modes = Vec::with_capacity(selection.modes.len());
        for mode in &selection.modes {
            self.mode_descriptor(mode)?;
            modes.push(mode.clone());
        }

        let mut archs = Vec::with_capacity(selection.archs.len());
        for arch in &selection.archs {
            archs.push(self.check_arch(arch)?);
        }

        let combinations: Vec<(&str, &str)> = if selection.paired {
            archs
                .iter()
                .zip(&modes)
                .map(|(a, m)| (a.as_str(), m.as_str()))
                .collect()
        } else {
            archs
                .iter()
                .flat_map(|a| modes.iter().map(move |m| (a.as_str(), m.as_str())))
                .collect()
        };

        let mut pairs = Vec::with_capacity(combinations.len());
        for (arch, mode) in combinations {
            let descriptor = self.mode_descriptor(mode)?;
            let build_dir = build_dir(options, &selection.outdir, auto_detected, arch, mode, descriptor);
            pairs.push(ResolvedPair::new(arch, mode, descriptor, build_dir));
        }

        Ok(ResolvedConfig {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            outdir: selection.outdir,
            auto_detected,
            archs,
            modes: modes.iter().map(|m| canonical_mode(m)).collect(),
            pairs,
            capabilities: selection.capabilities,
            descriptor: detected.as_ref().map(DescriptorSource::from),
            tests: None,
            notices,
        })
    }

    fn candidate_outdir(
        &self,
        options: &RunnerOptions,
        notices: &mut Vec<Notice>,
    ) -> Result<PathBuf, ConfigurationError> {
        if !options.gn {
            return Ok(PathBuf::from(&options.outdir));
        }

        let scan_root = options.root.join(DEFAULT_OUT_GN);
        match latest_build_dir(&scan_root)? {
            Some(name) => {
                let dir = Path::new(DEFAULT_OUT_GN).join(name);
                notices.push(Notice::LatestBuild { dir: dir.clone() });
                Ok(dir)
            }
            None => {
                let fallback = PathBuf::from(&options.outdir);
                notices.push(Notice::NoBuildFound {
                    scanned: scan_root,
                    fallback: fallback.clone(),
                });
                Ok(fallback)
            }
        }
    }

    /// Selection straight from the options, no build to consult
    fn manual(&self, options: &RunnerOptions, outdir: PathBuf) -> Result<Selection, ConfigurationError> {
        let (archs, modes, paired) = match options.arch_and_mode {
            Some(ref spec) => {
                let (archs, modes): (Vec<String>, Vec<String>) =
                    parse_arch_and_mode(spec)?.into_iter().unzip();
                (archs, modes, true)
            }
            None => {
                let archs = match options.arch {
                    Some(ref list) => split_list(list),
                    None => self.tables.default_archs.clone(),
                };
                let modes = match options.mode {
                    Some(ref list) => split_list(list),
                    None => self.tables.default_modes.clone(),
                };
                (archs, modes, false)
            }
        };

        let capabilities = Capability::ALL
            .iter()
            .map(|&cap| (cap, options.capability(cap).unwrap_or(false)))
            .collect();

        Ok(Selection {
            archs,
            modes,
            paired,
            outdir,
            capabilities,
        })
    }

    fn mode_descriptor(&self, mode: &str) -> Result<&ModeDescriptor, ConfigurationError> {
        self.tables
            .mode(mode)
            .ok_or_else(|| ConfigurationError::UnknownMode(mode.to_string()))
    }

    /// Resolve `auto`/`native` and check the result is supported
    fn check_arch(&self, arch: &str) -> Result<String, ConfigurationError> {
        let resolved = if AUTO_ARCHS.contains(&arch) {
            self.host_arch
                .clone()
                .ok_or_else(|| ConfigurationError::UnknownArch(arch.to_string()))?
        } else {
            arch.to_string()
        };

        if !self.tables.is_supported_arch(&resolved) {
            return Err(ConfigurationError::UnknownArch(resolved));
        }
        Ok(resolved)
    }
}

/// Where the descriptor would be for these options.
///
/// Buildbot layout keys the directory by the mode as spelled by the bot, so
/// without `--mode` there is nowhere to look.
fn descriptor_path(options: &RunnerOptions, outdir: &Path) -> Option<PathBuf> {
    let base = options.root.join(outdir);
    if options.buildbot {
        options
            .mode
            .as_ref()
            .map(|mode| base.join(mode).join(BUILD_CONFIG_FILE))
    } else {
        Some(base.join(BUILD_CONFIG_FILE))
    }
}

fn build_dir(
    options: &RunnerOptions,
    outdir: &Path,
    auto_detected: bool,
    arch: &str,
    mode: &str,
    descriptor: &ModeDescriptor,
) -> PathBuf {
    if auto_detected {
        outdir.to_path_buf()
    } else if options.buildbot {
        options.root.join(outdir).join(mode)
    } else {
        options
            .root
            .join(outdir)
            .join(format!("{}.{}", arch, descriptor.output_folder))
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_string()).collect()
}

/// Parse `arch.mode,arch.mode,...`
fn parse_arch_and_mode(spec: &str) -> Result<Vec<(String, String)>, ConfigurationError> {
    spec.split(',')
        .map(str::trim)
        .map(|entry| match entry.split_once('.') {
            Some((arch, mode)) if !arch.is_empty() && !mode.is_empty() && !mode.contains('.') => {
                Ok((arch.to_string(), mode.to_string()))
            }
            _ => Err(ConfigurationError::MalformedArchAndMode(entry.to_string())),
        })
        .collect()
}
