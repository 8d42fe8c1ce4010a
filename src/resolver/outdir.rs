//! Discovery of the most recently built output directory.

use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::ConfigurationError;

/// Name of the most recently modified subdirectory of `scan_root`.
///
/// Returns `Ok(None)` when `scan_root` does not exist or holds no
/// directories. Entries that cannot be stat'ed (dangling symlinks, entries
/// removed mid-scan) are not directories and are skipped. Ties go to the name
/// that sorts first.
pub fn latest_build_dir(scan_root: &Path) -> Result<Option<String>, ConfigurationError> {
    if !scan_root.is_dir() {
        return Ok(None);
    }

    let mut latest: Option<(SystemTime, String)> = None;

    for entry in WalkDir::new(scan_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself failing is fatal; a bad child is just not a build.
            Err(e) if e.depth() == 0 => {
                return Err(ConfigurationError::BuildScan {
                    path: scan_root.to_path_buf(),
                    reason: e.to_string(),
                })
            }
            Err(_) => continue,
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(modified) => modified,
            None => continue,
        };

        let newer = match &latest {
            Some((best, _)) => modified > *best,
            None => true,
        };
        if newer {
            latest = Some((modified, entry.file_name().to_string_lossy().to_string()));
        }
    }

    Ok(latest.map(|(_, name)| name))
}
