//! Shared fixtures: on-disk checkouts with build descriptors.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Descriptor contents for a plain build of `cpu`
pub fn descriptor_json(cpu: &str, is_debug: bool) -> Value {
    json!({
        "current_cpu": "x64",
        "dcheck_always_on": false,
        "is_asan": false,
        "is_cfi": false,
        "is_component_build": false,
        "is_debug": is_debug,
        "is_gcov_coverage": false,
        "is_msan": false,
        "is_tsan": false,
        "is_ubsan_vptr": false,
        "target_cpu": cpu,
        "v8_current_cpu": cpu,
        "v8_enable_i18n_support": true,
        "v8_enable_verify_predictable": false,
        "v8_target_cpu": cpu,
        "v8_use_snapshot": true
    })
}

/// A temporary checkout root
pub struct Checkout {
    dir: TempDir,
}

impl Checkout {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp checkout"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `descriptor` into `<root>/<rel_dir>/v8_build_config.json`
    pub fn write_descriptor(&self, rel_dir: &str, descriptor: &Value) -> PathBuf {
        let dir = self.root().join(rel_dir);
        fs::create_dir_all(&dir).expect("create build dir");
        let path = dir.join("v8_build_config.json");
        fs::write(&path, serde_json::to_vec_pretty(descriptor).expect("serialize"))
            .expect("write descriptor");
        path
    }

    /// Write raw bytes as the descriptor in `<root>/<rel_dir>`
    pub fn write_raw_descriptor(&self, rel_dir: &str, contents: &str) -> PathBuf {
        let dir = self.root().join(rel_dir);
        fs::create_dir_all(&dir).expect("create build dir");
        let path = dir.join("v8_build_config.json");
        fs::write(&path, contents).expect("write descriptor");
        path
    }
}
