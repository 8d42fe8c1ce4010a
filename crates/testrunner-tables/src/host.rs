//! Host architecture guess for `--arch=auto`.

/// Map a Rust target architecture name to runner naming.
///
/// Returns `None` for hosts the runner has no architecture for.
pub fn host_arch_for(rust_arch: &str) -> Option<&'static str> {
    match rust_arch {
        "x86_64" => Some("x64"),
        "x86" => Some("ia32"),
        "aarch64" => Some("arm64"),
        "arm" => Some("arm"),
        "mips" => Some("mips"),
        "mips64" => Some("mips64"),
        "powerpc" => Some("ppc"),
        "powerpc64" => Some("ppc64"),
        "s390x" => Some("s390x"),
        _ => None,
    }
}

/// Architecture of the machine the runner is executing on
pub fn guess_host_arch() -> Option<&'static str> {
    host_arch_for(std::env::consts::ARCH)
}
