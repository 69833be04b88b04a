//! Compile-time build metadata exposed through `--version` and `--help`.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("SPF_HARNESS_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("SPF_HARNESS_BUILD_TIMESTAMP");

/// Version block printed by `spf-harness --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("SPF_HARNESS_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("SPF_HARNESS_BUILD_TIMESTAMP")
);

/// Help trailer block that surfaces build metadata in `spf-harness --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("SPF_HARNESS_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("SPF_HARNESS_BUILD_TIMESTAMP")
);

/// One-line form attached to the JSON run report.
pub fn short_version() -> String {
    format!("{VERSION} ({GIT_COMMIT})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_includes_expected_lines() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains("commit:"));
        assert!(LONG_VERSION.contains("built:"));
    }

    #[test]
    fn short_version_names_commit() {
        let text = short_version();
        assert!(text.starts_with(VERSION));
        assert!(text.contains(GIT_COMMIT));
    }
}
