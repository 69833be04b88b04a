//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`SPF_HARNESS_TARGET`, `SPF_HARNESS_BACKEND`,
//!    `SPF_HARNESS_TMUX_SOCKET`, `SPF_HARNESS_TMUX_SESSION`,
//!    `SPF_HARNESS_TMUX_SETTLE_MS`, `SPF_HARNESS_INJECTION_SETTLE_MS`).
//! 2. TOML file specified via --config CLI flag
//! 3. ./spf-harness.toml in the current directory
//! 4. $XDG_CONFIG_HOME/spf-harness/spf-harness.toml (or
//!    ~/.config/spf-harness/spf-harness.toml)
//! 5. Built-in defaults
//!
//! ```toml
//! [harness]
//! backend = "tmux"
//!
//! [target]
//! path = "/usr/local/bin/spf"
//! start_dir = "/tmp/playground"
//!
//! [tmux]
//! socket_name = "superfile"
//! session_name = "spf_session"
//! settle_delay_ms = 100
//!
//! [injection]
//! settle_delay_ms = 500
//! warmup_keystroke = "x"
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

pub use types::{
    Config, ConfigSource, HarnessConfig, InjectionConfig, LoadedConfig, TargetConfig, TmuxConfig,
};

use env::apply_runtime_env_overrides;
use sources::read_config_text_with_sources;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_source(path_override)?.config)
}

/// Load configuration and report which file it came from.
pub fn load_config_with_source(path_override: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&config_text)?;
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    validate_config(&config)?;
    Ok(LoadedConfig { config, source })
}

/// Reject values no backend can run with.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.target.path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("target.path must not be empty".into()));
    }
    if config.tmux.socket_name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "tmux.socket_name must not be empty".into(),
        ));
    }
    if config.tmux.session_name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "tmux.session_name must not be empty".into(),
        ));
    }
    // tmux treats `:` and `.` in a target as window/pane separators.
    if config.tmux.session_name.contains([':', '.']) {
        return Err(ConfigError::Invalid(format!(
            "tmux.session_name `{}` must not contain `:` or `.`",
            config.tmux.session_name
        )));
    }
    if config.injection.warmup_keystroke.is_empty() {
        return Err(ConfigError::Invalid(
            "injection.warmup_keystroke must not be empty".into(),
        ));
    }
    Ok(())
}

/// Base directory for the global config file.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
