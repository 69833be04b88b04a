//! Configuration data model.
//!
//! Every section is `#[serde(default)]`, so a partial (or empty) file
//! deserializes into the built-in defaults for whatever it leaves out.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::manager::Backend;

use super::defaults::{
    DEFAULT_INJECTION_SETTLE_MS, DEFAULT_TARGET_PATH, DEFAULT_TMUX_SESSION,
    DEFAULT_TMUX_SETTLE_MS, DEFAULT_TMUX_SOCKET, DEFAULT_WARMUP_KEYSTROKE,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub harness: HarnessConfig,
    pub target: TargetConfig,
    pub tmux: TmuxConfig,
    pub injection: InjectionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Backend used when `--backend` is not given.
    pub backend: Backend,
}

/// The program under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    pub path: PathBuf,
    /// Directory passed to the target at start; `None` uses its own default.
    pub start_dir: Option<PathBuf>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_TARGET_PATH),
            start_dir: None,
        }
    }
}

/// Session backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TmuxConfig {
    pub socket_name: String,
    pub session_name: String,
    pub settle_delay_ms: u64,
}

impl Default for TmuxConfig {
    fn default() -> Self {
        Self {
            socket_name: DEFAULT_TMUX_SOCKET.to_string(),
            session_name: DEFAULT_TMUX_SESSION.to_string(),
            settle_delay_ms: DEFAULT_TMUX_SETTLE_MS,
        }
    }
}

impl TmuxConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Input-injection backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InjectionConfig {
    pub settle_delay_ms: u64,
    /// Typed once after start; the target drops its first keystroke.
    pub warmup_keystroke: String,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_INJECTION_SETTLE_MS,
            warmup_keystroke: DEFAULT_WARMUP_KEYSTROKE.to_string(),
        }
    }
}

impl InjectionConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Where the loaded config text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config <path>`.
    Explicit(PathBuf),
    /// `./spf-harness.toml`.
    Local,
    /// `<config root>/spf-harness/spf-harness.toml`.
    Global(PathBuf),
    /// No file found.
    BuiltInDefaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) | Self::Global(path) => write!(f, "{}", path.display()),
            Self::Local => write!(f, "./{}", super::defaults::CONFIG_FILE_NAME),
            Self::BuiltInDefaults => f.write_str("built-in defaults"),
        }
    }
}

/// Resolved config plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}
