//! Environment variable overrides.
//!
//! Each `SPF_HARNESS_*` variable replaces one resolved file value.

use crate::error::ConfigError;
use crate::manager::Backend;

use super::Config;

pub(super) const ENV_TARGET: &str = "SPF_HARNESS_TARGET";
pub(super) const ENV_BACKEND: &str = "SPF_HARNESS_BACKEND";
pub(super) const ENV_TMUX_SOCKET: &str = "SPF_HARNESS_TMUX_SOCKET";
pub(super) const ENV_TMUX_SESSION: &str = "SPF_HARNESS_TMUX_SESSION";
pub(super) const ENV_TMUX_SETTLE_MS: &str = "SPF_HARNESS_TMUX_SETTLE_MS";
pub(super) const ENV_INJECTION_SETTLE_MS: &str = "SPF_HARNESS_INJECTION_SETTLE_MS";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(path) = env_lookup(ENV_TARGET) {
        config.target.path = path.into();
    }
    if let Some(backend) = env_lookup(ENV_BACKEND) {
        config.harness.backend = backend.parse::<Backend>()?;
    }
    if let Some(socket) = env_lookup(ENV_TMUX_SOCKET) {
        config.tmux.socket_name = socket;
    }
    if let Some(session) = env_lookup(ENV_TMUX_SESSION) {
        config.tmux.session_name = session;
    }
    if let Some(ms) = env_lookup(ENV_TMUX_SETTLE_MS) {
        config.tmux.settle_delay_ms = parse_millis(ENV_TMUX_SETTLE_MS, &ms)?;
    }
    if let Some(ms) = env_lookup(ENV_INJECTION_SETTLE_MS) {
        config.injection.settle_delay_ms = parse_millis(ENV_INJECTION_SETTLE_MS, &ms)?;
    }
    Ok(())
}

fn parse_millis(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {name} value `{value}`: expected non-negative integer milliseconds"
        ))
    })
}
