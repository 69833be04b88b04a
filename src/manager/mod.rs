//! Target-program managers.
//!
//! A manager launches the target, delivers input to it, answers liveness
//! queries and tears it down. Two backends implement [`TargetManager`]:
//!
//! - [`TmuxManager`]: runs the target inside a detached tmux session and
//!   injects keys into that session's pane. Safe to run headless.
//! - [`InjectionManager`]: runs the target as a plain subprocess and
//!   synthesizes OS keyboard events. Needs exclusive input focus.
//!
//! Lifecycle: `NotStarted --start--> Running --close--> Stopped`. A target
//! that dies on its own is noticed lazily by the next [`TargetManager::is_running`]
//! call, which moves the manager to `Stopped`. `Stopped` is terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ConfigError, HarnessError};
use crate::keys::{KeyIntent, SpecialKey};

mod injection;
mod tmux;

pub use injection::InjectionManager;
pub use tmux::TmuxManager;

/// Returned by [`TargetManager::get_rendered_output`] until capture exists.
pub const RENDER_UNSUPPORTED: &str = "[Not supported yet]";
/// Default for [`TargetManager::runtime_info`].
pub const NO_RUNTIME_INFO: &str = "[No runtime info]";

/// Observable lifecycle state of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManagerState {
    NotStarted,
    Running,
    Stopped,
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not started",
            Self::Running => "running",
            Self::Stopped => "stopped",
        })
    }
}

/// Internal lifecycle carrying the backend handle only while running.
#[derive(Debug)]
pub(crate) enum Lifecycle<H> {
    NotStarted,
    Running(H),
    /// Handle released; `last` describes the target for diagnostics.
    Stopped { last: String },
}

impl<H> Lifecycle<H> {
    pub(crate) fn state(&self) -> ManagerState {
        match self {
            Self::NotStarted => ManagerState::NotStarted,
            Self::Running(_) => ManagerState::Running,
            Self::Stopped { .. } => ManagerState::Stopped,
        }
    }

    /// Only a fresh manager may start.
    pub(crate) fn ensure_startable(&self) -> Result<(), HarnessError> {
        match self {
            Self::NotStarted => Ok(()),
            other => Err(HarnessError::InvalidState {
                operation: "start",
                state: other.state(),
            }),
        }
    }

    pub(crate) fn handle(&self) -> Option<&H> {
        match self {
            Self::Running(handle) => Some(handle),
            _ => None,
        }
    }

    pub(crate) fn handle_mut(&mut self) -> Option<&mut H> {
        match self {
            Self::Running(handle) => Some(handle),
            _ => None,
        }
    }

    /// Move to `Stopped`, handing back the released handle if there was one.
    pub(crate) fn stop(&mut self, last: String) -> Option<H> {
        match std::mem::replace(self, Self::Stopped { last }) {
            Self::Running(handle) => Some(handle),
            Self::NotStarted => {
                *self = Self::NotStarted;
                None
            }
            stopped @ Self::Stopped { .. } => {
                *self = stopped;
                None
            }
        }
    }
}

/// Uniform control surface over one target-program instance.
///
/// Operations are blocking and must be serialized by the caller.
pub trait TargetManager {
    /// Launch the target, optionally rooted at `start_dir`, and wait the
    /// backend's settle delay so it is ready for input.
    ///
    /// Fails with [`HarnessError::InvalidState`] unless the manager is fresh,
    /// and with [`HarnessError::Launch`] if the target cannot be started; the
    /// manager stays `NotStarted` in both cases.
    fn start(&mut self, start_dir: Option<&std::path::Path>) -> Result<(), HarnessError>;

    /// Deliver `text` as one injection (`all_at_once`) or one injection per
    /// character. Both modes leave the same text in the target's input.
    fn send_text_input(&mut self, text: &str, all_at_once: bool) -> Result<(), HarnessError>;

    /// Deliver one special key using the backend's preferred encoding.
    ///
    /// Fails with [`HarnessError::UnresolvableKey`] when the key carries no
    /// encoding the backend understands.
    fn send_special_input(&mut self, key: &SpecialKey) -> Result<(), HarnessError>;

    /// Current rendered screen of the target.
    fn get_rendered_output(&self) -> String {
        RENDER_UNSUPPORTED.to_string()
    }

    /// Authoritative liveness check, recomputed from the backend every call.
    fn is_running(&mut self) -> bool;

    /// Terminate the target if it is running. Idempotent.
    fn close(&mut self) -> Result<(), HarnessError>;

    fn state(&self) -> ManagerState;

    /// Human-readable diagnostics; never fails.
    fn runtime_info(&mut self) -> String {
        NO_RUNTIME_INFO.to_string()
    }

    /// Deliver a [`KeyIntent`]; text spans go out in one injection.
    fn send_intent(&mut self, intent: &KeyIntent) -> Result<(), HarnessError> {
        match intent {
            KeyIntent::Text(text) => self.send_text_input(text, true),
            KeyIntent::Special(key) => self.send_special_input(key),
        }
    }
}

/// Which control backend drives the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Tmux,
    Injection,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tmux => "tmux",
            Self::Injection => "injection",
        })
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmux" => Ok(Self::Tmux),
            "injection" | "pyautogui" | "xdotool" => Ok(Self::Injection),
            other => Err(ConfigError::Invalid(format!(
                "unknown backend `{other}`: expected `tmux` or `injection`"
            ))),
        }
    }
}

/// Build the production manager for `backend` from resolved config.
pub fn build_manager(config: &Config, backend: Backend) -> Box<dyn TargetManager> {
    match backend {
        Backend::Tmux => Box::new(TmuxManager::new(&config.target.path, &config.tmux)),
        Backend::Injection => Box::new(InjectionManager::new(
            &config.target.path,
            &config.injection,
        )),
    }
}
