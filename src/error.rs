//! Unified error types for the harness.

use std::fmt;

use crate::manager::ManagerState;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors from the external integration points (tmux, process, OS input).
#[derive(Debug)]
pub enum TransportError {
    /// The helper program could not be spawned at all.
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The helper program ran but exited unsuccessfully.
    CommandFailed {
        command: String,
        status: String,
        detail: String,
    },
    /// The helper program succeeded but printed something unexpected.
    Parse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "failed to run {program}: {source}"),
            Self::CommandFailed {
                command,
                status,
                detail,
            } => {
                if detail.is_empty() {
                    write!(f, "`{command}` failed with {status}")
                } else {
                    write!(f, "`{command}` failed with {status}: {detail}")
                }
            }
            Self::Parse(msg) => write!(f, "unexpected output: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// KeyParseError
// ---------------------------------------------------------------------------

/// A hotkey string that does not name any known key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hotkey `{}`", self.0)
    }
}

impl std::error::Error for KeyParseError {}

// ---------------------------------------------------------------------------
// HarnessError
// ---------------------------------------------------------------------------

/// Top-level error type for manager operations.
#[derive(Debug)]
pub enum HarnessError {
    /// The key intent populates none of the encodings this backend understands.
    UnresolvableKey(String),
    /// Spawning the target or creating its session failed.
    Launch { target: String, message: String },
    /// An injection, liveness or teardown call failed in the transport.
    Transport(TransportError),
    /// The operation needs a live target handle and there is none.
    NotRunning { operation: &'static str },
    /// The lifecycle does not allow this operation from the current state.
    InvalidState {
        operation: &'static str,
        state: ManagerState,
    },
    Config(ConfigError),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvableKey(key) => write!(f, "unresolvable key intent: {key}"),
            Self::Launch { target, message } => {
                write!(f, "failed to launch `{target}`: {message}")
            }
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::NotRunning { operation } => {
                write!(f, "cannot {operation}: target is not running")
            }
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while manager is {state}")
            }
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<TransportError> for HarnessError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for HarnessError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
