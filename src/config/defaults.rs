//! Default configuration constants.

/// Target program launched when no path is configured (resolved via `PATH`).
pub(super) const DEFAULT_TARGET_PATH: &str = "spf";
/// tmux `-L` socket namespace shared by every harness session.
pub(super) const DEFAULT_TMUX_SOCKET: &str = "superfile";
/// Session name created on the socket.
pub(super) const DEFAULT_TMUX_SESSION: &str = "spf_session";
/// Wait after creating the session before the target is ready for input.
pub(super) const DEFAULT_TMUX_SETTLE_MS: u64 = 100;
/// Wait after spawning the subprocess before injecting input.
pub(super) const DEFAULT_INJECTION_SETTLE_MS: u64 = 500;
/// Throwaway keystroke typed after start so later input is not lost.
pub(super) const DEFAULT_WARMUP_KEYSTROKE: &str = "x";

/// File name looked up in the working directory and the config root.
pub(super) const CONFIG_FILE_NAME: &str = "spf-harness.toml";
/// Directory under the config root holding the global file.
pub(super) const CONFIG_DIR_NAME: &str = "spf-harness";
