//! Tmux server access scoped to one named socket.

use std::path::Path;

use crate::error::TransportError;

use super::{ensure_success, run_process};

/// Operations the session-based manager needs from a multiplexer server.
pub trait TmuxTransport {
    /// Socket namespace this transport talks to.
    fn socket_name(&self) -> &str;
    /// Create a detached session running `command`; returns its active pane id.
    fn new_session(
        &self,
        name: &str,
        command: &str,
        start_dir: Option<&Path>,
    ) -> Result<String, TransportError>;
    /// Names of every live session on the server.
    fn list_sessions(&self) -> Result<Vec<String>, TransportError>;
    fn kill_session(&self, name: &str) -> Result<(), TransportError>;
    /// Type `text` into the pane byte for byte. Never appends Enter.
    fn send_literal(&self, pane: &str, text: &str) -> Result<(), TransportError>;
    /// Press a key by its tmux name (`Escape`, `Up`, `M-x`).
    fn send_named(&self, pane: &str, name: &str) -> Result<(), TransportError>;
}

/// Production transport driving the `tmux` binary with `-L <socket>`.
#[derive(Debug, Clone)]
pub struct TmuxCli {
    program: String,
    socket_name: String,
}

impl TmuxCli {
    pub fn new(socket_name: impl Into<String>) -> Self {
        Self {
            program: "tmux".to_string(),
            socket_name: socket_name.into(),
        }
    }

    fn run(&self, args: Vec<String>) -> Result<String, TransportError> {
        let args = self.with_socket(args);
        let output = run_process(&self.program, &args)?;
        Ok(ensure_success(output, &self.program, &args)?.stdout)
    }

    fn with_socket(&self, args: Vec<String>) -> Vec<String> {
        let mut full = vec!["-L".to_string(), self.socket_name.clone()];
        full.extend(args);
        full
    }
}

impl TmuxTransport for TmuxCli {
    fn socket_name(&self) -> &str {
        &self.socket_name
    }

    fn new_session(
        &self,
        name: &str,
        command: &str,
        start_dir: Option<&Path>,
    ) -> Result<String, TransportError> {
        let stdout = self.run(new_session_args(name, command, start_dir))?;
        let pane = stdout.trim();
        if pane.is_empty() {
            return Err(TransportError::Parse(format!(
                "tmux new-session printed no pane id for session `{name}`"
            )));
        }
        Ok(pane.to_string())
    }

    fn list_sessions(&self) -> Result<Vec<String>, TransportError> {
        let args = self.with_socket(vec![
            "list-sessions".into(),
            "-F".into(),
            "#{session_name}".into(),
        ]);
        let output = run_process(&self.program, &args)?;
        if !output.success && is_no_server_error(&output.stderr) {
            // A server with no sessions exits, so "no server" means "no sessions".
            return Ok(Vec::new());
        }
        let output = ensure_success(output, &self.program, &args)?;
        Ok(parse_session_names(&output.stdout))
    }

    fn kill_session(&self, name: &str) -> Result<(), TransportError> {
        self.run(vec![
            "kill-session".into(),
            "-t".into(),
            exact_session_target(name),
        ])?;
        Ok(())
    }

    fn send_literal(&self, pane: &str, text: &str) -> Result<(), TransportError> {
        self.run(send_keys_args(pane, text, true))?;
        Ok(())
    }

    fn send_named(&self, pane: &str, name: &str) -> Result<(), TransportError> {
        self.run(send_keys_args(pane, name, false))?;
        Ok(())
    }
}

/// Arguments for `new-session` that print the active pane id on success.
pub(crate) fn new_session_args(name: &str, command: &str, start_dir: Option<&Path>) -> Vec<String> {
    let mut args = vec![
        "new-session".to_string(),
        "-d".to_string(),
        "-s".to_string(),
        name.to_string(),
    ];
    if let Some(dir) = start_dir {
        args.push("-c".into());
        args.push(dir.display().to_string());
    }
    args.extend([
        "-P".to_string(),
        "-F".to_string(),
        "#{pane_id}".to_string(),
        command.to_string(),
    ]);
    args
}

/// Arguments for `send-keys`. `--` stops option parsing so text such as `-x`
/// is typed rather than read as a flag.
pub(crate) fn send_keys_args(pane: &str, keys: &str, literal: bool) -> Vec<String> {
    let mut args = vec!["send-keys".to_string(), "-t".to_string(), pane.to_string()];
    if literal {
        args.push("-l".into());
    }
    args.push("--".into());
    args.push(escape_trailing_separator(keys));
    args
}

/// tmux strips a trailing `;` from an argument as a command separator and
/// turns a trailing `\;` back into `;`.
fn escape_trailing_separator(keys: &str) -> String {
    match keys.strip_suffix(';') {
        Some(rest) => format!("{rest}\\;"),
        None => keys.to_string(),
    }
}

/// `=name` makes tmux match the session name exactly instead of by prefix.
pub(crate) fn exact_session_target(name: &str) -> String {
    format!("={name}")
}

pub(crate) fn parse_session_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_no_server_error(stderr: &str) -> bool {
    stderr.contains("no server running") || stderr.contains("error connecting to")
}
