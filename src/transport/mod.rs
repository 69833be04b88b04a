//! External integration points used by the managers.
//!
//! Each submodule exposes a narrow trait plus one production implementation
//! that shells out to a helper program. Tests substitute recording mocks.

pub mod input;
pub mod process;
pub mod tmux;

use std::process::{Command, Stdio};

use crate::error::TransportError;

/// Captured output of one helper-program invocation.
#[derive(Debug)]
pub(crate) struct ExecOutput {
    pub(crate) success: bool,
    pub(crate) status: String,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Run a helper program to completion and capture its output.
pub(crate) fn run_process(program: &str, args: &[String]) -> Result<ExecOutput, TransportError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TransportError::Spawn {
            program: program.to_string(),
            source,
        })?;
    Ok(ExecOutput {
        success: output.status.success(),
        status: output.status.to_string(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert an unsuccessful run into a contextual transport error.
pub(crate) fn ensure_success(
    output: ExecOutput,
    program: &str,
    args: &[String],
) -> Result<ExecOutput, TransportError> {
    if output.success {
        return Ok(output);
    }
    let detail = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    Err(TransportError::CommandFailed {
        command: format!("{program} {}", args.join(" ")),
        status: output.status,
        detail,
    })
}

/// Shell-safe single-quote escaping.
pub(crate) fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".into()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_empty() {
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn quote_with_single_quote() {
        assert_eq!(shell_quote("a'b"), "'a'\\''b'");
    }

    #[test]
    fn ensure_success_prefers_stderr_detail() {
        let output = ExecOutput {
            success: false,
            status: "exit status: 1".into(),
            stdout: "ignored".into(),
            stderr: "no server running on /tmp/tmux-0/superfile\n".into(),
        };
        let err = ensure_success(output, "tmux", &["list-sessions".into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`tmux list-sessions` failed with exit status: 1: no server running on /tmp/tmux-0/superfile"
        );
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_process("spf-harness-definitely-missing-binary", &[]).unwrap_err();
        assert!(matches!(err, TransportError::Spawn { .. }), "got: {err}");
    }
}
