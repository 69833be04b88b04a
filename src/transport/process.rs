//! Plain subprocess launch, exit polling and termination.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::error::TransportError;

/// How a target process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("signal"),
        }
    }
}

/// A launched target owned by exactly one manager.
pub trait TargetProcess {
    fn id(&self) -> u32;
    /// Non-blocking exit poll: `None` while the process is still running.
    fn try_wait(&mut self) -> Result<Option<ExitInfo>, TransportError>;
    /// Request termination. A no-op when the process already exited.
    fn terminate(&mut self) -> Result<(), TransportError>;
    /// Block until the process exits and reap it.
    fn wait(&mut self) -> Result<ExitInfo, TransportError>;
}

/// Spawns target processes with their output discarded.
pub trait ProcessLauncher {
    type Process: TargetProcess;

    fn spawn(&self, program: &Path, args: &[OsString]) -> Result<Self::Process, TransportError>;
}

/// Production launcher backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    type Process = SystemProcess;

    fn spawn(&self, program: &Path, args: &[OsString]) -> Result<SystemProcess, TransportError> {
        // stdin stays inherited so the target keeps the controlling terminal.
        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        Ok(SystemProcess { child })
    }
}

#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
}

impl TargetProcess for SystemProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn try_wait(&mut self) -> Result<Option<ExitInfo>, TransportError> {
        let status = self.child.try_wait().map_err(|source| TransportError::Spawn {
            program: format!("pid {}", self.child.id()),
            source,
        })?;
        Ok(status.map(|status| ExitInfo {
            code: status.code(),
        }))
    }

    fn terminate(&mut self) -> Result<(), TransportError> {
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }
        match self.child.kill() {
            Ok(()) => Ok(()),
            // Already reaped between the poll and the kill.
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(source) => Err(TransportError::Spawn {
                program: format!("kill pid {}", self.child.id()),
                source,
            }),
        }
    }

    fn wait(&mut self) -> Result<ExitInfo, TransportError> {
        let status = self.child.wait().map_err(|source| TransportError::Spawn {
            program: format!("wait pid {}", self.child.id()),
            source,
        })?;
        Ok(ExitInfo {
            code: status.code(),
        })
    }
}
