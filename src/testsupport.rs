//! Recording mock transports shared by manager test modules.
//!
//! Each mock is `Clone` and keeps its call log behind an `Arc`, so a test
//! hands one clone to the manager and inspects the log through another.

use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::{InjectionConfig, TmuxConfig};
use crate::error::TransportError;
use crate::keys::Modifier;
use crate::transport::input::OsInput;
use crate::transport::process::{ExitInfo, ProcessLauncher, TargetProcess};
use crate::transport::tmux::TmuxTransport;

/// Tmux settings with no settle delay.
pub fn tmux_settings() -> TmuxConfig {
    TmuxConfig {
        socket_name: "superfile".to_string(),
        session_name: "spf_session".to_string(),
        settle_delay_ms: 0,
    }
}

/// Injection settings with no settle delay.
pub fn injection_settings() -> InjectionConfig {
    InjectionConfig {
        settle_delay_ms: 0,
        warmup_keystroke: "x".to_string(),
    }
}

fn failed(command: &str, detail: &str) -> TransportError {
    TransportError::CommandFailed {
        command: command.to_string(),
        status: "exit status: 1".to_string(),
        detail: detail.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tmux
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxCall {
    NewSession {
        name: String,
        command: String,
        start_dir: Option<String>,
    },
    KillSession(String),
    SendLiteral {
        pane: String,
        text: String,
    },
    SendNamed {
        pane: String,
        name: String,
    },
}

/// In-memory tmux server holding a list of live session names.
#[derive(Debug, Clone, Default)]
pub struct MockTmux {
    calls: Arc<Mutex<Vec<TmuxCall>>>,
    sessions: Arc<Mutex<Vec<String>>>,
    fail_new_session: bool,
}

impl MockTmux {
    pub fn failing_new_session() -> Self {
        Self {
            fail_new_session: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TmuxCall> {
        self.calls.lock().expect("mock lock").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("mock lock").clear();
    }

    /// Payloads of every literal injection, in order.
    pub fn literals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TmuxCall::SendLiteral { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn session_count(&self, name: &str) -> usize {
        let sessions = self.sessions.lock().expect("mock lock");
        sessions.iter().filter(|session| *session == name).count()
    }

    /// Remove a session without going through the manager.
    pub fn kill_externally(&self, name: &str) {
        self.sessions
            .lock()
            .expect("mock lock")
            .retain(|session| session != name);
    }

    /// Register another session under the same name.
    pub fn add_foreign_session(&self, name: &str) {
        self.sessions
            .lock()
            .expect("mock lock")
            .push(name.to_string());
    }

    fn record(&self, call: TmuxCall) {
        self.calls.lock().expect("mock lock").push(call);
    }
}

impl TmuxTransport for MockTmux {
    fn socket_name(&self) -> &str {
        "superfile"
    }

    fn new_session(
        &self,
        name: &str,
        command: &str,
        start_dir: Option<&Path>,
    ) -> Result<String, TransportError> {
        self.record(TmuxCall::NewSession {
            name: name.to_string(),
            command: command.to_string(),
            start_dir: start_dir.map(|dir| dir.display().to_string()),
        });
        if self.fail_new_session {
            return Err(failed("tmux new-session", "command not found"));
        }
        let mut sessions = self.sessions.lock().expect("mock lock");
        sessions.push(name.to_string());
        Ok(format!("%{}", sessions.len()))
    }

    fn list_sessions(&self) -> Result<Vec<String>, TransportError> {
        Ok(self.sessions.lock().expect("mock lock").clone())
    }

    fn kill_session(&self, name: &str) -> Result<(), TransportError> {
        self.record(TmuxCall::KillSession(name.to_string()));
        let mut sessions = self.sessions.lock().expect("mock lock");
        let Some(idx) = sessions.iter().position(|session| session == name) else {
            return Err(failed("tmux kill-session", "can't find session"));
        };
        sessions.remove(idx);
        Ok(())
    }

    fn send_literal(&self, pane: &str, text: &str) -> Result<(), TransportError> {
        self.record(TmuxCall::SendLiteral {
            pane: pane.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn send_named(&self, pane: &str, name: &str) -> Result<(), TransportError> {
        self.record(TmuxCall::SendNamed {
            pane: pane.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

pub const MOCK_PID: u32 = 4242;

#[derive(Debug, Default)]
struct MockProcessState {
    exit: Option<ExitInfo>,
    terminate_calls: usize,
}

/// Launcher whose processes share one observable state.
#[derive(Debug, Clone, Default)]
pub struct MockLauncher {
    spawned: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    process: Arc<Mutex<MockProcessState>>,
    fail: bool,
}

impl MockLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(program, args)` for every successful spawn.
    pub fn spawned(&self) -> Vec<(String, Vec<String>)> {
        self.spawned.lock().expect("mock lock").clone()
    }

    pub fn terminate_calls(&self) -> usize {
        self.process.lock().expect("mock lock").terminate_calls
    }

    /// Make the spawned process exit on its own.
    pub fn exit_with(&self, code: Option<i32>) {
        self.process.lock().expect("mock lock").exit = Some(ExitInfo { code });
    }
}

impl ProcessLauncher for MockLauncher {
    type Process = MockProcess;

    fn spawn(&self, program: &Path, args: &[OsString]) -> Result<MockProcess, TransportError> {
        if self.fail {
            return Err(TransportError::Spawn {
                program: program.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        self.spawned.lock().expect("mock lock").push((
            program.display().to_string(),
            args.iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
        ));
        Ok(MockProcess {
            state: Arc::clone(&self.process),
        })
    }
}

#[derive(Debug)]
pub struct MockProcess {
    state: Arc<Mutex<MockProcessState>>,
}

impl TargetProcess for MockProcess {
    fn id(&self) -> u32 {
        MOCK_PID
    }

    fn try_wait(&mut self) -> Result<Option<ExitInfo>, TransportError> {
        Ok(self.state.lock().expect("mock lock").exit)
    }

    fn terminate(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock().expect("mock lock");
        state.terminate_calls += 1;
        if state.exit.is_none() {
            state.exit = Some(ExitInfo { code: None });
        }
        Ok(())
    }

    fn wait(&mut self) -> Result<ExitInfo, TransportError> {
        Ok(self
            .state
            .lock()
            .expect("mock lock")
            .exit
            .unwrap_or(ExitInfo { code: None }))
    }
}

// ---------------------------------------------------------------------------
// OS input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCall {
    Text(String),
    Key(String),
    Hotkey(Modifier, char),
}

#[derive(Debug, Clone, Default)]
pub struct MockInput {
    calls: Arc<Mutex<Vec<InputCall>>>,
    fail: bool,
}

impl MockInput {
    /// Input whose every call fails, as when no display is available.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<InputCall> {
        self.calls.lock().expect("mock lock").clone()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("mock lock").clear();
    }

    fn record(&self, call: InputCall) -> Result<(), TransportError> {
        if self.fail {
            return Err(failed("xdotool", "Can't open display"));
        }
        self.calls.lock().expect("mock lock").push(call);
        Ok(())
    }
}

impl OsInput for MockInput {
    fn write_text(&self, text: &str) -> Result<(), TransportError> {
        self.record(InputCall::Text(text.to_string()))
    }

    fn press_key(&self, name: &str) -> Result<(), TransportError> {
        self.record(InputCall::Key(name.to_string()))
    }

    fn hotkey(&self, modifier: Modifier, c: char) -> Result<(), TransportError> {
        self.record(InputCall::Hotkey(modifier, c))
    }
}
