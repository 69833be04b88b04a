//! Session-based manager: the target runs inside a detached tmux session.
//!
//! After `start` you can watch the target live with
//! `tmux -L <socket> attach -t <session>`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::TmuxConfig;
use crate::error::{HarnessError, TransportError};
use crate::keys::{KeyEncoding, SpecialKey};
use crate::transport::shell_quote;
use crate::transport::tmux::{TmuxCli, TmuxTransport};

use super::{Lifecycle, ManagerState, TargetManager};

/// Session and pane owned by one running manager.
#[derive(Debug)]
struct SessionHandle {
    session: String,
    pane: String,
}

pub struct TmuxManager<T: TmuxTransport = TmuxCli> {
    target: PathBuf,
    session_name: String,
    settle_delay: Duration,
    transport: T,
    lifecycle: Lifecycle<SessionHandle>,
    /// Last liveness answer. Written only by `is_running`.
    running: bool,
}

impl TmuxManager<TmuxCli> {
    /// Manager talking to the real tmux server on `settings.socket_name`.
    pub fn new(target: impl Into<PathBuf>, settings: &TmuxConfig) -> Self {
        Self::with_transport(target, settings, TmuxCli::new(&settings.socket_name))
    }
}

impl<T: TmuxTransport> TmuxManager<T> {
    pub fn with_transport(target: impl Into<PathBuf>, settings: &TmuxConfig, transport: T) -> Self {
        Self {
            target: target.into(),
            session_name: settings.session_name.clone(),
            settle_delay: settings.settle_delay(),
            transport,
            lifecycle: Lifecycle::NotStarted,
            running: false,
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Command to attach an interactive client to the running session.
    pub fn attach_command(&self) -> String {
        format!(
            "tmux -L {} attach -t {}",
            self.transport.socket_name(),
            self.session_name
        )
    }

    fn pane(&self, operation: &'static str) -> Result<&str, HarnessError> {
        self.lifecycle
            .handle()
            .map(|handle| handle.pane.as_str())
            .ok_or(HarnessError::NotRunning { operation })
    }

    fn send_literal(&self, pane: &str, text: &str) -> Result<(), HarnessError> {
        debug!(pane, text = ?text, "tmux send literal");
        self.transport.send_literal(pane, text)?;
        Ok(())
    }

    /// Query the server and move to `Stopped` if our session is gone.
    fn probe(&mut self) -> Result<bool, TransportError> {
        let Some(handle) = self.lifecycle.handle() else {
            return Ok(false);
        };
        let sessions = self.transport.list_sessions()?;
        let matches = sessions
            .iter()
            .filter(|name| **name == handle.session)
            .count();
        if matches == 1 {
            return Ok(true);
        }
        info!(
            session = %self.session_name,
            matches,
            "tmux session no longer live"
        );
        self.lifecycle.stop(self.session_name.clone());
        Ok(false)
    }
}

impl<T: TmuxTransport> TargetManager for TmuxManager<T> {
    fn start(&mut self, start_dir: Option<&Path>) -> Result<(), HarnessError> {
        self.lifecycle.ensure_startable()?;
        let command = shell_quote(&self.target.display().to_string());
        let pane = self
            .transport
            .new_session(&self.session_name, &command, start_dir)
            .map_err(|e| HarnessError::Launch {
                target: self.target.display().to_string(),
                message: e.to_string(),
            })?;
        thread::sleep(self.settle_delay);
        info!(
            session = %self.session_name,
            pane = %pane,
            attach = %self.attach_command(),
            "started target in tmux"
        );
        self.lifecycle = Lifecycle::Running(SessionHandle {
            session: self.session_name.clone(),
            pane,
        });
        Ok(())
    }

    fn send_text_input(&mut self, text: &str, all_at_once: bool) -> Result<(), HarnessError> {
        let pane = self.pane("send text input")?;
        if text.is_empty() {
            return Ok(());
        }
        if all_at_once {
            return self.send_literal(pane, text);
        }
        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.send_literal(pane, c.encode_utf8(&mut buf))?;
        }
        Ok(())
    }

    fn send_special_input(&mut self, key: &SpecialKey) -> Result<(), HarnessError> {
        match key.session_encoding() {
            Some(KeyEncoding::DirectCode(code)) => {
                let pane = self.pane("send special input")?;
                let mut buf = [0u8; 4];
                self.send_literal(pane, char::from(code).encode_utf8(&mut buf))
            }
            Some(KeyEncoding::Named(name)) => {
                let pane = self.pane("send special input")?;
                debug!(pane, key = name, "tmux send named key");
                self.transport.send_named(pane, name)?;
                Ok(())
            }
            Some(KeyEncoding::Chord(..)) | None => {
                Err(HarnessError::UnresolvableKey(format!("{key:?}")))
            }
        }
    }

    fn is_running(&mut self) -> bool {
        self.running = match self.probe() {
            Ok(alive) => alive,
            Err(err) => {
                warn!(session = %self.session_name, "tmux liveness query failed: {err}");
                false
            }
        };
        self.running
    }

    fn close(&mut self) -> Result<(), HarnessError> {
        // An unanswerable liveness query still warrants a kill attempt.
        if matches!(self.probe(), Ok(false)) {
            return Ok(());
        }
        let Some(handle) = self.lifecycle.handle() else {
            return Ok(());
        };
        if let Err(err) = self.transport.kill_session(&handle.session) {
            // The session may have died between the probe and the kill.
            if matches!(self.probe(), Ok(false)) {
                return Ok(());
            }
            return Err(err.into());
        }
        info!(session = %self.session_name, "killed tmux session");
        self.lifecycle.stop(self.session_name.clone());
        Ok(())
    }

    fn state(&self) -> ManagerState {
        self.lifecycle.state()
    }

    fn runtime_info(&mut self) -> String {
        match self.transport.list_sessions() {
            Ok(sessions) => format!("[sessions: {}]", sessions.join(", ")),
            Err(err) => format!("[tmux unavailable: {err}]"),
        }
    }
}

impl<T: TmuxTransport> fmt::Display for TmuxManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TmuxManager(socket: {}, session: {}, state: {}, running: {})",
            self.transport.socket_name(),
            self.session_name,
            self.lifecycle.state(),
            self.running
        )
    }
}

impl<T: TmuxTransport> Drop for TmuxManager<T> {
    fn drop(&mut self) {
        if self.lifecycle.handle().is_some() {
            let _ = self.close();
        }
    }
}
