//! Input-injection manager: plain subprocess plus OS-level keystrokes.
//!
//! Works wherever a terminal window can be focused, but every keystroke goes
//! to the focused window. Keep the target's terminal focused for the whole
//! run and do not use the machine interactively meanwhile.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::InjectionConfig;
use crate::error::HarnessError;
use crate::keys::{KeyEncoding, SpecialKey};
use crate::transport::input::{OsInput, XdotoolInput};
use crate::transport::process::{ProcessLauncher, SystemLauncher, TargetProcess};

use super::{Lifecycle, ManagerState, TargetManager};

pub struct InjectionManager<L: ProcessLauncher = SystemLauncher, I: OsInput = XdotoolInput> {
    target: PathBuf,
    settle_delay: Duration,
    warmup_keystroke: String,
    launcher: L,
    input: I,
    lifecycle: Lifecycle<L::Process>,
    /// Last liveness answer. Written only by `is_running`.
    running: bool,
}

impl InjectionManager {
    pub fn new(target: impl Into<PathBuf>, settings: &InjectionConfig) -> Self {
        Self::with_backends(target, settings, SystemLauncher, XdotoolInput::default())
    }
}

impl<L: ProcessLauncher, I: OsInput> InjectionManager<L, I> {
    pub fn with_backends(
        target: impl Into<PathBuf>,
        settings: &InjectionConfig,
        launcher: L,
        input: I,
    ) -> Self {
        Self {
            target: target.into(),
            settle_delay: settings.settle_delay(),
            warmup_keystroke: settings.warmup_keystroke.clone(),
            launcher,
            input,
            lifecycle: Lifecycle::NotStarted,
            running: false,
        }
    }

    fn write_text(&self, text: &str, all_at_once: bool) -> Result<(), HarnessError> {
        if all_at_once {
            debug!(text = ?text, "os input write");
            self.input.write_text(text)?;
            return Ok(());
        }
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let c = c.encode_utf8(&mut buf);
            debug!(text = ?c, "os input write");
            self.input.write_text(c)?;
        }
        Ok(())
    }
}

impl<L: ProcessLauncher, I: OsInput> TargetManager for InjectionManager<L, I> {
    fn start(&mut self, start_dir: Option<&Path>) -> Result<(), HarnessError> {
        self.lifecycle.ensure_startable()?;
        let launch_error = |message: String| HarnessError::Launch {
            target: self.target.display().to_string(),
            message,
        };
        let args = start_dir
            .map(|dir| vec![OsString::from(dir)])
            .unwrap_or_default();
        let mut process = self
            .launcher
            .spawn(&self.target, &args)
            .map_err(|e| launch_error(e.to_string()))?;
        thread::sleep(self.settle_delay);

        // The target drops the first keystroke it receives after launch.
        if let Err(err) = self.write_text(&self.warmup_keystroke, false) {
            let _ = process.terminate();
            let _ = process.wait();
            return Err(launch_error(format!("warm-up keystroke failed: {err}")));
        }
        info!(pid = process.id(), target = %self.target.display(), "started target process");
        self.lifecycle = Lifecycle::Running(process);
        Ok(())
    }

    fn send_text_input(&mut self, text: &str, all_at_once: bool) -> Result<(), HarnessError> {
        if text.is_empty() {
            return Ok(());
        }
        self.write_text(text, all_at_once)
    }

    fn send_special_input(&mut self, key: &SpecialKey) -> Result<(), HarnessError> {
        match key.injection_encoding() {
            Some(KeyEncoding::Chord(modifier, c)) => {
                debug!(%modifier, key = %c, "os input hotkey");
                self.input.hotkey(modifier, c)?;
            }
            Some(KeyEncoding::Named(name)) => {
                let name = name.to_lowercase();
                debug!(key = %name, "os input press");
                self.input.press_key(&name)?;
            }
            Some(KeyEncoding::DirectCode(_)) | None => {
                return Err(HarnessError::UnresolvableKey(format!("{key:?}")));
            }
        }
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        let polled = match self.lifecycle.handle_mut() {
            Some(process) => process.try_wait().map(|exit| (process.id(), exit)),
            None => {
                self.running = false;
                return false;
            }
        };
        self.running = match polled {
            Ok((_, None)) => true,
            Ok((pid, Some(exit))) => {
                info!(pid, %exit, "target process exited");
                self.lifecycle
                    .stop(format!("[Stopped, last PID : {pid}, exit : {exit}]"));
                false
            }
            Err(err) => {
                warn!("target process poll failed: {err}");
                false
            }
        };
        self.running
    }

    fn close(&mut self) -> Result<(), HarnessError> {
        let Some(process) = self.lifecycle.handle_mut() else {
            return Ok(());
        };
        process.terminate()?;
        let pid = process.id();
        let exit = match process.wait() {
            Ok(exit) => exit.to_string(),
            Err(err) => {
                warn!(pid, "failed to reap target process: {err}");
                "unknown".to_string()
            }
        };
        info!(pid, %exit, "terminated target process");
        self.lifecycle
            .stop(format!("[Stopped, last PID : {pid}, exit : {exit}]"));
        Ok(())
    }

    fn state(&self) -> ManagerState {
        self.lifecycle.state()
    }

    fn runtime_info(&mut self) -> String {
        match &mut self.lifecycle {
            Lifecycle::NotStarted => "[No process]".to_string(),
            Lifecycle::Running(process) => {
                let poll = match process.try_wait() {
                    Ok(None) => "None".to_string(),
                    Ok(Some(exit)) => exit.to_string(),
                    Err(err) => format!("error: {err}"),
                };
                format!("[PID : {}, poll : {poll}]", process.id())
            }
            Lifecycle::Stopped { last } => last.clone(),
        }
    }
}

impl<L: ProcessLauncher, I: OsInput> fmt::Display for InjectionManager<L, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pid = self
            .lifecycle
            .handle()
            .map(|process| process.id().to_string())
            .unwrap_or_else(|| "none".to_string());
        write!(
            f,
            "InjectionManager(target: {}, pid: {pid}, state: {}, running: {})",
            self.target.display(),
            self.lifecycle.state(),
            self.running
        )
    }
}

impl<L: ProcessLauncher, I: OsInput> Drop for InjectionManager<L, I> {
    fn drop(&mut self) {
        if self.lifecycle.handle().is_some() {
            let _ = self.close();
        }
    }
}
