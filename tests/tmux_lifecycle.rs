//! Live tmux lifecycle tests for the session backend.
//!
//! Ignored by default: they need a `tmux` binary and start real sessions.
//! Each test uses its own `-L` socket, killed on drop, so runs never touch
//! the user's tmux server. Targets are `cat` and `sh` instead of spf.

use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use spf_harness::config::TmuxConfig;
use spf_harness::keys::{KEY_ENTER, KEY_ESC};
use spf_harness::manager::{ManagerState, TargetManager, TmuxManager};

/// Private tmux server; killed when dropped.
struct TmuxSocket {
    name: String,
}

impl TmuxSocket {
    fn new(label: &str) -> Self {
        Self {
            name: format!("spf-harness-{label}-{}", unique_suffix()),
        }
    }

    fn settings(&self, session: &str) -> TmuxConfig {
        TmuxConfig {
            socket_name: self.name.clone(),
            session_name: session.to_string(),
            settle_delay_ms: 200,
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new("tmux")
            .arg("-L")
            .arg(&self.name)
            .args(args)
            .output()
            .map_err(|e| format!("failed to run tmux {args:?}: {e}"))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(format!(
                "tmux {args:?} failed with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ))
        }
    }

    fn session_count(&self, session: &str) -> usize {
        self.run(&["list-sessions", "-F", "#{session_name}"])
            .map(|out| out.lines().filter(|line| *line == session).count())
            .unwrap_or(0)
    }

    fn capture(&self, session: &str) -> String {
        let target = format!("={session}");
        self.run(&["capture-pane", "-p", "-J", "-t", &target])
            .unwrap_or_default()
    }

    /// Poll the pane until `needle` shows up.
    fn wait_for(&self, session: &str, needle: &str) -> Result<String, String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let pane = self.capture(session);
            if pane.contains(needle) {
                return Ok(pane);
            }
            if Instant::now() >= deadline {
                return Err(format!("`{needle}` never appeared; pane:\n{pane}"));
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for TmuxSocket {
    fn drop(&mut self) {
        let _ = self.run(&["kill-server"]);
    }
}

fn unique_suffix() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}-{now}", std::process::id())
}

#[test]
#[ignore = "requires tmux"]
fn start_inject_and_close_round_trip() {
    let socket = TmuxSocket::new("round-trip");
    let mut manager = TmuxManager::new("cat", &socket.settings("spf_session"));

    manager.start(None).expect("start");
    assert!(manager.is_running());
    assert_eq!(socket.session_count("spf_session"), 1);

    manager.send_text_input("hello", true).expect("all at once");
    manager.send_text_input("world", false).expect("per char");
    socket
        .wait_for("spf_session", "helloworld")
        .expect("text reaches pane");

    manager.send_special_input(&KEY_ESC).expect("escape");
    assert!(manager.is_running(), "escape must not end cat");

    manager.close().expect("close");
    assert!(!manager.is_running());
    assert_eq!(manager.state(), ManagerState::Stopped);
    assert_eq!(socket.session_count("spf_session"), 0);
    manager.close().expect("second close is a no-op");
}

#[test]
#[ignore = "requires tmux"]
fn dash_and_semicolon_text_arrive_verbatim_in_both_modes() {
    let socket = TmuxSocket::new("verbatim");
    let mut manager = TmuxManager::new("cat", &socket.settings("spf_session"));
    manager.start(None).expect("start");

    manager.send_text_input("-x;", true).expect("all at once");
    manager.send_text_input("|", true).expect("marker");
    manager.send_text_input("-x;", false).expect("per char");
    manager.send_text_input(";", true).expect("lone semicolon");

    socket
        .wait_for("spf_session", "-x;|-x;;")
        .expect("text reaches pane unchanged");
    manager.close().expect("close");
}

#[test]
#[ignore = "requires tmux"]
fn external_kill_is_observed_and_close_succeeds() {
    let socket = TmuxSocket::new("external-kill");
    let mut manager = TmuxManager::new("cat", &socket.settings("spf_session"));
    manager.start(None).expect("start");

    socket
        .run(&["kill-session", "-t", "=spf_session"])
        .expect("external kill");

    assert!(!manager.is_running());
    assert_eq!(manager.state(), ManagerState::Stopped);
    manager.close().expect("close after external kill");
}

#[test]
#[ignore = "requires tmux"]
fn start_dir_becomes_working_directory() {
    let socket = TmuxSocket::new("start-dir");
    let dir: PathBuf = std::env::temp_dir()
        .canonicalize()
        .unwrap_or_else(|_| std::env::temp_dir());
    let mut manager = TmuxManager::new("sh", &socket.settings("spf_session"));
    manager.start(Some(&dir)).expect("start");

    manager.send_text_input("pwd", true).expect("type");
    manager.send_special_input(&KEY_ENTER).expect("enter");

    socket
        .wait_for("spf_session", &dir.display().to_string())
        .expect("pwd prints start dir");
    manager.close().expect("close");
}

#[test]
#[ignore = "requires tmux"]
fn session_name_is_reusable_after_close() {
    let socket = TmuxSocket::new("reuse");
    let settings = socket.settings("spf_session");

    let mut first = TmuxManager::new("cat", &settings);
    first.start(None).expect("first start");
    first.close().expect("first close");

    let mut second = TmuxManager::new("cat", &settings);
    second.start(None).expect("second start");
    assert!(second.is_running());
    assert_eq!(socket.session_count("spf_session"), 1);
    second.close().expect("second close");
}

#[test]
#[ignore = "requires tmux"]
fn dropping_a_running_manager_kills_its_session() {
    let socket = TmuxSocket::new("drop");
    {
        let mut manager = TmuxManager::new("cat", &socket.settings("spf_session"));
        manager.start(None).expect("start");
        assert_eq!(socket.session_count("spf_session"), 1);
    }
    assert_eq!(socket.session_count("spf_session"), 0);
}

#[test]
#[ignore = "requires tmux"]
fn missing_target_never_leaves_a_running_manager() {
    let socket = TmuxSocket::new("missing");
    let mut manager = TmuxManager::new(
        "/nonexistent/spf-harness-target",
        &socket.settings("spf_session"),
    );
    // tmux creates the session even when the command fails, so the pane dies
    // right after start; liveness must report that once it is gone.
    if manager.start(None).is_ok() {
        thread::sleep(Duration::from_millis(300));
        manager.close().expect("close");
    }
    assert!(!manager.is_running());
}
