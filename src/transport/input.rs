//! OS-level synthetic keyboard input.
//!
//! Events go to whichever window holds input focus, not to a process handle,
//! so nothing else may be used interactively while a harness run is active.

use std::borrow::Cow;

use crate::error::TransportError;
use crate::keys::Modifier;

use super::{ensure_success, run_process};

/// Keyboard synthesis primitives acting on the focused window.
pub trait OsInput {
    /// Type `text` as a sequence of key presses.
    fn write_text(&self, text: &str) -> Result<(), TransportError>;
    /// Press and release one key given its lowercase name (`escape`, `up`).
    fn press_key(&self, name: &str) -> Result<(), TransportError>;
    /// Press `c` while holding `modifier`.
    fn hotkey(&self, modifier: Modifier, c: char) -> Result<(), TransportError>;
}

/// Production input backed by the `xdotool` binary (X11).
#[derive(Debug, Clone)]
pub struct XdotoolInput {
    program: String,
}

impl Default for XdotoolInput {
    fn default() -> Self {
        Self {
            program: "xdotool".to_string(),
        }
    }
}

impl XdotoolInput {
    fn run(&self, args: Vec<String>) -> Result<(), TransportError> {
        let output = run_process(&self.program, &args)?;
        ensure_success(output, &self.program, &args)?;
        Ok(())
    }
}

impl OsInput for XdotoolInput {
    fn write_text(&self, text: &str) -> Result<(), TransportError> {
        self.run(vec!["type".into(), "--".into(), text.into()])
    }

    fn press_key(&self, name: &str) -> Result<(), TransportError> {
        self.run(vec!["key".into(), "--".into(), x_keysym(name).into_owned()])
    }

    fn hotkey(&self, modifier: Modifier, c: char) -> Result<(), TransportError> {
        self.run(vec!["key".into(), "--".into(), format!("{modifier}+{c}")])
    }
}

/// Map a lowercase key name (tmux or pyautogui style) to an X keysym.
pub(crate) fn x_keysym(name: &str) -> Cow<'_, str> {
    for (prefix, modifier) in [("s-", "shift"), ("m-", "alt"), ("c-", "ctrl")] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if !rest.is_empty() {
                return Cow::Owned(format!("{modifier}+{}", x_keysym(rest)));
            }
        }
    }
    let keysym = match name {
        "escape" | "esc" => "Escape",
        "enter" | "return" => "Return",
        "bspace" | "backspace" => "BackSpace",
        "tab" => "Tab",
        "space" => "space",
        "dc" | "delete" | "del" => "Delete",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        "home" => "Home",
        "end" => "End",
        "ppage" | "pageup" | "pgup" => "Prior",
        "npage" | "pagedown" | "pgdn" => "Next",
        _ => {
            if let Some(n) = name.strip_prefix('f').filter(|n| n.parse::<u8>().is_ok()) {
                return Cow::Owned(format!("F{n}"));
            }
            return Cow::Borrowed(name);
        }
    };
    Cow::Borrowed(keysym)
}
