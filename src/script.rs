//! Input script: the step language driven by the `spf-harness` binary.
//!
//! Each step is one `kind:payload` word:
//!
//! | step            | effect                                   |
//! |-----------------|------------------------------------------|
//! | `text:<s>`      | type `s` in a single injection           |
//! | `chars:<s>`     | type `s` one character at a time         |
//! | `key:<hotkey>`  | send one hotkey (`esc`, `ctrl+w`, `q`)   |
//! | `wait:<ms>`     | sleep for `ms` milliseconds              |

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::HarnessError;
use crate::keys::{parse_hotkey, KeyIntent};
use crate::manager::TargetManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Text(String),
    Chars(String),
    Key(KeyIntent),
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "text:{text}"),
            Self::Chars(text) => write!(f, "chars:{text}"),
            Self::Key(KeyIntent::Text(text)) => write!(f, "key:{text}"),
            Self::Key(KeyIntent::Special(key)) => write!(f, "key:{key}"),
            Self::Wait(delay) => write!(f, "wait:{}", delay.as_millis()),
        }
    }
}

/// Parse one step word. Usable directly as a clap `value_parser`.
pub fn parse_step(raw: &str) -> Result<Step, String> {
    let Some((kind, payload)) = raw.split_once(':') else {
        return Err(format!(
            "step `{raw}` has no kind; expected text:, chars:, key: or wait:"
        ));
    };
    match kind {
        "text" => Ok(Step::Text(payload.to_string())),
        "chars" => Ok(Step::Chars(payload.to_string())),
        "key" => parse_hotkey(payload)
            .map(Step::Key)
            .map_err(|e| e.to_string()),
        "wait" => payload
            .trim()
            .parse::<u64>()
            .map(|ms| Step::Wait(Duration::from_millis(ms)))
            .map_err(|_| format!("invalid wait `{payload}`: expected milliseconds")),
        other => Err(format!(
            "unknown step kind `{other}`; expected text, chars, key or wait"
        )),
    }
}

/// Run `steps` in order, stopping at the first failure.
pub fn run_steps(manager: &mut dyn TargetManager, steps: &[Step]) -> Result<(), HarnessError> {
    for (idx, step) in steps.iter().enumerate() {
        debug!(step = idx, %step, "running step");
        match step {
            Step::Text(text) => manager.send_text_input(text, true)?,
            Step::Chars(text) => manager.send_text_input(text, false)?,
            Step::Key(intent) => manager.send_intent(intent)?,
            Step::Wait(delay) => thread::sleep(*delay),
        }
    }
    Ok(())
}
