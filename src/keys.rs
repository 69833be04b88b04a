//! Key intents: the vocabulary of input events a harness can deliver.
//!
//! A [`SpecialKey`] may carry up to three encodings at once (a direct control
//! code, a symbolic name, a modifier chord). Backends never inspect the raw
//! fields; they ask for the one encoding they prefer through
//! [`SpecialKey::session_encoding`] or [`SpecialKey::injection_encoding`] and
//! match exhaustively on the returned [`KeyEncoding`].

use std::borrow::Cow;
use std::fmt;

use crate::error::KeyParseError;

/// Modifier held down while a literal character is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    /// Lowercase name used by OS-level hotkey primitives.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-text key with every encoding it is known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialKey {
    /// Single byte delivered verbatim to the terminal (e.g. 27 for Escape).
    pub code: Option<u8>,
    /// Symbolic key name in tmux notation (`Escape`, `Up`, `M-x`).
    pub name: Option<Cow<'static, str>>,
    /// Modifier plus literal character (e.g. ctrl + `c`).
    pub chord: Option<(Modifier, char)>,
}

/// One concrete way to deliver a [`SpecialKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding<'a> {
    DirectCode(u8),
    Named(&'a str),
    Chord(Modifier, char),
}

impl SpecialKey {
    /// Key known only by name, optionally with a direct code.
    pub const fn named(code: Option<u8>, name: &'static str) -> Self {
        Self {
            code,
            name: Some(Cow::Borrowed(name)),
            chord: None,
        }
    }

    /// Control chord; ASCII letters also carry their control code.
    ///
    /// `const`, so ctrl hotkeys can be named the same way as the other keys:
    ///
    /// ```
    /// use spf_harness::keys::SpecialKey;
    ///
    /// const KEY_CTRL_W: SpecialKey = SpecialKey::ctrl('w');
    /// assert_eq!(KEY_CTRL_W.code, Some(23));
    /// ```
    pub const fn ctrl(c: char) -> Self {
        let c = c.to_ascii_lowercase();
        let code = if c.is_ascii_alphabetic() {
            Some((c as u8) & 0x1f)
        } else {
            None
        };
        Self {
            code,
            name: None,
            chord: Some((Modifier::Ctrl, c)),
        }
    }

    /// Alt chord; carries the tmux `M-` name so session backends can send it.
    pub fn alt(c: char) -> Self {
        Self {
            code: None,
            name: Some(Cow::Owned(format!("M-{c}"))),
            chord: Some((Modifier::Alt, c)),
        }
    }

    /// Preferred encoding for pane-scoped injection: direct code, then name.
    pub fn session_encoding(&self) -> Option<KeyEncoding<'_>> {
        if let Some(code) = self.code {
            return Some(KeyEncoding::DirectCode(code));
        }
        self.name.as_deref().map(KeyEncoding::Named)
    }

    /// Preferred encoding for OS-level injection: chord, then name.
    pub fn injection_encoding(&self) -> Option<KeyEncoding<'_>> {
        if let Some((modifier, c)) = self.chord {
            return Some(KeyEncoding::Chord(modifier, c));
        }
        self.name.as_deref().map(KeyEncoding::Named)
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((modifier, c)) = self.chord {
            return write!(f, "{modifier}+{c}");
        }
        match (&self.name, self.code) {
            (Some(name), _) => f.write_str(name),
            (None, Some(code)) => write!(f, "<code {code}>"),
            (None, None) => f.write_str("<empty key>"),
        }
    }
}

/// One input event: a span of text or a special key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIntent {
    Text(String),
    Special(SpecialKey),
}

impl From<SpecialKey> for KeyIntent {
    fn from(key: SpecialKey) -> Self {
        Self::Special(key)
    }
}

pub const KEY_ESC: SpecialKey = SpecialKey::named(Some(27), "Escape");
pub const KEY_ENTER: SpecialKey = SpecialKey::named(Some(13), "Enter");
pub const KEY_BACKSPACE: SpecialKey = SpecialKey::named(Some(8), "BSpace");
pub const KEY_TAB: SpecialKey = SpecialKey::named(Some(9), "Tab");
pub const KEY_SPACE: SpecialKey = SpecialKey::named(Some(32), "Space");
pub const KEY_DELETE: SpecialKey = SpecialKey::named(None, "DC");
pub const KEY_UP: SpecialKey = SpecialKey::named(None, "Up");
pub const KEY_DOWN: SpecialKey = SpecialKey::named(None, "Down");
pub const KEY_LEFT: SpecialKey = SpecialKey::named(None, "Left");
pub const KEY_RIGHT: SpecialKey = SpecialKey::named(None, "Right");
pub const KEY_HOME: SpecialKey = SpecialKey::named(None, "Home");
pub const KEY_END: SpecialKey = SpecialKey::named(None, "End");
pub const KEY_PAGE_UP: SpecialKey = SpecialKey::named(None, "PageUp");
pub const KEY_PAGE_DOWN: SpecialKey = SpecialKey::named(None, "PageDown");
pub const KEY_SHIFT_UP: SpecialKey = SpecialKey::named(None, "S-Up");
pub const KEY_SHIFT_DOWN: SpecialKey = SpecialKey::named(None, "S-Down");
pub const KEY_SHIFT_LEFT: SpecialKey = SpecialKey::named(None, "S-Left");
pub const KEY_SHIFT_RIGHT: SpecialKey = SpecialKey::named(None, "S-Right");

/// Parse hotkey notation as written in the target's hotkey file
/// (`esc`, `enter`, `ctrl+w`, `shift+left`, `q`).
pub fn parse_hotkey(raw: &str) -> Result<KeyIntent, KeyParseError> {
    let err = || KeyParseError(raw.to_string());
    if raw.is_empty() {
        return Err(err());
    }
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyIntent::Text(c.to_string()));
    }

    let lower = raw.to_ascii_lowercase();
    if let Some((modifier, rest)) = lower.split_once('+') {
        let key = match (modifier, single_char(rest)) {
            ("ctrl", Some(c)) => SpecialKey::ctrl(c),
            ("alt", Some(c)) => SpecialKey::alt(c),
            ("shift", _) => match rest {
                "up" => KEY_SHIFT_UP,
                "down" => KEY_SHIFT_DOWN,
                "left" => KEY_SHIFT_LEFT,
                "right" => KEY_SHIFT_RIGHT,
                _ => return Err(err()),
            },
            _ => return Err(err()),
        };
        return Ok(KeyIntent::Special(key));
    }

    let key = match lower.as_str() {
        "esc" | "escape" => KEY_ESC,
        "enter" | "return" => KEY_ENTER,
        "backspace" => KEY_BACKSPACE,
        "tab" => KEY_TAB,
        "space" => KEY_SPACE,
        "delete" | "del" => KEY_DELETE,
        "up" => KEY_UP,
        "down" => KEY_DOWN,
        "left" => KEY_LEFT,
        "right" => KEY_RIGHT,
        "home" => KEY_HOME,
        "end" => KEY_END,
        "pgup" | "pageup" => KEY_PAGE_UP,
        "pgdown" | "pagedown" => KEY_PAGE_DOWN,
        _ => return Err(err()),
    };
    Ok(KeyIntent::Special(key))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
