//! Discrete key presses delivered to a placement session.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Keys a placement session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Sets corners or places under the cursor.
    Space,
    /// Confirms.
    Enter,
    /// Clears the selection or leaves the session.
    Escape,
    /// Cycles shapes, or obstacles during review.
    Tab,
    /// Rotates the placeable.
    R,
    /// Undoes with Ctrl.
    Z,
    /// Redoes with Ctrl.
    Y,
    /// Next obstacle during review.
    N,
    /// Previous obstacle during review.
    P,
    /// Cursor toward decreasing z.
    Up,
    /// Cursor toward increasing z.
    Down,
    /// Cursor toward decreasing x.
    Left,
    /// Cursor toward increasing x.
    Right,
}

impl Key {
    const NAMES: [(Self, &'static str); 13] = [
        (Self::Space, "space"),
        (Self::Enter, "enter"),
        (Self::Escape, "escape"),
        (Self::Tab, "tab"),
        (Self::R, "r"),
        (Self::Z, "z"),
        (Self::Y, "y"),
        (Self::N, "n"),
        (Self::P, "p"),
        (Self::Up, "up"),
        (Self::Down, "down"),
        (Self::Left, "left"),
        (Self::Right, "right"),
    ];

    /// Lower-case name used in key scripts.
    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(key, _)| *key == self)
            .map_or("", |(_, name)| name)
    }

    /// Cursor displacement for arrow keys.
    #[must_use]
    pub const fn direction(self) -> Option<(i32, i32)> {
        match self {
            Self::Up => Some((0, -1)),
            Self::Down => Some((0, 1)),
            Self::Left => Some((-1, 0)),
            Self::Right => Some((1, 0)),
            _ => None,
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lower = text.trim().to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "return" => "enter",
            "esc" => "escape",
            other => other,
        };
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == canonical)
            .map(|(key, _)| *key)
            .ok_or_else(|| KeyParseError::UnknownKey(text.trim().to_owned()))
    }
}

/// Modifier keys held during a press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub ctrl: bool,
}

/// One key-down event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// Key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// A press without modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                shift: false,
                ctrl: false,
            },
        }
    }

    /// A press with Shift held.
    #[must_use]
    pub const fn shift(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                shift: true,
                ctrl: false,
            },
        }
    }

    /// A press with Control held.
    #[must_use]
    pub const fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                shift: false,
                ctrl: true,
            },
        }
    }

    /// Reports whether no modifier is held.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !self.modifiers.shift && !self.modifiers.ctrl
    }
}

/// Errors raised while parsing key names such as `ctrl+shift+z`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// Nothing to parse.
    #[error("empty key")]
    Empty,
    /// The key name is not recognised.
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    /// A modifier name is not recognised.
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
}

impl FromStr for KeyPress {
    type Err = KeyParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some(last) if !last.is_empty() => last.parse::<Key>()?,
            _ => return Err(KeyParseError::Empty),
        };
        let mut modifiers = Modifiers::default();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                _ => return Err(KeyParseError::UnknownModifier(part.to_owned())),
            }
        }
        Ok(Self { key, modifiers })
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        f.write_str(self.key.name())
    }
}
