//! Keyboard shortcuts.
//!
//! Bindings are plain data (part of [`EditorConfig`](crate::config::EditorConfig))
//! mapping a [`KeyCombo`] to an [`EditorAction`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::interaction::Modifiers;

/// A key, independent of any windowing toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    /// A printable key, stored upper-cased
    Char(char),
}

impl Key {
    /// Printable keys compare case-insensitively.
    pub fn char(c: char) -> Key {
        Key::Char(c.to_ascii_uppercase())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Escape => f.write_str("Escape"),
            Key::Enter => f.write_str("Enter"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Delete" => Ok(Key::Delete),
            "Backspace" => Ok(Key::Backspace),
            "Escape" => Ok(Key::Escape),
            "Enter" => Ok(Key::Enter),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::char(c)),
                    _ => Err(format!("unknown key '{s}'")),
                }
            }
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// A key plus the modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombo {
    pub key: Key,
    #[serde(default)]
    pub control: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyCombo {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            control: modifiers.control,
            alt: modifiers.alt,
            shift: modifiers.shift,
        }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }

    pub fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers { control: true, ..Modifiers::default() })
    }

    pub fn ctrl_shift(key: Key) -> Self {
        Self::new(key, Modifiers { control: true, shift: true, ..Modifiers::default() })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = Vec::new();
        if self.control {
            terms.push("CTRL".to_string());
        }
        if self.alt {
            terms.push("ALT".to_string());
        }
        if self.shift {
            terms.push("Shift".to_string());
        }
        terms.push(self.key.to_string());
        f.write_str(&terms.join("+"))
    }
}

/// Something a shortcut can ask the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorAction {
    Delete,
    Copy,
    Cut,
    /// Paste at the last known pointer position
    Paste,
    ResetZoom,
    /// Reset zoom and move the canvas origin back to the corner
    ResetView,
    Cancel,
    Save,
    Open,
    Export,
}

impl EditorAction {
    /// Actions that need a file path from the host (a dialog, usually).
    pub fn needs_host(self) -> bool {
        matches!(self, EditorAction::Open | EditorAction::Save | EditorAction::Export)
    }
}

/// A named shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybind {
    pub name: String,
    pub combo: KeyCombo,
    pub action: EditorAction,
}

impl Keybind {
    pub fn new(name: &str, combo: KeyCombo, action: EditorAction) -> Self {
        Self {
            name: name.to_string(),
            combo,
            action,
        }
    }
}

impl fmt::Display for Keybind {
    /// `Copy (CTRL+C)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.combo)
    }
}

/// The stock shortcut set.
pub fn default_keybinds() -> Vec<Keybind> {
    vec![
        Keybind::new("Delete", KeyCombo::plain(Key::Delete), EditorAction::Delete),
        Keybind::new("Copy", KeyCombo::ctrl(Key::Char('C')), EditorAction::Copy),
        Keybind::new("Cut", KeyCombo::ctrl(Key::Char('X')), EditorAction::Cut),
        Keybind::new("Paste", KeyCombo::ctrl(Key::Char('V')), EditorAction::Paste),
        Keybind::new("Reset Zoom", KeyCombo::ctrl(Key::Char('R')), EditorAction::ResetZoom),
        Keybind::new("Reset View", KeyCombo::ctrl_shift(Key::Char('R')), EditorAction::ResetView),
        Keybind::new("Cancel", KeyCombo::plain(Key::Escape), EditorAction::Cancel),
        Keybind::new("Save", KeyCombo::ctrl(Key::Char('S')), EditorAction::Save),
        Keybind::new("Open", KeyCombo::ctrl(Key::Char('O')), EditorAction::Open),
        Keybind::new("Export", KeyCombo::ctrl(Key::Char('E')), EditorAction::Export),
    ]
}

/// Find the action bound to `combo`. Modifiers must match exactly.
pub fn lookup(keybinds: &[Keybind], combo: &KeyCombo) -> Option<EditorAction> {
    keybinds.iter().find(|bind| bind.combo == *combo).map(|bind| bind.action)
}
