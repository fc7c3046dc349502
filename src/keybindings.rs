// ═══════════════════════════════════════════════════════════════════════════
// KEYBINDINGS SYSTEM
// ═══════════════════════════════════════════════════════════════════════════

use std::collections::{HashMap, HashSet};
use std::fmt;

use eframe::egui;
use egui::Key;

/// All bindable actions in the application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindableAction {
    ToolPencil,
    ToolEraser,
    ToolBucket,
    ToolPicker,
    Undo,
    ViewZoomIn,
    ViewZoomOut,
}

impl BindableAction {
    pub const ALL: [BindableAction; 7] = [
        BindableAction::ToolPencil,
        BindableAction::ToolEraser,
        BindableAction::ToolBucket,
        BindableAction::ToolPicker,
        BindableAction::Undo,
        BindableAction::ViewZoomIn,
        BindableAction::ViewZoomOut,
    ];

    pub fn config_name(self) -> &'static str {
        match self {
            BindableAction::ToolPencil => "ToolPencil",
            BindableAction::ToolEraser => "ToolEraser",
            BindableAction::ToolBucket => "ToolBucket",
            BindableAction::ToolPicker => "ToolPicker",
            BindableAction::Undo => "Undo",
            BindableAction::ViewZoomIn => "ViewZoomIn",
            BindableAction::ViewZoomOut => "ViewZoomOut",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.config_name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("no key in combo {0:?}")]
    MissingKey(String),
    #[error("unknown key name {0:?}")]
    UnknownKey(String),
}

/// A key plus whether the command modifier (Ctrl, or Cmd on macOS) must be held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    pub command: bool,
    pub key: Key,
}

impl KeyCombo {
    pub fn key(key: Key) -> Self {
        Self { command: false, key }
    }

    pub fn command_key(key: Key) -> Self {
        Self { command: true, key }
    }

    /// Serialize to config string, e.g. `ctrl+key:Z`.
    pub fn to_config_string(&self) -> String {
        if self.command {
            format!("ctrl+key:{}", key_name(self.key))
        } else {
            format!("key:{}", key_name(self.key))
        }
    }

    /// Deserialize from config string
    pub fn from_config_string(s: &str) -> Result<Self, KeyParseError> {
        let mut command = false;
        let mut key = None;
        for part in s.split('+') {
            let part = part.trim();
            if part == "ctrl" {
                command = true;
            } else if let Some(name) = part.strip_prefix("key:") {
                key = Some(parse_key_name(name).ok_or_else(|| KeyParseError::UnknownKey(name.to_string()))?);
            }
        }
        let key = key.ok_or_else(|| KeyParseError::MissingKey(s.to_string()))?;
        Ok(Self { command, key })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.command {
            write!(f, "Ctrl+{}", key_name(self.key))
        } else {
            f.write_str(key_name(self.key))
        }
    }
}

pub fn key_name(key: Key) -> &'static str {
    match key {
        Key::A => "A", Key::B => "B", Key::C => "C", Key::D => "D", Key::E => "E",
        Key::F => "F", Key::G => "G", Key::H => "H", Key::I => "I", Key::J => "J",
        Key::K => "K", Key::L => "L", Key::M => "M", Key::N => "N", Key::O => "O",
        Key::P => "P", Key::Q => "Q", Key::R => "R", Key::S => "S", Key::T => "T",
        Key::U => "U", Key::V => "V", Key::W => "W", Key::X => "X", Key::Y => "Y",
        Key::Z => "Z",
        Key::Num0 => "0", Key::Num1 => "1", Key::Num2 => "2", Key::Num3 => "3",
        Key::Num4 => "4", Key::Num5 => "5", Key::Num6 => "6", Key::Num7 => "7",
        Key::Num8 => "8", Key::Num9 => "9",
        Key::Minus => "-",
        Key::PlusEquals => "=",
        _ => "?",
    }
}

pub fn parse_key_name(name: &str) -> Option<Key> {
    match name {
        "A" => Some(Key::A), "B" => Some(Key::B), "C" => Some(Key::C), "D" => Some(Key::D),
        "E" => Some(Key::E), "F" => Some(Key::F), "G" => Some(Key::G), "H" => Some(Key::H),
        "I" => Some(Key::I), "J" => Some(Key::J), "K" => Some(Key::K), "L" => Some(Key::L),
        "M" => Some(Key::M), "N" => Some(Key::N), "O" => Some(Key::O), "P" => Some(Key::P),
        "Q" => Some(Key::Q), "R" => Some(Key::R), "S" => Some(Key::S), "T" => Some(Key::T),
        "U" => Some(Key::U), "V" => Some(Key::V), "W" => Some(Key::W), "X" => Some(Key::X),
        "Y" => Some(Key::Y), "Z" => Some(Key::Z),
        "0" => Some(Key::Num0), "1" => Some(Key::Num1), "2" => Some(Key::Num2),
        "3" => Some(Key::Num3), "4" => Some(Key::Num4), "5" => Some(Key::Num5),
        "6" => Some(Key::Num6), "7" => Some(Key::Num7), "8" => Some(Key::Num8),
        "9" => Some(Key::Num9),
        "-" => Some(Key::Minus),
        "=" | "+" => Some(Key::PlusEquals),
        _ => None,
    }
}

// ============================================================================
// BINDINGS TABLE
// ============================================================================

#[derive(Clone, Debug)]
pub struct KeyBindings {
    bindings: HashMap<BindableAction, KeyCombo>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use BindableAction::*;
        let mut map = HashMap::new();
        map.insert(ToolPencil,  KeyCombo::key(Key::P));
        map.insert(ToolEraser,  KeyCombo::key(Key::E));
        map.insert(ToolBucket,  KeyCombo::key(Key::B));
        map.insert(ToolPicker,  KeyCombo::key(Key::I));
        map.insert(Undo,        KeyCombo::command_key(Key::Z));
        map.insert(ViewZoomIn,  KeyCombo::command_key(Key::PlusEquals));
        map.insert(ViewZoomOut, KeyCombo::command_key(Key::Minus));
        Self { bindings: map }
    }
}

impl KeyBindings {
    pub fn get(&self, action: BindableAction) -> Option<&KeyCombo> {
        self.bindings.get(&action)
    }

    pub fn set(&mut self, action: BindableAction, combo: KeyCombo) {
        self.bindings.insert(action, combo);
    }

    /// Action whose combo is completed by `key` going down, given the other held keys.
    pub fn action_for_press(&self, held: &HeldKeys, key: Key) -> Option<BindableAction> {
        BindableAction::ALL.into_iter().find(|action| {
            self.bindings
                .get(action)
                .is_some_and(|c| c.key == key && c.command == held.command_held())
        })
    }

    /// Action whose combo is completed by the command modifier going down while its
    /// key is already held.
    pub fn action_for_command_press(&self, held: &HeldKeys) -> Option<BindableAction> {
        BindableAction::ALL.into_iter().find(|action| {
            self.bindings
                .get(action)
                .is_some_and(|c| c.command && held.is_held(c.key))
        })
    }

    /// Serialize all bindings for config file
    pub fn to_config_lines(&self) -> Vec<String> {
        BindableAction::ALL
            .iter()
            .filter_map(|action| {
                self.bindings
                    .get(action)
                    .map(|combo| format!("key.{}={}", action.config_name(), combo.to_config_string()))
            })
            .collect()
    }

    /// Load a single keybind line from config. Unknown actions or bad combos are ignored.
    pub fn load_config_line(&mut self, action_name: &str, combo_str: &str) -> bool {
        let Some(action) = BindableAction::from_config_name(action_name) else {
            return false;
        };
        match KeyCombo::from_config_string(combo_str) {
            Ok(combo) => {
                self.bindings.insert(action, combo);
                true
            }
            Err(e) => {
                log_warn!("Ignoring keybinding for {}: {}", action_name, e);
                false
            }
        }
    }
}

// ============================================================================
// HELD KEYS - per-key pressed state
// ============================================================================

/// Tracks which keys are currently down. A press of an already-held key
/// (auto-repeat) is not reported as fresh.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    keys: HashSet<Key>,
    command: bool,
}

impl HeldKeys {
    /// Returns `true` if the key was not already held.
    pub fn press(&mut self, key: Key) -> bool {
        self.keys.insert(key)
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Update the command modifier; returns `true` on a fresh press.
    pub fn set_command(&mut self, held: bool) -> bool {
        let fresh = held && !self.command;
        self.command = held;
        fresh
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn command_held(&self) -> bool {
        self.command
    }

    /// Forget everything, e.g. when the window loses focus and releases go missing.
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.command = false;
    }
}
