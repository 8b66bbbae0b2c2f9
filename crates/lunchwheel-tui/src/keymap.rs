use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::action::{Action, ScreenKind};
use crate::config::KeybindingConfig;

/// A parsed key string such as "Ctrl+c", "Space" or "F3".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Parse a binding string. Modifiers and key names are case-insensitive;
    /// a single character is taken literally.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        // "+" on its own, or as the key after a modifier ("Ctrl++")
        let (mods_part, key_part) = match s.strip_suffix("++") {
            Some(rest) => (Some(rest), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        if let Some(mods) = mods_part {
            for m in mods.split('+') {
                match m.trim().to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return None,
                }
            }
        }

        let code = parse_key_code(key_part.trim())?;
        Some(Self { code, modifiers })
    }

    /// Whether a key event triggers this binding. Shift is ignored for
    /// character keys since terminals fold it into the character.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => {
                let same_char = if self.modifiers.contains(KeyModifiers::CONTROL) {
                    a.eq_ignore_ascii_case(&b)
                } else {
                    a == b
                };
                same_char
                    && self.modifiers.difference(KeyModifiers::SHIFT)
                        == key.modifiers.difference(KeyModifiers::SHIFT)
            }
            (a, b) => a == b && self.modifiers == key.modifiers,
        }
    }

    /// Display form for hints, e.g. "Ctrl+c", "Space".
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => format!("{:?}", other),
        };
        parts.push(key);
        parts.join("+")
    }
}

fn parse_key_code(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let lower = key.to_lowercase();
    let code = match lower.as_str() {
        "space" => KeyCode::Char(' '),
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        f if f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if (1..=12).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(code)
}

/// Resolved global and per-screen keybindings.
#[derive(Debug, Clone)]
pub struct Keymap {
    quit: KeyBinding,
    force_quit: KeyBinding,
    spin: KeyBinding,
    back: KeyBinding,
    show_help: KeyBinding,
    toggle_history: KeyBinding,
}

impl Keymap {
    pub fn from_config(config: &KeybindingConfig) -> Self {
        let defaults = KeybindingConfig::default();
        let bind = |name: &str, value: &str, fallback: &str| {
            KeyBinding::parse(value).unwrap_or_else(|| {
                warn!("Invalid keybinding {} = '{}', using '{}'", name, value, fallback);
                KeyBinding::parse(fallback)
                    .unwrap_or(KeyBinding::new(KeyCode::Null, KeyModifiers::NONE))
            })
        };
        Self {
            quit: bind("quit", &config.quit, &defaults.quit),
            force_quit: bind("force_quit", &config.force_quit, &defaults.force_quit),
            spin: bind("spin", &config.spin, &defaults.spin),
            back: bind("back", &config.back, &defaults.back),
            show_help: bind("show_help", &config.show_help, &defaults.show_help),
            toggle_history: bind(
                "toggle_history",
                &config.toggle_history,
                &defaults.toggle_history,
            ),
        }
    }

    /// Bindings that work on every screen.
    pub fn resolve_global(&self, key: &KeyEvent) -> Action {
        if self.force_quit.matches(key) || self.quit.matches(key) {
            Action::Quit
        } else if self.show_help.matches(key) {
            Action::ShowHelp
        } else if self.toggle_history.matches(key) {
            Action::ToggleHistory
        } else {
            Action::None
        }
    }

    /// Global bindings first, then the ones for the current screen.
    pub fn resolve(&self, key: &KeyEvent, screen: ScreenKind) -> Action {
        let global = self.resolve_global(key);
        if !matches!(global, Action::None) {
            return global;
        }
        match screen {
            ScreenKind::Selection => Action::None,
            ScreenKind::Wheel if self.spin.matches(key) => Action::Spin,
            ScreenKind::Result if self.spin.matches(key) => Action::SpinAgain,
            ScreenKind::Wheel | ScreenKind::Result if self.back.matches(key) => {
                Action::BackToSelection
            }
            _ => Action::None,
        }
    }

    /// Whether `key` is the force-quit binding (honored even inside inputs).
    pub fn is_force_quit(&self, key: &KeyEvent) -> bool {
        self.force_quit.matches(key)
    }

    /// Display label for a named binding, for hints.
    pub fn hint(&self, name: &str) -> String {
        let binding = match name {
            "quit" => &self.quit,
            "force_quit" => &self.force_quit,
            "spin" => &self.spin,
            "back" => &self.back,
            "show_help" => &self.show_help,
            "toggle_history" => &self.toggle_history,
            _ => return "?".to_string(),
        };
        binding.label()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingConfig::default())
    }
}
