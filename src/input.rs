//! Keyboard input translation
//!
//! Turns crossterm key events into the abstract events the modes consume.
//! Arrow keys, Enter and Backspace are fixed; everything else comes from
//! the key bindings in the settings file.

use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

/// Logical keys understood by the modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    RotateLeft,
    RotateRight,
    Hold,
    Pause,
    HardDrop,
    Confirm,
    Backspace,
    ToggleMusic,
    Quit,
}

/// A single input event delivered to the active mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// Alphabetic character typed, for name entry
    Text(char),
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct InputMap {
    rotate_left: Vec<KeyCode>,
    rotate_right: Vec<KeyCode>,
    hard_drop: Vec<KeyCode>,
    hold: Vec<KeyCode>,
    pause: Vec<KeyCode>,
    toggle_music: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl InputMap {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
            lower => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings, skipping names we don't recognise
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key binding");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            rotate_left: Self::parse_keys(&keys.rotate_left),
            rotate_right: Self::parse_keys(&keys.rotate_right),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            hold: Self::parse_keys(&keys.hold),
            pause: Self::parse_keys(&keys.pause),
            toggle_music: Self::parse_keys(&keys.toggle_music),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    fn bound_key(&self, code: KeyCode) -> Option<Key> {
        let table = [
            (&self.rotate_left, Key::RotateLeft),
            (&self.rotate_right, Key::RotateRight),
            (&self.hard_drop, Key::HardDrop),
            (&self.hold, Key::Hold),
            (&self.pause, Key::Pause),
            (&self.toggle_music, Key::ToggleMusic),
            (&self.quit, Key::Quit),
        ];
        table
            .into_iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, key)| key)
    }

    /// Translate one key press. A letter can yield both a bound key and a
    /// text event; the active mode decides which one it cares about.
    pub fn translate(&self, key: KeyEvent) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let fixed = match key.code {
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Enter => Some(Key::Confirm),
            KeyCode::Backspace => Some(Key::Backspace),
            _ => None,
        };
        if let Some(k) = fixed {
            events.push(InputEvent::Key(k));
            return events;
        }

        if let Some(k) = self.bound_key(normalize_key(key.code)) {
            events.push(InputEvent::Key(k));
        }
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_alphabetic() && !key.modifiers.contains(KeyModifiers::CONTROL) {
                events.push(InputEvent::Text(c));
            }
        }
        events
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Is this the Ctrl+C interrupt chord
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrows_and_enter_are_fixed() {
        let map = InputMap::default();
        assert_eq!(map.translate(press(KeyCode::Up)), vec![InputEvent::Key(Key::Up)]);
        assert_eq!(
            map.translate(press(KeyCode::Enter)),
            vec![InputEvent::Key(Key::Confirm)]
        );
        assert_eq!(
            map.translate(press(KeyCode::Backspace)),
            vec![InputEvent::Key(Key::Backspace)]
        );
    }

    #[test]
    fn test_bound_letter_also_types() {
        let map = InputMap::default();
        assert_eq!(
            map.translate(press(KeyCode::Char('Z'))),
            vec![InputEvent::Key(Key::RotateLeft), InputEvent::Text('Z')]
        );
        assert_eq!(
            map.translate(press(KeyCode::Char('b'))),
            vec![InputEvent::Text('b')]
        );
    }

    #[test]
    fn test_space_and_digits_do_not_type() {
        let map = InputMap::default();
        assert_eq!(
            map.translate(press(KeyCode::Char(' '))),
            vec![InputEvent::Key(Key::HardDrop)]
        );
        assert!(map.translate(press(KeyCode::Char('7'))).is_empty());
    }

    #[test]
    fn test_unknown_binding_is_skipped() {
        let keys = vec!["x".to_string(), "NotAKey".to_string()];
        assert_eq!(InputMap::parse_keys(&keys), vec![KeyCode::Char('x')]);
    }

    #[test]
    fn test_interrupt_chord() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_interrupt(&key));
        assert!(!is_interrupt(&press(KeyCode::Char('c'))));
    }
}
