//! Keyboard bindings for the terminal frontend

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use matchgrid::Direction;
use matchgrid::settings::KeySettings;

/// What a key press asks the frontend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveCursor(Direction),
    Select,
    ToggleHints,
    Quit,
}

/// Key bindings - supports multiple keys per command
#[derive(Debug, Clone)]
pub struct KeyBindings {
    cursor_up: Vec<KeyCode>,
    cursor_down: Vec<KeyCode>,
    cursor_left: Vec<KeyCode>,
    cursor_right: Vec<KeyCode>,
    select: Vec<KeyCode>,
    hints: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key name into a KeyCode. Unknown names bind nothing.
    fn parse_key(s: &str) -> Option<KeyCode> {
        let key = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => {
                        tracing::warn!("Unknown key name {:?} in bindings", s);
                        return None;
                    }
                }
            }
        };
        Some(key)
    }

    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter().filter_map(|s| Self::parse_key(s)).collect()
    }

    pub fn from_settings(keys: &KeySettings) -> Self {
        Self {
            cursor_up: Self::parse_keys(&keys.cursor_up),
            cursor_down: Self::parse_keys(&keys.cursor_down),
            cursor_left: Self::parse_keys(&keys.cursor_left),
            cursor_right: Self::parse_keys(&keys.cursor_right),
            select: Self::parse_keys(&keys.select),
            hints: Self::parse_keys(&keys.hints),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    /// Map a key press to a command
    pub fn command(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);
        let bound = [
            (&self.cursor_up, Command::MoveCursor(Direction::Up)),
            (&self.cursor_down, Command::MoveCursor(Direction::Down)),
            (&self.cursor_left, Command::MoveCursor(Direction::Left)),
            (&self.cursor_right, Command::MoveCursor(Direction::Right)),
            (&self.select, Command::Select),
            (&self.hints, Command::ToggleHints),
            (&self.quit, Command::Quit),
        ];
        bound
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, command)| command)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&KeySettings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
