//! Key → command mapping.
//!
//! Built-in defaults; rules from the settings file override them key by key.

use crate::core::event::{Key, KeyCode, KeyModifiers};
use crate::core::Command;
use crate::services::config::KeybindingRule;
use rustc_hash::FxHashMap;

pub struct KeybindingService {
    bindings: FxHashMap<Key, Command>,
}

impl KeybindingService {
    pub fn new() -> Self {
        Self::with_defaults()
    }

    pub fn empty() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut bindings = FxHashMap::default();
        let shift = |code| Key::new(code, KeyModifiers::SHIFT);

        // ==================== Cursor ====================
        bindings.insert(Key::simple(KeyCode::Left), Command::CursorLeft);
        bindings.insert(Key::simple(KeyCode::Right), Command::CursorRight);
        bindings.insert(Key::simple(KeyCode::Up), Command::CursorUp);
        bindings.insert(Key::simple(KeyCode::Down), Command::CursorDown);
        bindings.insert(Key::simple(KeyCode::Home), Command::CursorLineStart);
        bindings.insert(Key::simple(KeyCode::End), Command::CursorLineEnd);
        bindings.insert(Key::ctrl(KeyCode::Home), Command::CursorFileStart);
        bindings.insert(Key::ctrl(KeyCode::End), Command::CursorFileEnd);
        bindings.insert(shift(KeyCode::Left), Command::SelectLeft);
        bindings.insert(shift(KeyCode::Right), Command::SelectRight);
        bindings.insert(shift(KeyCode::Up), Command::SelectUp);
        bindings.insert(shift(KeyCode::Down), Command::SelectDown);

        // ==================== Editing ====================
        bindings.insert(Key::simple(KeyCode::Enter), Command::InsertNewline);
        bindings.insert(Key::simple(KeyCode::Tab), Command::InsertTab);
        bindings.insert(Key::simple(KeyCode::Backspace), Command::DeleteBackward);
        bindings.insert(Key::simple(KeyCode::Delete), Command::DeleteForward);
        bindings.insert(Key::ctrl_char('a'), Command::SelectAll);

        // ==================== Documents ====================
        bindings.insert(Key::ctrl_char('n'), Command::NewFile);
        bindings.insert(Key::ctrl_char('s'), Command::Save);
        bindings.insert(Key::ctrl_char('w'), Command::CloseTab);
        bindings.insert(Key::ctrl_char('j'), Command::PrevTab);
        bindings.insert(Key::ctrl_char('l'), Command::NextTab);

        // ==================== System ====================
        bindings.insert(Key::ctrl_char('q'), Command::Quit);
        bindings.insert(Key::ctrl_char('z'), Command::Undo);
        bindings.insert(Key::ctrl_char('u'), Command::Redo);
        bindings.insert(Key::ctrl_char('x'), Command::Cut);
        bindings.insert(Key::ctrl_char('c'), Command::Copy);
        bindings.insert(Key::ctrl_char('v'), Command::Paste);

        // ==================== View ====================
        bindings.insert(Key::ctrl_char('b'), Command::ToggleSidebar);
        bindings.insert(Key::ctrl_char('e'), Command::FocusExplorer);
        bindings.insert(Key::simple(KeyCode::Esc), Command::FocusEditor);

        Self { bindings }
    }

    /// Defaults plus user rules. Rules whose key does not parse are returned
    /// so the caller can report them.
    pub fn with_overrides(rules: &[KeybindingRule]) -> (Self, Vec<KeybindingRule>) {
        let mut service = Self::with_defaults();
        let mut rejected = Vec::new();
        for rule in rules {
            match parse_keybinding(&rule.key) {
                Some(key) => service.bind(key, Command::from_name(rule.command.trim())),
                None => rejected.push(rule.clone()),
            }
        }
        (service, rejected)
    }

    pub fn get(&self, key: &Key) -> Option<&Command> {
        self.bindings.get(key)
    }

    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: &Key) -> Option<Command> {
        self.bindings.remove(key)
    }

    pub fn keys_for_command(&self, command: &Command) -> Vec<Key> {
        self.bindings
            .iter()
            .filter(|(_, cmd)| *cmd == command)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn is_bound(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeybindingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `ctrl+shift+p`-style strings. Modifier names are case-insensitive;
/// an uppercase letter implies shift.
pub fn parse_keybinding(value: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part: Option<&str> = None;
    for part in value.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            "super" | "meta" | "cmd" | "command" => modifiers |= KeyModifiers::SUPER,
            _ => {
                if key_part.is_some() {
                    return None;
                }
                key_part = Some(part);
            }
        }
    }
    let mut code = parse_key_code(key_part?)?;
    if let KeyCode::Char(ch) = code {
        if ch.is_ascii_uppercase() {
            code = KeyCode::Char(ch.to_ascii_lowercase());
            modifiers |= KeyModifiers::SHIFT;
        }
    }
    Some(Key::new(code, modifiers))
}

fn parse_key_code(value: &str) -> Option<KeyCode> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    let v_lc = v.to_ascii_lowercase();
    let code = match v_lc.as_str() {
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ if v_lc.len() > 1 && v_lc.starts_with('f') => {
            let n = v_lc.strip_prefix('f')?.parse::<u8>().ok()?;
            KeyCode::F(n)
        }
        _ => {
            let mut chars = v.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some(code)
}

#[cfg(test)]
#[path = "../../tests/unit/services/keybinding.rs"]
mod tests;
