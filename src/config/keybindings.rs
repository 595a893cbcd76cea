//! Keyboard bindings for the main list.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to Normal-mode actions.
///
/// Lookups ignore the event kind and state, and treat an uppercase letter
/// the same with or without SHIFT reported.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<(KeyCode, KeyModifiers), KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&normalize(key.code, key.modifiers)).copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(normalize(code, modifiers), action);
    }
}

fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(_) => (code, modifiers - KeyModifiers::SHIFT),
        _ => (code, modifiers),
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;

        // Vertical
        map.bind(KeyCode::Up, none, KeyAction::ScrollUp);
        map.bind(KeyCode::Char('k'), none, KeyAction::ScrollUp);
        map.bind(KeyCode::Down, none, KeyAction::ScrollDown);
        map.bind(KeyCode::Char('j'), none, KeyAction::ScrollDown);
        map.bind(KeyCode::PageUp, none, KeyAction::PageUp);
        map.bind(KeyCode::PageDown, none, KeyAction::PageDown);
        map.bind(KeyCode::Home, none, KeyAction::ScrollToTop);
        map.bind(KeyCode::End, none, KeyAction::ScrollToBottom);

        // Horizontal
        map.bind(KeyCode::Left, none, KeyAction::ScrollLeft);
        map.bind(KeyCode::Right, none, KeyAction::ScrollRight);
        map.bind(KeyCode::Left, KeyModifiers::CONTROL, KeyAction::FastScrollLeft);
        map.bind(KeyCode::Right, KeyModifiers::CONTROL, KeyAction::FastScrollRight);

        // Modes and overlays
        map.bind(KeyCode::Enter, none, KeyAction::OpenDetail);
        map.bind(KeyCode::Char(' '), none, KeyAction::OpenDetail);
        map.bind(KeyCode::Char('f'), none, KeyAction::AddFilter);
        map.bind(KeyCode::Char('F'), none, KeyAction::ManageFilters);
        map.bind(KeyCode::Char('v'), none, KeyAction::EditView);
        map.bind(KeyCode::Char('V'), none, KeyAction::EditView);
        map.bind(KeyCode::Char('t'), none, KeyAction::ToggleTail);
        map.bind(KeyCode::Char('h'), none, KeyAction::Help);
        map.bind(KeyCode::Char('?'), none, KeyAction::Help);

        // Application
        map.bind(KeyCode::Esc, none, KeyAction::Back);
        map.bind(KeyCode::Char('q'), none, KeyAction::Quit);

        map
    }
}
