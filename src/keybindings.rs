//! Keyboard shortcuts for map navigation.
//!
//! Zoom keys (`+`, `-`, space, `0`) belong to the viewport and are not
//! configurable here.

use hummaps_view::Key;
use serde::{Deserialize, Serialize};

/// Navigation actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ShowList,
    PrevPage,
    NextPage,
    PrevMap,
    NextMap,
}

impl KeyAction {
    pub fn all() -> &'static [KeyAction] {
        &[
            KeyAction::ShowList,
            KeyAction::PrevPage,
            KeyAction::NextPage,
            KeyAction::PrevMap,
            KeyAction::NextMap,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyAction::ShowList => "Show map list",
            KeyAction::PrevPage => "Previous page",
            KeyAction::NextPage => "Next page",
            KeyAction::PrevMap => "Previous map",
            KeyAction::NextMap => "Next map",
        }
    }

    /// Page keys only make sense while a map is on screen.
    pub fn requires_map_view(&self) -> bool {
        matches!(self, KeyAction::PrevPage | KeyAction::NextPage)
    }
}

/// Active key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub show_list: Key,
    pub prev_page: Key,
    pub next_page: Key,
    pub prev_map: Key,
    pub next_map: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            show_list: Key::Escape,
            prev_page: Key::Left,
            next_page: Key::Right,
            prev_map: Key::Up,
            next_map: Key::Down,
        }
    }
}

impl KeyBindings {
    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<KeyAction> {
        KeyAction::all()
            .iter()
            .copied()
            .find(|action| self.key_for_action(*action) == key)
    }

    pub fn key_for_action(&self, action: KeyAction) -> Key {
        match action {
            KeyAction::ShowList => self.show_list,
            KeyAction::PrevPage => self.prev_page,
            KeyAction::NextPage => self.next_page,
            KeyAction::PrevMap => self.prev_map,
            KeyAction::NextMap => self.next_map,
        }
    }

    pub fn set_key(&mut self, action: KeyAction, key: Key) {
        match action {
            KeyAction::ShowList => self.show_list = key,
            KeyAction::PrevPage => self.prev_page = key,
            KeyAction::NextPage => self.next_page = key,
            KeyAction::PrevMap => self.prev_map = key,
            KeyAction::NextMap => self.next_map = key,
        }
    }
}

/// Convert a key to its DOM `KeyboardEvent.key` name.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_string(),
        Key::Space => " ".to_string(),
        Key::Escape => "Escape".to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Left => "ArrowLeft".to_string(),
        Key::Right => "ArrowRight".to_string(),
        Key::Up => "ArrowUp".to_string(),
        Key::Down => "ArrowDown".to_string(),
    }
}

/// Keybinding configuration section, stored as DOM key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingsConfig {
    pub show_list: String,
    pub prev_page: String,
    pub next_page: String,
    pub prev_map: String,
    pub next_map: String,
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self::from(&KeyBindings::default())
    }
}

impl From<&KeyBindings> for KeyBindingsConfig {
    fn from(bindings: &KeyBindings) -> Self {
        Self {
            show_list: key_to_string(bindings.show_list),
            prev_page: key_to_string(bindings.prev_page),
            next_page: key_to_string(bindings.next_page),
            prev_map: key_to_string(bindings.prev_map),
            next_map: key_to_string(bindings.next_map),
        }
    }
}

impl KeyBindingsConfig {
    /// Convert back to KeyBindings. Unknown key names keep their default.
    pub fn to_keybindings(&self) -> KeyBindings {
        let mut bindings = KeyBindings::default();
        let entries = [
            (KeyAction::ShowList, &self.show_list),
            (KeyAction::PrevPage, &self.prev_page),
            (KeyAction::NextPage, &self.next_page),
            (KeyAction::PrevMap, &self.prev_map),
            (KeyAction::NextMap, &self.next_map),
        ];
        for (action, name) in entries {
            match Key::from_dom(name) {
                Some(key) => bindings.set_key(action, key),
                None => log::warn!("Unknown key '{}' for {}, using default", name, action.name()),
            }
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actions() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for_key(Key::Escape), Some(KeyAction::ShowList));
        assert_eq!(bindings.action_for_key(Key::Left), Some(KeyAction::PrevPage));
        assert_eq!(bindings.action_for_key(Key::Down), Some(KeyAction::NextMap));
        assert_eq!(bindings.action_for_key(Key::Char('+')), None);
    }

    #[test]
    fn test_page_keys_need_map_view() {
        assert!(KeyAction::NextPage.requires_map_view());
        assert!(!KeyAction::NextMap.requires_map_view());
        assert!(!KeyAction::ShowList.requires_map_view());
    }

    #[test]
    fn test_config_round_trip_through_dom_names() {
        let mut bindings = KeyBindings::default();
        bindings.set_key(KeyAction::NextPage, Key::Char('n'));
        let config = KeyBindingsConfig::from(&bindings);
        assert_eq!(config.next_page, "n");
        assert_eq!(config.to_keybindings(), bindings);
    }

    #[test]
    fn test_unknown_key_name_keeps_default() {
        let config = KeyBindingsConfig {
            prev_map: "Hyper".to_string(),
            ..Default::default()
        };
        assert_eq!(config.to_keybindings().prev_map, Key::Up);
    }

    #[test]
    fn test_partial_json() {
        let config: KeyBindingsConfig = serde_json::from_str(r#"{ "show_list": "q" }"#).unwrap();
        assert_eq!(config.to_keybindings().show_list, Key::Char('q'));
        assert_eq!(config.to_keybindings().next_page, Key::Right);
    }
}
