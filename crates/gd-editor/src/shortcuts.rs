//! Keyboard shortcut mapping.
//!
//! Maps host key names (`KeyboardEvent.key` / `.code` values) to the two
//! editor actions. Keys pressed together with Ctrl or ⌘ are left to the
//! host.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Clear the current selection.
    Deselect,
    /// Delete the selected edge or node.
    Delete,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key to an action. `cmd` is Ctrl on most platforms and ⌘
    /// on macOS.
    pub fn resolve(key: &str, cmd: bool) -> Option<KeyAction> {
        if cmd {
            return None;
        }
        match key {
            "Escape" | "Esc" => Some(KeyAction::Deselect),
            "Delete" | "Backspace" => Some(KeyAction::Delete),
            _ => None,
        }
    }
}
