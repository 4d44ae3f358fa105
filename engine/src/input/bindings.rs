//! Input Bindings Module
//!
//! Maps physical keys to the gallery's logical actions so visitors can remap
//! movement and interaction keys.

use std::collections::HashMap;

use super::KeyCode;

/// Logical input actions that can be bound to physical keys.
///
/// These actions represent high-level game inputs independent of their physical key mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move forward (default: W)
    MoveForward,
    /// Move backward (default: S)
    MoveBack,
    /// Strafe left (default: A)
    MoveLeft,
    /// Strafe right (default: D)
    MoveRight,
    /// Sprint modifier (default: either Shift)
    Sprint,
    /// Use the door in view (default: E)
    Interact,
    /// Switch to exhibit (orbit) mode (default: 1)
    ExhibitMode,
    /// Switch to first-person mode (default: 2)
    FpsMode,
    /// Flip between the two modes (default: Tab)
    ToggleMode,
    /// Release pointer / cancel (default: Escape)
    Escape,
}

impl InputAction {
    /// True for actions that are held rather than triggered.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            InputAction::MoveForward
                | InputAction::MoveBack
                | InputAction::MoveLeft
                | InputAction::MoveRight
                | InputAction::Sprint
        )
    }
}

/// Maps physical keys to logical actions.
///
/// Several keys may share an action (both Shift keys sprint, arrows walk),
/// but each key triggers at most one action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create the default gallery layout.
    ///
    /// - W / Arrow Up = MoveForward
    /// - S / Arrow Down = MoveBack
    /// - A / Arrow Left = MoveLeft
    /// - D / Arrow Right = MoveRight
    /// - Left or Right Shift = Sprint
    /// - E = Interact
    /// - 1 = ExhibitMode, 2 = FpsMode, Tab = ToggleMode
    /// - Escape = Escape
    pub fn new() -> Self {
        let mut bindings = Self::empty();
        for (key, action) in [
            (KeyCode::W, InputAction::MoveForward),
            (KeyCode::ArrowUp, InputAction::MoveForward),
            (KeyCode::S, InputAction::MoveBack),
            (KeyCode::ArrowDown, InputAction::MoveBack),
            (KeyCode::A, InputAction::MoveLeft),
            (KeyCode::ArrowLeft, InputAction::MoveLeft),
            (KeyCode::D, InputAction::MoveRight),
            (KeyCode::ArrowRight, InputAction::MoveRight),
            (KeyCode::ShiftLeft, InputAction::Sprint),
            (KeyCode::ShiftRight, InputAction::Sprint),
            (KeyCode::E, InputAction::Interact),
            (KeyCode::Digit1, InputAction::ExhibitMode),
            (KeyCode::Digit2, InputAction::FpsMode),
            (KeyCode::Tab, InputAction::ToggleMode),
            (KeyCode::Escape, InputAction::Escape),
        ] {
            bindings.bind(key, action);
        }
        bindings
    }

    /// No keys bound at all.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
        }
    }

    /// Bind a physical key to a logical action, replacing whatever the key
    /// did before. Other keys bound to the same action keep working.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if let Some(old) = self.key_to_action.insert(key, action) {
            if old != action {
                log::debug!("{key:?} rebound from {old:?} to {action:?}");
            }
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::W), Some(InputAction::MoveForward));
        assert_eq!(bindings.get_action(KeyCode::S), Some(InputAction::MoveBack));
        assert_eq!(bindings.get_action(KeyCode::A), Some(InputAction::MoveLeft));
        assert_eq!(bindings.get_action(KeyCode::D), Some(InputAction::MoveRight));
        assert_eq!(bindings.get_action(KeyCode::ShiftLeft), Some(InputAction::Sprint));
        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::Interact));
        assert_eq!(bindings.get_action(KeyCode::Digit1), Some(InputAction::ExhibitMode));
        assert_eq!(bindings.get_action(KeyCode::Digit2), Some(InputAction::FpsMode));
        assert_eq!(bindings.get_action(KeyCode::Tab), Some(InputAction::ToggleMode));
        assert_eq!(bindings.get_action(KeyCode::Escape), Some(InputAction::Escape));
    }

    #[test]
    fn test_every_mapped_key_is_bound() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::ShiftRight), Some(InputAction::Sprint));
        assert_eq!(bindings.get_action(KeyCode::ArrowUp), Some(InputAction::MoveForward));
        assert_eq!(bindings.get_action(KeyCode::ArrowDown), Some(InputAction::MoveBack));
        assert_eq!(bindings.get_action(KeyCode::ArrowLeft), Some(InputAction::MoveLeft));
        assert_eq!(bindings.get_action(KeyCode::ArrowRight), Some(InputAction::MoveRight));
        assert_eq!(bindings.get_action(KeyCode::Unknown), None);
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();

        // W now opens doors; the arrow still walks
        bindings.bind(KeyCode::W, InputAction::Interact);
        assert_eq!(bindings.get_action(KeyCode::W), Some(InputAction::Interact));
        assert_eq!(bindings.get_action(KeyCode::ArrowUp), Some(InputAction::MoveForward));
        // E keeps its own binding
        assert_eq!(bindings.get_action(KeyCode::E), Some(InputAction::Interact));
    }

    #[test]
    fn test_empty_bindings() {
        let bindings = KeyBindings::empty();
        assert_eq!(bindings.get_action(KeyCode::W), None);
    }

    #[test]
    fn test_held_actions() {
        assert!(InputAction::MoveLeft.is_held());
        assert!(InputAction::Sprint.is_held());
        assert!(!InputAction::Interact.is_held());
        assert!(!InputAction::ToggleMode.is_held());
    }
}
