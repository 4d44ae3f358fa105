//! Keyboard Input Module
//!
//! Contains keyboard state tracking for movement keys.
//! Decoupled from winit to use generic key codes.

use super::bindings::InputAction;

/// Generic key codes, independent of windowing system.
///
/// Only the keys the gallery reacts to get their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    ShiftLeft,
    ShiftRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Interaction
    E,

    // Mode selection
    Digit1,
    Digit2,
    Tab,

    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks the current state of movement keys.
///
/// Held keys persist across frames; last write wins per key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// Walk forward (default: W)
    pub forward: bool,
    /// Walk backward (default: S)
    pub backward: bool,
    /// Strafe left (default: A)
    pub left: bool,
    /// Strafe right (default: D)
    pub right: bool,
    /// Sprint modifier (default: either Shift)
    pub sprint: bool,
}

impl MovementKeys {
    /// Update movement state for a bound action.
    ///
    /// Returns `true` if the action was a movement action and was handled,
    /// `false` otherwise.
    pub fn apply_action(&mut self, action: InputAction, pressed: bool) -> bool {
        match action {
            InputAction::MoveForward => self.forward = pressed,
            InputAction::MoveBack => self.backward = pressed,
            InputAction::MoveLeft => self.left = pressed,
            InputAction::MoveRight => self.right = pressed,
            InputAction::Sprint => self.sprint = pressed,
            _ => return false,
        }
        true
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get the forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Get the left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}
