//! Per-frame intent
//!
//! Window callbacks never touch transforms. They record what the visitor
//! asked for here, and the frame tick drains it once at the start of the
//! next frame. Held keys persist; one-shot requests (click, use, mode switch)
//! and pointer deltas are consumed by [`IntentState::take_frame`]. Within a
//! frame the last write wins.

use glam::Vec2;

use super::bindings::{InputAction, KeyBindings};
use super::keyboard::{KeyCode, MovementKeys};
use crate::camera::NavMode;

/// A queued navigation mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    /// Switch to a specific mode (no-op if already active)
    Set(NavMode),
    /// Switch to whichever mode is not active
    Toggle,
}

/// Everything one frame consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntent {
    /// Held movement keys
    pub movement: MovementKeys,
    /// Raw pointer motion since last frame (pixels, pointer-lock look)
    pub look_delta: Vec2,
    /// Pointer motion while the primary button was held (pixels, orbit drag)
    pub drag_delta: Vec2,
    /// Scroll since last frame (lines, positive = zoom in)
    pub scroll_lines: f32,
    /// Viewport-relative click position, `(0,0)` top-left to `(1,1)` bottom-right
    pub click: Option<Vec2>,
    /// Use key went down since last frame
    pub use_pressed: bool,
    /// Pending mode change
    pub mode_request: Option<ModeRequest>,
}

/// Queued input between two frame ticks.
#[derive(Debug, Clone, Default)]
pub struct IntentState {
    /// Key to action mapping
    pub bindings: KeyBindings,
    /// Held movement keys
    pub movement: MovementKeys,
    look_delta: Vec2,
    drag_delta: Vec2,
    scroll_lines: f32,
    click: Option<Vec2>,
    use_pressed: bool,
    mode_request: Option<ModeRequest>,
}

impl IntentState {
    /// Create an empty intent state with default key bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if the key is bound to an action.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let Some(action) = self.bindings.get_action(key) else {
            return false;
        };
        if action.is_held() {
            return self.movement.apply_action(action, pressed);
        }
        if !pressed {
            return true;
        }
        match action {
            InputAction::Interact => self.press_use(),
            InputAction::ExhibitMode => self.request_mode(NavMode::Exhibit),
            InputAction::FpsMode => self.request_mode(NavMode::Fps),
            InputAction::ToggleMode => self.mode_request = Some(ModeRequest::Toggle),
            // Escape releases the held keys so nothing keeps walking
            InputAction::Escape => self.movement.reset(),
            _ => {}
        }
        true
    }

    /// Accumulate raw pointer motion.
    pub fn add_look_delta(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.look_delta += Vec2::new(dx, dy);
        }
    }

    /// Accumulate pointer motion made with the primary button held.
    pub fn add_drag_delta(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.drag_delta += Vec2::new(dx, dy);
        }
    }

    /// Accumulate scroll in lines.
    pub fn add_scroll(&mut self, lines: f32) {
        if lines.is_finite() {
            self.scroll_lines += lines;
        }
    }

    /// Record a click at a viewport-relative position. Overwrites any
    /// earlier click this frame.
    pub fn click_at(&mut self, viewport: Vec2) {
        if viewport.is_finite() {
            self.click = Some(viewport.clamp(Vec2::ZERO, Vec2::ONE));
        }
    }

    /// Record a use (door) request.
    pub fn press_use(&mut self) {
        self.use_pressed = true;
    }

    /// Queue a switch to `mode`.
    pub fn request_mode(&mut self, mode: NavMode) {
        self.mode_request = Some(ModeRequest::Set(mode));
    }

    /// Drop every held and queued input, e.g. on focus loss.
    pub fn clear(&mut self) {
        self.movement.reset();
        self.take_frame();
    }

    /// Snapshot this frame's intent and consume the one-shot parts.
    pub fn take_frame(&mut self) -> FrameIntent {
        FrameIntent {
            movement: self.movement,
            look_delta: std::mem::take(&mut self.look_delta),
            drag_delta: std::mem::take(&mut self.drag_delta),
            scroll_lines: std::mem::take(&mut self.scroll_lines),
            click: self.click.take(),
            use_pressed: std::mem::take(&mut self.use_pressed),
            mode_request: self.mode_request.take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_survive_take() {
        let mut intent = IntentState::new();
        assert!(intent.handle_key(KeyCode::W, true));
        let frame = intent.take_frame();
        assert!(frame.movement.forward);
        assert!(intent.take_frame().movement.forward);

        intent.handle_key(KeyCode::W, false);
        assert!(!intent.take_frame().movement.forward);
    }

    #[test]
    fn test_one_shots_are_consumed() {
        let mut intent = IntentState::new();
        intent.handle_key(KeyCode::E, true);
        intent.add_look_delta(3.0, -2.0);
        intent.add_look_delta(1.0, 1.0);
        intent.add_scroll(-1.0);
        intent.click_at(Vec2::new(0.5, 0.5));

        let frame = intent.take_frame();
        assert!(frame.use_pressed);
        assert_eq!(frame.look_delta, Vec2::new(4.0, -1.0));
        assert_eq!(frame.scroll_lines, -1.0);
        assert_eq!(frame.click, Some(Vec2::new(0.5, 0.5)));

        let next = intent.take_frame();
        assert!(!next.use_pressed);
        assert_eq!(next.look_delta, Vec2::ZERO);
        assert!(next.click.is_none());
    }

    #[test]
    fn test_last_click_wins() {
        let mut intent = IntentState::new();
        intent.click_at(Vec2::new(0.1, 0.1));
        intent.click_at(Vec2::new(0.9, 0.2));
        assert_eq!(intent.take_frame().click, Some(Vec2::new(0.9, 0.2)));
    }

    #[test]
    fn test_mode_keys() {
        let mut intent = IntentState::new();
        intent.handle_key(KeyCode::Digit2, true);
        assert_eq!(intent.take_frame().mode_request, Some(ModeRequest::Set(NavMode::Fps)));
        intent.handle_key(KeyCode::Tab, true);
        // Release does not re-trigger
        intent.handle_key(KeyCode::Tab, false);
        assert_eq!(intent.take_frame().mode_request, Some(ModeRequest::Toggle));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut intent = IntentState::new();
        assert!(!intent.handle_key(KeyCode::Unknown, true));
        assert_eq!(intent.take_frame(), FrameIntent::default());
    }

    #[test]
    fn test_non_finite_deltas_dropped() {
        let mut intent = IntentState::new();
        intent.add_look_delta(f32::NAN, 1.0);
        intent.add_scroll(f32::INFINITY);
        let frame = intent.take_frame();
        assert_eq!(frame.look_delta, Vec2::ZERO);
        assert_eq!(frame.scroll_lines, 0.0);
    }
}
