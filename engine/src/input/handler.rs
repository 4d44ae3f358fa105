//! Input Handler
//!
//! Translates winit window and device events into [`IntentState`].
//! This is the only place the crate sees winit types; everything downstream
//! works with the generic [`KeyCode`] and viewport-relative positions.
//!
//! Pointer handling:
//! - raw device motion always accumulates as look; only first-person mode
//!   consumes it, so exhibit mode ignores it without a lock check here
//! - cursor motion with the primary button held feeds orbit drag
//! - a primary press/release that travels less than `click_slop` pixels
//!   becomes a click

use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

use super::intent::IntentState;
use super::keyboard::KeyCode;

/// Pixels of travel a press may accumulate and still count as a click.
const DEFAULT_CLICK_SLOP: f32 = 4.0;
/// Pixel scroll deltas are converted to lines at this rate.
const PIXELS_PER_LINE: f32 = 100.0;

/// Map a winit physical key to the engine's key code.
pub fn map_key(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::KeyE => KeyCode::E,
        WinitKey::ShiftLeft => KeyCode::ShiftLeft,
        WinitKey::ShiftRight => KeyCode::ShiftRight,
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::Digit1 => KeyCode::Digit1,
        WinitKey::Digit2 => KeyCode::Digit2,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::Escape => KeyCode::Escape,
        _ => KeyCode::Unknown,
    }
}

/// Stateful bridge between a winit window and the intent queue.
#[derive(Debug, Clone)]
pub struct WinitInputHandler {
    /// Window size in physical pixels
    viewport: Vec2,
    /// Last known cursor position in physical pixels
    cursor: Option<Vec2>,
    /// Whether the primary button is held
    primary_down: bool,
    /// Pixels travelled since the primary button went down
    press_travel: f32,
    /// Maximum travel for a press to count as a click
    pub click_slop: f32,
}

impl Default for WinitInputHandler {
    fn default() -> Self {
        Self {
            viewport: Vec2::ONE,
            cursor: None,
            primary_down: false,
            press_travel: 0.0,
            click_slop: DEFAULT_CLICK_SLOP,
        }
    }
}

impl WinitInputHandler {
    pub fn new(width: u32, height: u32) -> Self {
        let mut handler = Self::default();
        handler.set_viewport_size(width, height);
        handler
    }

    /// Update the viewport size used to normalise click positions.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Handle a window event. Returns `true` if it was input the gallery uses.
    pub fn handle_window_event(&mut self, event: &WindowEvent, intent: &mut IntentState) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return false;
                }
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                intent.handle_key(map_key(key), event.state == ElementState::Pressed)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(Vec2::new(position.x as f32, position.y as f32), intent);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *button != MouseButton::Left {
                    return false;
                }
                self.handle_primary_button(*state == ElementState::Pressed, intent);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                intent.add_scroll(lines);
                true
            }
            WindowEvent::Resized(size) => {
                self.set_viewport_size(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                log::debug!("window lost focus, releasing held input");
                self.primary_down = false;
                intent.clear();
                false
            }
            _ => false,
        }
    }

    /// Handle a raw device event (look motion).
    pub fn handle_device_event(&mut self, event: &DeviceEvent, intent: &mut IntentState) {
        if let DeviceEvent::MouseMotion { delta } = event {
            intent.add_look_delta(delta.0 as f32, delta.1 as f32);
        }
    }

    /// Cursor moved to `position` (physical pixels).
    pub fn handle_cursor_moved(&mut self, position: Vec2, intent: &mut IntentState) {
        if let Some(previous) = self.cursor {
            if self.primary_down {
                let delta = position - previous;
                intent.add_drag_delta(delta.x, delta.y);
                self.press_travel += delta.length();
            }
        }
        self.cursor = Some(position);
    }

    /// Primary button pressed or released at the current cursor.
    pub fn handle_primary_button(&mut self, pressed: bool, intent: &mut IntentState) {
        if pressed {
            self.primary_down = true;
            self.press_travel = 0.0;
            return;
        }
        let was_down = std::mem::replace(&mut self.primary_down, false);
        if !was_down || self.press_travel > self.click_slop {
            return;
        }
        if let Some(cursor) = self.cursor {
            intent.click_at(cursor / self.viewport);
        }
    }
}
