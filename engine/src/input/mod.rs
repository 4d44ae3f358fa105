//! Input Module
//!
//! Window-agnostic input for the gallery. Key codes and bindings are generic;
//! [`handler`] is the thin winit layer that feeds [`IntentState`], which the
//! frame tick drains once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use art_gallery_engine::input::{IntentState, KeyCode, WinitInputHandler};
//!
//! let mut intent = IntentState::new();
//! let mut handler = WinitInputHandler::new(1280, 720);
//!
//! // From the event loop
//! handler.handle_window_event(&event, &mut intent);
//!
//! // Or driven directly, e.g. from a script
//! intent.handle_key(KeyCode::W, true);
//! let frame = intent.take_frame();
//! assert!(frame.movement.forward);
//! ```

pub mod bindings;
pub mod handler;
pub mod intent;
pub mod keyboard;

// Re-export commonly used types at module level
pub use bindings::{InputAction, KeyBindings};
pub use handler::{WinitInputHandler, map_key};
pub use intent::{FrameIntent, IntentState, ModeRequest};
pub use keyboard::{KeyCode, MovementKeys};
