//! Art Gallery Engine Library
//!
//! Navigation and collision core for a walkable virtual gallery. A visitor
//! either orbits freely around a movable look-at point (exhibit mode) or walks
//! in first person (FPS mode), while guide agents patrol the same hall. The
//! renderer and UI live outside this crate: they hand in room bounds, solid
//! obstacles and raw input, and read back camera/agent transforms and events.
//!
//! # Modules
//!
//! - [`physics`] - AABB obstacles and the proximity probe
//! - [`world`] - Room bounds, the door state machine, default hall layout
//! - [`camera`] - Orbit and first-person controllers, click-to-move, screen rays
//! - [`agent`] - Guide steering with sweep fallback and stuck recovery
//! - [`input`] - Key bindings, per-frame intent, winit event glue
//! - [`session`] - Per-frame tick that owns all mutable state
//! - [`config`] - JSON-loadable aggregate of every tunable
//!
//! # Example
//!
//! ```ignore
//! use art_gallery_engine::config::GalleryConfig;
//! use art_gallery_engine::input::IntentState;
//! use art_gallery_engine::session::GallerySession;
//!
//! let mut session = GallerySession::new(GalleryConfig::default())?;
//! let mut intent = IntentState::new();
//!
//! // Window callbacks only queue intent...
//! intent.movement.forward = true;
//!
//! // ...which the frame tick consumes
//! let frame = session.tick(&mut intent, 1.0 / 60.0);
//! renderer.set_camera(frame.camera.position, frame.camera.target);
//! ```

pub mod agent;
pub mod camera;
pub mod config;
pub mod input;
pub mod physics;
pub mod session;
pub mod world;

// Re-export the types most callers need
pub use camera::{ActiveController, NavMode};
pub use config::{ConfigError, GalleryConfig};
pub use input::{IntentState, KeyCode};
pub use physics::{Aabb, ObstacleSet, ProbeResult, ProximityProbe, probe};
pub use session::{FrameOutput, GallerySession, SessionEvent};
pub use world::{Door, DoorState, RoomBounds, RoomError};

/// Sanitises a frame delta: non-finite or negative values become 0, the
/// rest are capped at `max`.
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(max)
    } else {
        0.0
    }
}
