//! Camera Module
//!
//! Provides the two gallery camera controllers and the screen-ray helpers
//! they share. This module is window-system agnostic - it only deals with
//! camera state and math.

pub mod fps_controller;
pub mod mode;
pub mod move_target;
pub mod orbit_controller;
pub mod raycast;

pub use fps_controller::{FpsConfig, FpsController};
pub use mode::{ActiveController, CameraPose, NavMode};
pub use move_target::{MoveTargetConfig, MoveTargetTracker};
pub use orbit_controller::{OrbitConfig, OrbitController};
pub use raycast::{FloorHit, RaycastConfig, get_ray_direction, intersect_plane, raycast_to_floor};
