//! Navigation modes
//!
//! Exactly one controller is live at a time. Switching modes consumes the old
//! controller through [`ActiveController::exit`] and builds the new one fresh
//! at its canonical start pose with [`ActiveController::enter`]; nothing is
//! carried across.

use glam::Vec3;

use super::fps_controller::{FpsConfig, FpsController};
use super::orbit_controller::{OrbitConfig, OrbitController};
use crate::world::RoomBounds;

/// Which controller drives the camera.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NavMode {
    /// Free orbit around a movable look-at point
    #[default]
    Exhibit,
    /// First-person walking
    Fps,
}

impl NavMode {
    /// The mode a toggle switches to.
    pub fn other(self) -> Self {
        match self {
            NavMode::Exhibit => NavMode::Fps,
            NavMode::Fps => NavMode::Exhibit,
        }
    }
}

/// Camera transform handed to the renderer each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
}

impl CameraPose {
    /// Unit view direction, `-Z` if position and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }
}

/// The live controller.
#[derive(Clone, Debug)]
pub enum ActiveController {
    Exhibit(OrbitController),
    Fps(FpsController),
}

impl ActiveController {
    /// Build the controller for `mode` at its start pose.
    pub fn enter(mode: NavMode, orbit: &OrbitConfig, fps: &FpsConfig) -> Self {
        log::debug!("entering {mode:?} mode");
        match mode {
            NavMode::Exhibit => ActiveController::Exhibit(OrbitController::new(*orbit)),
            NavMode::Fps => ActiveController::Fps(FpsController::new(*fps)),
        }
    }

    /// Tear the controller down, dropping any transient state.
    pub fn exit(self) -> NavMode {
        let mode = self.mode();
        match self {
            ActiveController::Exhibit(mut orbit) => {
                if orbit.move_target().is_some() {
                    log::debug!("discarding pending move target");
                }
                orbit.clear_transient();
            }
            ActiveController::Fps(_) => {}
        }
        log::debug!("left {mode:?} mode");
        mode
    }

    pub fn mode(&self) -> NavMode {
        match self {
            ActiveController::Exhibit(_) => NavMode::Exhibit,
            ActiveController::Fps(_) => NavMode::Fps,
        }
    }

    /// The hall as this controller should see it: same extents, with the
    /// mode's own keep-out margin.
    pub fn room_for(&self, hall: &RoomBounds) -> RoomBounds {
        let margin = match self {
            ActiveController::Exhibit(orbit) => orbit.config().room_margin,
            ActiveController::Fps(fps) => fps.config().room_margin,
        };
        hall.with_margin(margin)
    }

    pub fn pose(&self) -> CameraPose {
        match self {
            ActiveController::Exhibit(orbit) => CameraPose {
                position: orbit.get_position(),
                target: orbit.get_target(),
            },
            ActiveController::Fps(fps) => CameraPose {
                position: fps.get_position(),
                target: fps.get_position() + fps.get_forward(),
            },
        }
    }
}
