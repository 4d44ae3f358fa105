//! Room bounds
//!
//! The gallery footprint is centred on the origin: x spans `±width/2`, z spans
//! `±depth/2` and the floor sits at y = 0. Bounds are fixed once the scene is
//! built; controllers only read them.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected room dimensions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomError {
    /// A dimension is zero, negative, NaN or infinite.
    #[error("room {name} must be a positive finite number, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    /// The margin would leave no walkable area.
    #[error("room margin {margin} must be non-negative and below half the smaller side ({limit})")]
    MarginTooLarge { margin: f32, limit: f32 },
}

/// Room-bounds descriptor handed to the navigation core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomBounds {
    /// Extent along X (meters)
    pub width: f32,
    /// Extent along Z (meters)
    pub depth: f32,
    /// Ceiling height (meters)
    pub height: f32,
    /// Default keep-out distance from the walls (meters)
    pub margin: f32,
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self {
            width: 18.0,
            depth: 30.0,
            height: 10.5,
            margin: 0.8,
        }
    }
}

impl RoomBounds {
    /// Creates validated room bounds.
    pub fn new(width: f32, depth: f32, height: f32, margin: f32) -> Result<Self, RoomError> {
        let room = Self {
            width,
            depth,
            height,
            margin,
        };
        room.validate()?;
        Ok(room)
    }

    /// Checks every dimension and the margin invariant.
    pub fn validate(&self) -> Result<(), RoomError> {
        for (name, value) in [("width", self.width), ("depth", self.depth), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RoomError::InvalidDimension { name, value });
            }
        }
        let limit = self.width.min(self.depth) * 0.5;
        if !self.margin.is_finite() || self.margin < 0.0 || self.margin >= limit {
            return Err(RoomError::MarginTooLarge {
                margin: self.margin,
                limit,
            });
        }
        Ok(())
    }

    /// Same room with a different margin.
    ///
    /// Orbit and first-person modes keep different distances from the walls.
    /// The margin is capped just under half the smaller side so the walkable
    /// area never collapses.
    pub fn with_margin(&self, margin: f32) -> Self {
        let limit = self.width.min(self.depth) * 0.5;
        Self {
            margin: margin.max(0.0).min(limit * 0.99),
            ..*self
        }
    }

    /// Half extents of the walkable area on x/z.
    pub fn walkable_half_extents(&self) -> Vec2 {
        Vec2::new(
            (self.width * 0.5 - self.margin).max(0.0),
            (self.depth * 0.5 - self.margin).max(0.0),
        )
    }

    /// Clamps x/z into the walkable area; y is untouched.
    pub fn clamp_xz(&self, p: Vec3) -> Vec3 {
        let half = self.walkable_half_extents();
        Vec3::new(p.x.clamp(-half.x, half.x), p.y, p.z.clamp(-half.y, half.y))
    }

    /// True if x/z lie within the walkable area.
    pub fn contains_xz(&self, p: Vec3) -> bool {
        let half = self.walkable_half_extents();
        p.x.abs() <= half.x && p.z.abs() <= half.y
    }

    /// Vertical band `[inset, height - inset]` used to keep a camera off the
    /// floor and ceiling.
    pub fn clamp_y(&self, y: f32, inset: f32) -> f32 {
        let lo = inset.min(self.height * 0.5);
        let hi = (self.height - inset).max(lo);
        y.clamp(lo, hi)
    }
}
