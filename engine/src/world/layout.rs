//! Gallery layout
//!
//! Builds the obstacle feed for the default gallery hall: four walls with a
//! doorway cut into the front wall, the lintel above it, two divider slabs
//! with a walk-through gap, the floor slab, and the door with its blocker.
//!
//! Everything decorative (artwork, stands, lights) lives outside this crate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::door::{Door, DoorConfig};
use super::room::{RoomBounds, RoomError};
use crate::physics::collision::{Aabb, ObstacleSet};

/// Tunables for the generated hall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub room: RoomBounds,
    pub door: DoorConfig,
    /// Wall and divider thickness (meters)
    pub wall_thickness: f32,
    /// How far inside the front wall plane the door sits (meters)
    pub door_inset: f32,
    /// Width of the opening between the two dividers (meters)
    pub divider_gap: f32,
    /// Divider plane as a fraction of depth (negative = toward the back wall)
    pub divider_z_fraction: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            room: RoomBounds::default(),
            door: DoorConfig::default(),
            wall_thickness: 0.22,
            door_inset: 0.18,
            divider_gap: 5.2,
            divider_z_fraction: -0.10,
        }
    }
}

/// The built hall: bounds, solid bodies and the door.
#[derive(Debug, Clone)]
pub struct GalleryLayout {
    pub room: RoomBounds,
    pub obstacles: ObstacleSet,
    pub door: Door,
}

impl GalleryLayout {
    /// Builds the default hall from `config`.
    pub fn build(config: &LayoutConfig) -> Result<Self, RoomError> {
        let room = config.room;
        room.validate()?;

        let (w, d, h) = (room.width, room.depth, room.height);
        let t = config.wall_thickness;
        let door_w = config.door.width.min(w - t);
        let door_h = config.door.height.min(h);
        let front_z = d * 0.5;

        let mut obstacles = ObstacleSet::new();
        let wall = |center: Vec3, size: Vec3| Aabb::from_center_size(center, size);

        obstacles.add("backWall", wall(Vec3::new(0.0, h * 0.5, -front_z), Vec3::new(w, h, t)));
        obstacles.add("leftWall", wall(Vec3::new(-w * 0.5, h * 0.5, 0.0), Vec3::new(t, h, d)));
        obstacles.add("rightWall", wall(Vec3::new(w * 0.5, h * 0.5, 0.0), Vec3::new(t, h, d)));

        // Front wall in three pieces around the doorway
        let side_w = (w - door_w) * 0.5;
        let side_x = door_w * 0.5 + side_w * 0.5;
        obstacles.add("frontWallLeft", wall(Vec3::new(-side_x, h * 0.5, front_z), Vec3::new(side_w, h, t)));
        obstacles.add("frontWallRight", wall(Vec3::new(side_x, h * 0.5, front_z), Vec3::new(side_w, h, t)));
        let top_h = h - door_h;
        if top_h > 0.0 {
            obstacles.add(
                "frontWallTop",
                wall(Vec3::new(0.0, door_h + top_h * 0.5, front_z), Vec3::new(door_w, top_h, t)),
            );
        }

        obstacles.add("floor", Aabb::new(Vec3::new(-w * 0.5, -0.1, -front_z), Vec3::new(w * 0.5, 0.0, front_z)));

        let divider_z = d * config.divider_z_fraction;
        let gap = config.divider_gap.clamp(0.0, w);
        let divider_w = (w - gap) * 0.5;
        if divider_w > 0.0 {
            let divider_x = gap * 0.5 + divider_w * 0.5;
            obstacles.add(
                "leftDivider",
                wall(Vec3::new(-divider_x, h * 0.5, divider_z), Vec3::new(divider_w, h, t)),
            );
            obstacles.add(
                "rightDivider",
                wall(Vec3::new(divider_x, h * 0.5, divider_z), Vec3::new(divider_w, h, t)),
            );
        }

        let door_config = DoorConfig {
            width: door_w,
            height: door_h,
            thickness: t,
            ..config.door
        };
        let door = Door::new(door_config, Vec3::new(0.0, 0.0, front_z - config.door_inset), &mut obstacles);

        log::debug!(
            "gallery layout built: {}x{}x{} room, {} obstacles",
            w,
            d,
            h,
            obstacles.len()
        );

        Ok(Self { room, obstacles, door })
    }

    /// Z of the divider plane.
    pub fn divider_z(config: &LayoutConfig) -> f32 {
        config.room.depth * config.divider_z_fraction
    }

    /// Default patrol loops, feet on the floor.
    ///
    /// The first circles the front hall; the second passes through the
    /// divider gap on x = 0 and loops the back hall.
    pub fn guide_routes(&self) -> Vec<Vec<Vec3>> {
        let x = self.room.width * 0.28;
        let d = self.room.depth;
        let front = vec![
            Vec3::new(-x, 0.0, d / 3.0),
            Vec3::new(x, 0.0, d / 3.0),
            Vec3::new(x, 0.0, d / 15.0),
            Vec3::new(-x, 0.0, d / 15.0),
        ];
        let back = vec![
            Vec3::new(0.0, 0.0, d * 0.1),
            Vec3::new(0.0, 0.0, -d * 0.25),
            Vec3::new(-x, 0.0, -d * 0.35),
            Vec3::new(x, 0.0, -d * 0.35),
            Vec3::new(0.0, 0.0, -d * 0.25),
        ];
        vec![front, back]
    }
}
