//! Raycast Module
//!
//! Screen-space picking for click-to-move: builds the world ray through a
//! viewport point and intersects it with the floor.
//!
//! Viewport coordinates are `(0,0)` at the top-left and `(1,1)` at the
//! bottom-right, matching window cursor positions divided by the window size.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Projection parameters needed to turn a viewport point into a ray.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Screen aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            fov: 85.0_f32.to_radians(),
        }
    }
}

/// Where a screen ray meets the floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorHit {
    /// Intersection point (y = plane height)
    pub point: Vec3,
    /// Normalised ray direction
    pub direction: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// Calculate ray direction from a viewport point
///
/// # Arguments
/// * `camera_pos` - Camera position in world space
/// * `camera_target` - Point the camera is looking at
/// * `viewport` - Viewport-relative position, `(0,0)` top-left
/// * `config` - Aspect ratio and field of view
///
/// # Returns
/// Normalized ray direction in world space, or `None` if the camera has no
/// defined forward (position equals target)
pub fn get_ray_direction(
    camera_pos: Vec3,
    camera_target: Vec3,
    viewport: Vec2,
    config: &RaycastConfig,
) -> Option<Vec3> {
    let forward = (camera_target - camera_pos).try_normalize()?;
    let ndc = Vec2::new(viewport.x * 2.0 - 1.0, 1.0 - viewport.y * 2.0);
    let half_fov = (config.fov * 0.5).tan();

    // Handle edge case when looking straight up/down
    let right = if forward.y.abs() > 0.99 {
        Vec3::X
    } else {
        forward.cross(Vec3::Y).normalize()
    };
    let up = right.cross(forward).normalize();

    (forward + right * ndc.x * config.aspect_ratio * half_fov + up * ndc.y * half_fov).try_normalize()
}

/// Intersect a ray with the horizontal plane `y = plane_height`.
///
/// Returns the distance along the ray, or `None` if the ray is parallel to the
/// plane or the plane is behind the origin.
pub fn intersect_plane(origin: Vec3, direction: Vec3, plane_height: f32) -> Option<f32> {
    // Ray: P = origin + t * direction
    // Solve: origin.y + t * direction.y = plane_height
    if direction.y.abs() < 0.0001 {
        return None;
    }
    let t = (plane_height - origin.y) / direction.y;
    (t >= 0.0 && t.is_finite()).then_some(t)
}

/// Raycast from a viewport point to the floor plane at y = 0
pub fn raycast_to_floor(
    camera_pos: Vec3,
    camera_target: Vec3,
    viewport: Vec2,
    config: &RaycastConfig,
) -> Option<FloorHit> {
    let direction = get_ray_direction(camera_pos, camera_target, viewport, config)?;
    let distance = intersect_plane(camera_pos, direction, 0.0)?;
    Some(FloorHit {
        point: camera_pos + direction * distance,
        direction,
        distance,
    })
}
