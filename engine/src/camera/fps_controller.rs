//! FPS Camera Controller Module
//!
//! First-person walking for the gallery. Mouse movement directly rotates the
//! view (pointer lock, no smoothing); held keys walk on the floor plane at a
//! fixed eye height.
//!
//! Key features:
//! - Direct mouse input → camera rotation (default: 0.002 rad/pixel)
//! - Pitch clamped to ±89 degrees to prevent gimbal lock
//! - Forward/back is resolved first, then strafe is probed from where the
//!   forward step ended, so a wall ahead stops forward motion while sliding
//!   along it still works and a diagonal cannot cut a corner
//! - Frame delta capped (default: 33 ms) so a hitch cannot tunnel through a wall

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clamp_dt;
use crate::input::MovementKeys;
use crate::physics::ProximityProbe;
use crate::world::RoomBounds;

/// Pitch limit constant: -89 degrees in radians
const PITCH_LIMIT_MIN: f32 = -89.0 * std::f32::consts::PI / 180.0;
/// Pitch limit constant: +89 degrees in radians
const PITCH_LIMIT_MAX: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First-person tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    /// Spawn position on mode entry
    pub start_position: Vec3,
    /// Spawn yaw on mode entry (0 = looking toward -Z)
    pub start_yaw: f32,
    /// Eye height above the floor, pinned every frame (meters)
    pub eye_height: f32,
    /// Walking speed (m/s)
    pub walk_speed: f32,
    /// Sprinting speed (m/s)
    pub sprint_speed: f32,
    /// Upper bound on a single frame's delta (seconds)
    pub max_dt: f32,
    /// Distance kept from walls along each movement axis (meters)
    pub wall_clearance: f32,
    /// Mouse sensitivity in radians per pixel
    pub sensitivity: f32,
    /// Keep-out distance from the room walls in this mode (meters). Applied
    /// by [`ActiveController::room_for`](super::ActiveController::room_for);
    /// the controller itself clamps with the margin of the room it is given.
    pub room_margin: f32,
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.6, 6.0),
            start_yaw: 0.0,
            eye_height: 1.6,
            walk_speed: 3.0,
            sprint_speed: 6.0,
            max_dt: 0.033,
            wall_clearance: 0.6,
            sensitivity: 0.002, // 0.002 rad/pixel
            room_margin: 0.6,
        }
    }
}

/// FPS Camera Controller
///
/// ## Usage
/// ```rust,ignore
/// let mut camera = FpsController::new(FpsConfig::default());
///
/// // Pointer-lock look, raw pixels
/// camera.apply_mouse_delta(mouse_dx, mouse_dy);
///
/// // Walk against the gallery's obstacles
/// camera.update(&keys, dt, &obstacles, &room);
/// ```
#[derive(Clone, Debug)]
pub struct FpsController {
    /// Camera position in world space (y is always the eye height)
    pub position: Vec3,
    /// Horizontal angle (radians) - unrestricted, wraps around
    pub yaw: f32,
    /// Vertical angle (radians) - clamped to ±89 degrees
    pub pitch: f32,
    config: FpsConfig,
}

impl Default for FpsController {
    fn default() -> Self {
        Self::new(FpsConfig::default())
    }
}

impl FpsController {
    /// Create a controller at the configured start pose.
    pub fn new(config: FpsConfig) -> Self {
        Self {
            position: Vec3::new(config.start_position.x, config.eye_height, config.start_position.z),
            yaw: config.start_yaw,
            pitch: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &FpsConfig {
        &self.config
    }

    /// Get the current camera position
    #[inline]
    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    /// Apply mouse movement delta to rotate the camera
    ///
    /// # Arguments
    /// * `dx` - Mouse movement in X (pixels). Positive = look right (increase yaw)
    /// * `dy` - Mouse movement in Y (pixels). Positive = look down (decrease pitch)
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.yaw += dx * self.config.sensitivity;
        self.pitch -= dy * self.config.sensitivity;
        self.pitch = self.pitch.clamp(PITCH_LIMIT_MIN, PITCH_LIMIT_MAX);
    }

    /// Get the camera's forward direction vector
    ///
    /// # Coordinate System
    /// - +X = right
    /// - +Y = up
    /// - -Z = forward
    ///
    /// When yaw=0 and pitch=0, camera looks toward -Z.
    #[inline]
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Forward direction flattened onto the floor plane.
    #[inline]
    pub fn get_flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Right direction on the floor plane.
    #[inline]
    pub fn get_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Go back to the configured start pose.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Walk one frame.
    ///
    /// Returns the displacement actually applied after collision and the
    /// clamp into `room` (minus its margin).
    pub fn update(
        &mut self,
        keys: &MovementKeys,
        dt: f32,
        probe: &impl ProximityProbe,
        room: &RoomBounds,
    ) -> Vec3 {
        let dt = clamp_dt(dt, self.config.max_dt);
        let start = self.position;

        let wish = glam::Vec2::new(keys.right_axis() as f32, keys.forward_axis() as f32);
        if dt > 0.0 && wish != glam::Vec2::ZERO {
            let speed = if keys.sprint {
                self.config.sprint_speed
            } else {
                self.config.walk_speed
            };
            let step = wish.normalize() * speed * dt;

            let forward = self.get_flat_forward();
            let right = self.get_right();
            let along = self.resolve_axis(forward, step.y, probe);
            self.position += forward * along;
            let across = self.resolve_axis(right, step.x, probe);
            self.position += right * across;
        }

        self.position.y = self.config.eye_height;
        self.position = room.clamp_xz(self.position);
        self.position - start
    }

    /// How far a signed movement component may go along `axis`.
    ///
    /// Probes with `far = |amount| + clearance`; on a hit the component is
    /// clamped to `hit - clearance`, never negative.
    fn resolve_axis(&self, axis: Vec3, amount: f32, probe: &impl ProximityProbe) -> f32 {
        let distance = amount.abs();
        if distance <= 0.0 {
            return 0.0;
        }
        let dir = axis * amount.signum();
        let clearance = self.config.wall_clearance;
        let result = probe.cast(self.position, dir, distance + clearance);
        let allowed = match result.hit_distance {
            Some(hit) => (hit - clearance).clamp(0.0, distance),
            None => distance,
        };
        if allowed < distance {
            log::trace!("fps step along {dir:?} clamped {distance:.3} -> {allowed:.3}");
        }
        allowed * amount.signum()
    }

    /// View ray used for door interaction: `(eye, direction)`.
    pub fn view_ray(&self) -> (Vec3, Vec3) {
        (self.position, self.get_forward())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NoObstacles;

    fn room() -> RoomBounds {
        RoomBounds::default()
    }

    fn forward_keys() -> MovementKeys {
        MovementKeys {
            forward: true,
            ..MovementKeys::default()
        }
    }

    #[test]
    fn test_default_values() {
        let camera = FpsController::default();
        assert_eq!(camera.position, Vec3::new(0.0, 1.6, 6.0));
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.config().sensitivity, 0.002);
    }

    #[test]
    fn test_apply_mouse_delta_yaw() {
        let mut camera = FpsController::default();
        camera.apply_mouse_delta(100.0, 0.0);

        // Yaw should increase by 100 * 0.002 = 0.2 radians
        assert!((camera.yaw - 0.2).abs() < 0.001);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_pitch_clamping() {
        let mut camera = FpsController::default();
        camera.apply_mouse_delta(0.0, -100000.0);
        let max_pitch = 89.0 * std::f32::consts::PI / 180.0;
        assert!((camera.pitch - max_pitch).abs() < 0.001);

        camera.apply_mouse_delta(0.0, 200000.0);
        assert!((camera.pitch + max_pitch).abs() < 0.001);
    }

    #[test]
    fn test_forward_vector_at_start() {
        let forward = FpsController::default().get_forward();
        assert!(forward.x.abs() < 0.001);
        assert!(forward.y.abs() < 0.001);
        assert!((forward.z - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_right_vector_perpendicular() {
        let mut camera = FpsController::default();
        camera.apply_mouse_delta(50.0, 30.0);
        assert!(camera.get_flat_forward().dot(camera.get_right()).abs() < 0.001);
        assert!(camera.get_forward().dot(camera.get_right()).abs() < 0.001);
    }

    #[test]
    fn test_walk_open_floor() {
        let mut camera = FpsController::default();
        let moved = camera.update(&forward_keys(), 0.02, &NoObstacles, &room());
        // 3 m/s * 0.02 s toward -Z
        assert!((moved - Vec3::new(0.0, 0.0, -0.06)).length() < 1e-5);
    }

    #[test]
    fn test_sprint_and_dt_cap() {
        let mut camera = FpsController::default();
        let keys = MovementKeys {
            sprint: true,
            ..forward_keys()
        };
        // dt capped to 0.033 -> 6 * 0.033
        let moved = camera.update(&keys, 1.0, &NoObstacles, &room());
        assert!((moved.length() - 0.198).abs() < 1e-4);
    }

    #[test]
    fn test_diagonal_not_faster() {
        let mut camera = FpsController::default();
        let keys = MovementKeys {
            right: true,
            ..forward_keys()
        };
        let moved = camera.update(&keys, 0.02, &NoObstacles, &room());
        assert!((moved.length() - 0.06).abs() < 1e-5);
    }

    #[test]
    fn test_wall_close_ahead_stops_forward() {
        let mut camera = FpsController::default();
        // Wall 0.5 ahead on -Z only
        let probe = |_o: Vec3, d: Vec3, _m: f32| (d.z < -0.9).then_some(0.5_f32);
        let moved = camera.update(&forward_keys(), 0.02, &probe, &room());
        assert_eq!(moved, Vec3::ZERO);
    }

    #[test]
    fn test_wall_clamps_partial_step() {
        let mut camera = FpsController::default();
        // hit at 0.62 leaves 0.02 of the 0.06 step
        let probe = |_o: Vec3, d: Vec3, _m: f32| (d.z < -0.9).then_some(0.62_f32);
        let moved = camera.update(&forward_keys(), 0.02, &probe, &room());
        assert!((moved.z + 0.02).abs() < 1e-4);
    }

    #[test]
    fn test_eye_height_pinned() {
        let mut camera = FpsController::default();
        camera.position.y = 5.0;
        camera.update(&MovementKeys::default(), 0.016, &NoObstacles, &room());
        assert_eq!(camera.position.y, 1.6);
    }

    #[test]
    fn test_room_clamp_uses_room_margin() {
        let mut camera = FpsController::default();
        let room = RoomBounds::new(18.0, 30.0, 10.5, 1.0).unwrap();
        camera.position = Vec3::new(100.0, 0.0, -100.0);
        camera.update(&MovementKeys::default(), 0.016, &NoObstacles, &room);
        assert_eq!(camera.position.x, 9.0 - room.margin);
        assert_eq!(camera.position.z, -(15.0 - room.margin));
    }

    #[test]
    fn test_strafe_probed_after_forward_step() {
        let mut camera = FpsController::default();
        let keys = MovementKeys {
            right: true,
            ..forward_keys()
        };
        // Only the strafe ray cast from the already advanced spot is blocked
        let probe = |o: Vec3, d: Vec3, _m: f32| (d.x > 0.9 && o.z < 6.0).then_some(0.6_f32);
        let moved = camera.update(&keys, 0.02, &probe, &room());
        assert!(moved.z < 0.0);
        assert_eq!(moved.x, 0.0);
    }

    #[test]
    fn test_bad_dt_does_not_move() {
        let mut camera = FpsController::default();
        let start = camera.position;
        camera.update(&forward_keys(), f32::NAN, &NoObstacles, &room());
        camera.update(&forward_keys(), -0.5, &NoObstacles, &room());
        assert_eq!(camera.position, start);
    }
}
