//! Orbit Camera Controller Module
//!
//! Exhibit-mode camera: orbits a movable look-at point on a sphere described
//! by (distance, polar angle, azimuth). Pointer drags and scroll feed pending
//! deltas that are released gradually (damping); clicks on the floor glide the
//! look-at point to a new spot.
//!
//! Per frame, in order:
//! 1. ease the look-at point toward the click target (the camera rides along)
//! 2. apply damped rotation and zoom, clamp distance and polar angle
//! 3. re-solve distance against the proximity probe so geometry never sits
//!    between the look-at point and the lens
//! 4. clamp look-at and camera into the room
//!
//! This is window-system agnostic - it only manages camera state and math.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::move_target::{MoveTargetConfig, MoveTargetTracker};
use super::raycast::{RaycastConfig, raycast_to_floor};
use crate::clamp_dt;
use crate::physics::ProximityProbe;
use crate::world::RoomBounds;

/// Orbit tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Look-at point on mode entry
    pub target: Vec3,
    /// Camera position on mode entry
    pub start_position: Vec3,
    /// Closest allowed camera distance (meters)
    pub min_distance: f32,
    /// Farthest allowed camera distance (meters)
    pub max_distance: f32,
    /// Smallest polar angle from +Y (radians, keeps the camera off the zenith)
    pub min_polar: f32,
    /// Largest polar angle from +Y (radians, keeps the camera above the floor)
    pub max_polar: f32,
    /// Fraction of the pending rotation applied per frame
    pub damping_factor: f32,
    /// Gap kept between the camera and the first obstacle (meters)
    pub collision_offset: f32,
    /// Keep-out distance from the room walls in this mode (meters). Applied
    /// by [`ActiveController::room_for`](super::ActiveController::room_for);
    /// the controller itself clamps with the margin of the room it is given.
    pub room_margin: f32,
    /// Floor/ceiling inset for the vertical clamp (meters)
    pub vertical_inset: f32,
    /// Drag sensitivity (radians per pixel)
    pub rotate_speed: f32,
    /// Distance multiplier per scroll line toward the visitor
    pub zoom_step: f32,
    /// Upper bound on a single frame's delta (seconds)
    pub max_dt: f32,
    pub move_target: MoveTargetConfig,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 2.8, -3.0),
            start_position: Vec3::new(0.0, 1.6, 6.0),
            min_distance: 2.0,
            max_distance: 18.0,
            min_polar: 0.75,
            max_polar: std::f32::consts::PI - 0.85,
            damping_factor: 0.08,
            collision_offset: 0.3,
            room_margin: 0.8,
            vertical_inset: 0.4,
            rotate_speed: 0.005,
            zoom_step: 0.95,
            max_dt: 0.1,
            move_target: MoveTargetConfig::default(),
        }
    }
}

/// Orbit camera state.
///
/// Input handling is done externally and passed in via pixel/line deltas.
#[derive(Clone, Debug)]
pub struct OrbitController {
    config: OrbitConfig,
    /// Look-at point
    target: Vec3,
    /// Final camera position after collision and clamps
    position: Vec3,
    /// Distance the visitor asked for (before collision)
    desired_distance: f32,
    /// Distance actually used this frame
    actual_distance: f32,
    /// Polar angle from +Y (radians)
    polar: f32,
    /// Azimuth around +Y, 0 = camera on +Z side of the target (radians)
    azimuth: f32,
    /// Rotation not yet applied (azimuth, polar)
    pending_rotation: Vec2,
    /// Zoom factor not yet applied
    pending_scale: f32,
    move_target: MoveTargetTracker,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

impl OrbitController {
    /// Create a controller at the configured start pose.
    pub fn new(config: OrbitConfig) -> Self {
        let offset = config.start_position - config.target;
        let distance = offset.length().clamp(config.min_distance, config.max_distance);
        let (polar, azimuth) = if offset.length_squared() > 1e-8 {
            let n = offset.normalize();
            (n.y.clamp(-1.0, 1.0).acos(), n.x.atan2(n.z))
        } else {
            (std::f32::consts::FRAC_PI_2, 0.0)
        };

        let mut controller = Self {
            config,
            target: config.target,
            position: config.start_position,
            desired_distance: distance,
            actual_distance: distance,
            polar: polar.clamp(config.min_polar, config.max_polar),
            azimuth,
            pending_rotation: Vec2::ZERO,
            pending_scale: 1.0,
            move_target: MoveTargetTracker::new(config.move_target),
        };
        controller.position = controller.target + controller.offset_with_distance(distance);
        controller
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Get the camera position
    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    /// Get the look-at point
    pub fn get_target(&self) -> Vec3 {
        self.target
    }

    /// Distance the visitor asked for
    pub fn get_desired_distance(&self) -> f32 {
        self.desired_distance
    }

    /// Get the actual camera distance after collision adjustment
    pub fn get_actual_distance(&self) -> f32 {
        self.actual_distance
    }

    /// `(polar, azimuth)` in radians
    pub fn get_angles(&self) -> (f32, f32) {
        (self.polar, self.azimuth)
    }

    /// Active click-to-move target
    pub fn move_target(&self) -> Option<Vec3> {
        self.move_target.target()
    }

    /// Queue a drag rotation (pixels). Positive dx swings the camera left
    /// around the target, positive dy raises it.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pending_rotation -= Vec2::new(dx, dy) * self.config.rotate_speed;
        }
    }

    /// Queue a zoom. Positive lines move the camera toward the target.
    pub fn zoom(&mut self, lines: f32) {
        if lines.is_finite() {
            self.pending_scale *= self.config.zoom_step.powf(lines);
        }
    }

    /// Turn a viewport click into a floor target.
    ///
    /// The click is rejected if the floor point is hidden behind an obstacle.
    /// Accepted targets are clamped into the room and keep the current
    /// look-at height. Returns the new target.
    pub fn handle_click(
        &mut self,
        viewport: Vec2,
        projection: &RaycastConfig,
        probe: &impl ProximityProbe,
        room: &RoomBounds,
    ) -> Option<Vec3> {
        let hit = raycast_to_floor(self.position, self.target, viewport, projection)?;

        // Leave a little slack so the floor slab itself does not count
        let occluder = probe.cast(self.position, hit.direction, hit.distance - 0.05);
        if occluder.blocked {
            log::debug!("click rejected: floor point hidden at {:?}", occluder.hit_distance);
            return None;
        }

        let point = Vec3::new(hit.point.x, self.target.y, hit.point.z);
        let target = room.clamp_xz(point);
        self.move_target.set(target);
        Some(target)
    }

    /// Set a floor target directly (already in world space), clamped into
    /// the room.
    pub fn set_move_target(&mut self, point: Vec3, room: &RoomBounds) -> Vec3 {
        let target = room.clamp_xz(Vec3::new(point.x, self.target.y, point.z));
        self.move_target.set(target);
        target
    }

    /// Advance one frame.
    pub fn update(&mut self, dt: f32, probe: &impl ProximityProbe, room: &RoomBounds) {
        let dt = clamp_dt(dt, self.config.max_dt);
        let inset = self.config.vertical_inset;

        // 1. Click-to-move glide
        let delta = self.move_target.step(self.target, dt);
        self.target += delta;
        self.target = room.clamp_xz(self.target);
        self.target.y = room.clamp_y(self.target.y, inset);

        // 2. Damped rotation/zoom
        let k = self.config.damping_factor.clamp(0.0, 1.0);
        self.azimuth += self.pending_rotation.x * k;
        self.polar += self.pending_rotation.y * k;
        self.pending_rotation *= 1.0 - k;
        self.polar = self.polar.clamp(self.config.min_polar, self.config.max_polar);

        self.desired_distance = (self.desired_distance * self.pending_scale)
            .clamp(self.config.min_distance, self.config.max_distance);
        self.pending_scale = 1.0;

        // 3. Collision re-solve, after damping
        self.actual_distance = self.solve_collision(probe);
        let mut position = self.target + self.offset_with_distance(self.actual_distance);

        // 4. Room clamp
        position = room.clamp_xz(position);
        position.y = room.clamp_y(position.y, inset);
        self.position = position;
        self.actual_distance = (self.position - self.target).length();
    }

    /// Safe camera distance along the current orbit direction.
    ///
    /// Casts from the look-at point toward the desired camera position; a hit
    /// pulls the camera to `hit - collision_offset`, floored at the minimum
    /// distance.
    pub fn solve_collision(&self, probe: &impl ProximityProbe) -> f32 {
        let direction = self.offset_with_distance(1.0);
        let result = probe.cast(self.target, direction, self.desired_distance);
        match result.hit_distance {
            Some(hit) => {
                let safe = (hit - self.config.collision_offset).max(self.config.min_distance);
                log::trace!("orbit camera pulled in to {safe:.3} (hit at {hit:.3})");
                safe.min(self.desired_distance)
            }
            None => self.desired_distance,
        }
    }

    /// Camera offset from the target for a given distance.
    fn offset_with_distance(&self, distance: f32) -> Vec3 {
        let sin_polar = self.polar.sin();
        Vec3::new(
            sin_polar * self.azimuth.sin(),
            self.polar.cos(),
            sin_polar * self.azimuth.cos(),
        ) * distance
    }

    /// Drop pending input and the move target.
    pub fn clear_transient(&mut self) {
        self.pending_rotation = Vec2::ZERO;
        self.pending_scale = 1.0;
        self.move_target.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NoObstacles;

    #[test]
    fn test_start_pose() {
        let orbit = OrbitController::default();
        assert!((orbit.get_position() - Vec3::new(0.0, 1.6, 6.0)).length() < 1e-4);
        assert_eq!(orbit.get_target(), Vec3::new(0.0, 2.8, -3.0));
        let expected = (81.0_f32 + 1.44).sqrt();
        assert!((orbit.get_desired_distance() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_is_damped() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        let (_, az0) = orbit.get_angles();
        orbit.rotate(-100.0, 0.0); // pending +0.5 rad azimuth
        orbit.update(0.016, &NoObstacles, &room);
        let (_, az1) = orbit.get_angles();
        assert!((az1 - az0 - 0.5 * 0.08).abs() < 1e-5);
        orbit.update(0.016, &NoObstacles, &room);
        let (_, az2) = orbit.get_angles();
        // Second frame releases less than the first
        assert!(az2 - az1 < az1 - az0);
    }

    #[test]
    fn test_polar_clamped() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        orbit.rotate(0.0, -1.0e6);
        for _ in 0..200 {
            orbit.update(0.016, &NoObstacles, &room);
        }
        let (polar, _) = orbit.get_angles();
        assert!((polar - orbit.config().max_polar).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        orbit.zoom(500.0);
        orbit.update(0.016, &NoObstacles, &room);
        assert_eq!(orbit.get_desired_distance(), 2.0);
        orbit.zoom(-500.0);
        orbit.update(0.016, &NoObstacles, &room);
        assert_eq!(orbit.get_desired_distance(), 18.0);
    }

    #[test]
    fn test_collision_pulls_camera_in() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        let probe = |_o: Vec3, _d: Vec3, _m: f32| Some(4.0_f32);
        orbit.update(0.016, &probe, &room);
        assert!(orbit.get_actual_distance() <= 4.0 - 0.3 + 1e-4);
        // Desired distance is remembered
        assert!(orbit.get_desired_distance() > 9.0);
    }

    #[test]
    fn test_collision_floored_at_min_distance() {
        let orbit = OrbitController::default();
        let probe = |_o: Vec3, _d: Vec3, _m: f32| Some(0.5_f32);
        assert_eq!(orbit.solve_collision(&probe), 2.0);
    }

    #[test]
    fn test_camera_stays_in_room() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::new(18.0, 30.0, 10.5, 1.5).unwrap();
        orbit.zoom(-100.0);
        orbit.rotate(300.0, 0.0);
        for _ in 0..120 {
            orbit.update(0.016, &NoObstacles, &room);
            let p = orbit.get_position();
            assert!(p.x.abs() <= 9.0 - room.margin + 1e-4);
            assert!(p.z.abs() <= 15.0 - room.margin + 1e-4);
            assert!(p.y >= 0.4 - 1e-4 && p.y <= 10.1 + 1e-4);
        }
    }

    #[test]
    fn test_move_target_uses_room_margin() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::new(18.0, 30.0, 10.5, 1.0).unwrap();
        let target = orbit.set_move_target(Vec3::new(30.0, 0.0, -40.0), &room);
        assert_eq!(target.x, 8.0);
        assert_eq!(target.z, -14.0);
    }

    #[test]
    fn test_center_click_sets_target_under_view() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        orbit.update(0.016, &NoObstacles, &room);
        // Start camera looks slightly up; the lower edge of the view sees floor
        let target = orbit
            .handle_click(Vec2::new(0.5, 0.95), &RaycastConfig::default(), &NoObstacles, &room)
            .expect("floor under the view");
        assert_eq!(target.y, orbit.get_target().y);
        assert!(orbit.move_target().is_some());
    }

    #[test]
    fn test_occluded_click_rejected() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        let wall = |_o: Vec3, _d: Vec3, _m: f32| Some(1.0_f32);
        let result = orbit.handle_click(Vec2::new(0.5, 0.95), &RaycastConfig::default(), &wall, &room);
        assert!(result.is_none());
        assert!(orbit.move_target().is_none());
    }

    #[test]
    fn test_glide_keeps_offset() {
        let mut orbit = OrbitController::default();
        let room = RoomBounds::default();
        orbit.update(0.016, &NoObstacles, &room);
        let offset = orbit.get_position() - orbit.get_target();
        orbit.set_move_target(Vec3::new(2.0, 0.0, -1.0), &room);
        orbit.update(0.05, &NoObstacles, &room);
        let new_offset = orbit.get_position() - orbit.get_target();
        assert!((offset - new_offset).length() < 1e-4);
    }
}
