//! Door State Machine
//!
//! Two hinged leaves in the gallery entrance. A use request only counts when
//! the visitor is looking at the door from close range; the leaves then ease
//! toward the open (or closed) angle with exponential smoothing.
//!
//! ## Collision policy
//!
//! The invisible blocker tracks *intent*: it is disabled the moment the door
//! starts opening and re-enabled the moment it starts closing. Walkers can
//! step through before the animation settles, at the cost of a brief mismatch
//! between what is drawn and what is solid.
//!
//! ## Geometry
//!
//! The door base sits at `position` (floor level, doorway centre). Leaves hinge
//! at `x = ±leaf_gap/2` and swing out of the room toward +Z. The left leaf
//! carries the negative angle, the right leaf the positive one.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clamp_dt;
use crate::physics::collision::{Aabb, ObstacleId, ObstacleSet, ray_aabb_intersect};

/// Label under which the blocker is registered in the obstacle set.
pub const DOOR_BLOCKER_LABEL: &str = "doorBlocker";

/// Door dimensions and animation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Doorway opening width (meters)
    pub width: f32,
    /// Doorway opening height (meters)
    pub height: f32,
    /// Wall thickness the door sits in (meters)
    pub thickness: f32,
    /// Frame moulding size around the opening (meters)
    pub frame: f32,
    /// Gap between the two leaves at the centre line (meters)
    pub leaf_gap: f32,
    /// Swing magnitude when fully open (radians)
    pub open_angle: f32,
    /// Exponential smoothing rate (1/s)
    pub smoothing_speed: f32,
    /// Farthest gaze distance that still counts as "using" the door (meters)
    pub gaze_distance: f32,
    /// Angle error below which a transition is considered finished (radians)
    pub snap_epsilon: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 7.5,
            thickness: 0.22,
            frame: 0.28,
            leaf_gap: 0.08,
            open_angle: std::f32::consts::PI / 2.4,
            smoothing_speed: 6.0,
            gaze_distance: 2.2,
            snap_epsilon: 1e-3,
        }
    }
}

impl DoorConfig {
    /// Width of a single leaf.
    pub fn leaf_width(&self) -> f32 {
        ((self.width - self.leaf_gap) * 0.5).max(0.0)
    }

    /// Thickness of a single leaf.
    pub fn leaf_thickness(&self) -> f32 {
        self.thickness * 0.55
    }

    /// Size of the invisible collision volume filling the doorway.
    pub fn blocker_size(&self) -> Vec3 {
        Vec3::new(self.width * 0.92, self.height * 0.94, 0.35)
    }
}

/// Door animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoorState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl DoorState {
    /// True while the door is heading to (or resting at) open.
    pub fn wants_open(self) -> bool {
        matches!(self, DoorState::Opening | DoorState::Open)
    }

    /// True while the leaves are moving.
    pub fn is_transitioning(self) -> bool {
        matches!(self, DoorState::Opening | DoorState::Closing)
    }
}

/// The gallery door with its collision blocker.
#[derive(Debug, Clone)]
pub struct Door {
    config: DoorConfig,
    position: Vec3,
    state: DoorState,
    /// Current swing of the left leaf (radians, <= 0)
    angle_left: f32,
    /// Current swing of the right leaf (radians, >= 0)
    angle_right: f32,
    /// Target swing magnitude
    target_angle: f32,
    blocker: ObstacleId,
}

impl Door {
    /// Builds a closed door and registers its blocker in `obstacles`.
    pub fn new(config: DoorConfig, position: Vec3, obstacles: &mut ObstacleSet) -> Self {
        let blocker_bounds = Aabb::from_center_size(
            position + Vec3::new(0.0, config.height * 0.5, 0.0),
            config.blocker_size(),
        );
        let blocker = obstacles.add(DOOR_BLOCKER_LABEL, blocker_bounds);
        obstacles.set_enabled(blocker, true);

        Self {
            config,
            position,
            state: DoorState::Closed,
            angle_left: 0.0,
            angle_right: 0.0,
            target_angle: 0.0,
            blocker,
        }
    }

    pub fn config(&self) -> &DoorConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Handle of the blocker inside the obstacle set.
    pub fn blocker(&self) -> ObstacleId {
        self.blocker
    }

    /// Current `(left, right)` leaf angles in radians.
    pub fn leaf_angles(&self) -> (f32, f32) {
        (self.angle_left, self.angle_right)
    }

    /// Current swing magnitude (both leaves are symmetric).
    pub fn swing(&self) -> f32 {
        self.angle_right.abs()
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    /// Intent flag: true once an open has been requested and not revoked.
    pub fn is_open(&self) -> bool {
        self.state.wants_open()
    }

    /// Starts opening. No-op if already opening or open.
    ///
    /// Returns the new state when a transition started.
    pub fn open(&mut self, obstacles: &mut ObstacleSet) -> Option<DoorState> {
        if self.state.wants_open() {
            return None;
        }
        self.target_angle = self.config.open_angle;
        obstacles.set_enabled(self.blocker, false);
        self.set_state(DoorState::Opening)
    }

    /// Starts closing. No-op if already closing or closed.
    pub fn close(&mut self, obstacles: &mut ObstacleSet) -> Option<DoorState> {
        if !self.state.wants_open() {
            return None;
        }
        self.target_angle = 0.0;
        obstacles.set_enabled(self.blocker, true);
        self.set_state(DoorState::Closing)
    }

    /// Flips the door's intent without a gaze check.
    ///
    /// A toggle mid-transition reverses direction.
    pub fn force_toggle(&mut self, obstacles: &mut ObstacleSet) -> Option<DoorState> {
        if self.state.wants_open() {
            self.close(obstacles)
        } else {
            self.open(obstacles)
        }
    }

    /// Toggles the door if the view ray from `eye` along `look_dir` hits the
    /// door within the gaze distance. Otherwise nothing changes.
    pub fn toggle(&mut self, eye: Vec3, look_dir: Vec3, obstacles: &mut ObstacleSet) -> Option<DoorState> {
        if !self.is_gazed_at(eye, look_dir) {
            log::trace!("door use ignored: not in view or out of range");
            return None;
        }
        self.force_toggle(obstacles)
    }

    /// Advances the leaf animation.
    ///
    /// Returns `Some(Open | Closed)` on the frame a transition completes.
    pub fn update(&mut self, dt: f32) -> Option<DoorState> {
        let dt = clamp_dt(dt, f32::MAX);
        if !self.state.is_transitioning() {
            return None;
        }

        let t = 1.0 - (-self.config.smoothing_speed * dt).exp();
        self.angle_left += (-self.target_angle - self.angle_left) * t;
        self.angle_right += (self.target_angle - self.angle_right) * t;

        if (self.target_angle - self.angle_right).abs() < self.config.snap_epsilon {
            self.angle_left = -self.target_angle;
            self.angle_right = self.target_angle;
            let settled = if self.state == DoorState::Opening {
                DoorState::Open
            } else {
                DoorState::Closed
            };
            return self.set_state(settled);
        }
        None
    }

    fn set_state(&mut self, state: DoorState) -> Option<DoorState> {
        log::debug!("door {:?} -> {:?}", self.state, state);
        self.state = state;
        Some(state)
    }

    // ============================================
    // Gaze / hierarchy geometry
    // ============================================

    /// Conservative boxes for every part of the door: frame, blocker volume
    /// and both leaves at their current swing.
    pub fn hierarchy_bounds(&self) -> Vec<Aabb> {
        let c = &self.config;
        let p = self.position;
        let depth = c.thickness * 0.8;
        let span = c.width + c.frame * 2.0;

        let mut parts = vec![
            // Lintel
            Aabb::from_center_size(
                p + Vec3::new(0.0, c.height + c.frame * 0.5, 0.0),
                Vec3::new(span, c.frame, depth),
            ),
            // Sill
            Aabb::from_center_size(p + Vec3::new(0.0, c.frame * 0.5, 0.0), Vec3::new(span, c.frame, depth)),
            // Jambs
            Aabb::from_center_size(
                p + Vec3::new(-(c.width + c.frame) * 0.5, c.height * 0.5, 0.0),
                Vec3::new(c.frame, c.height, depth),
            ),
            Aabb::from_center_size(
                p + Vec3::new((c.width + c.frame) * 0.5, c.height * 0.5, 0.0),
                Vec3::new(c.frame, c.height, depth),
            ),
            // Blocker volume counts for gaze even while disabled
            Aabb::from_center_size(p + Vec3::new(0.0, c.height * 0.5, 0.0), c.blocker_size()),
        ];
        parts.push(self.leaf_bounds(-1.0, self.angle_left.abs()));
        parts.push(self.leaf_bounds(1.0, self.angle_right.abs()));
        parts
    }

    /// Box around one leaf. `side` is -1 for the left leaf, +1 for the right.
    fn leaf_bounds(&self, side: f32, swing: f32) -> Aabb {
        let c = &self.config;
        let hinge = self.position + Vec3::new(side * c.leaf_gap * 0.5, 0.0, 0.0);
        let along = Vec3::new(side * swing.cos(), 0.0, swing.sin());
        let across = Vec3::new(-along.z, 0.0, along.x) * (c.leaf_thickness() * 0.5);
        let tip = hinge + along * c.leaf_width();
        let top = Vec3::Y * c.height;

        Aabb::from_points(&[
            hinge + across,
            hinge - across,
            tip + across + top,
            tip - across + top,
        ])
        .unwrap_or(Aabb::new(hinge, hinge + top))
    }

    /// Distance along the view ray to the nearest door part, if within range.
    pub fn gaze_distance(&self, eye: Vec3, look_dir: Vec3) -> Option<f32> {
        let dir = look_dir.try_normalize()?;
        self.hierarchy_bounds()
            .iter()
            .filter_map(|b| ray_aabb_intersect(eye, dir, b))
            .filter(|&t| t <= self.config.gaze_distance)
            .reduce(f32::min)
    }

    /// Gaze-and-range guard for [`Door::toggle`].
    pub fn is_gazed_at(&self, eye: Vec3, look_dir: Vec3) -> bool {
        self.gaze_distance(eye, look_dir).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Door, ObstacleSet) {
        let mut obstacles = ObstacleSet::new();
        let door = Door::new(DoorConfig::default(), Vec3::new(0.0, 0.0, 14.82), &mut obstacles);
        (door, obstacles)
    }

    /// Standing in the room 1.5m in front of the door, looking at it.
    fn facing_door() -> (Vec3, Vec3) {
        (Vec3::new(0.0, 1.6, 13.3), Vec3::Z)
    }

    #[test]
    fn test_door_starts_closed_and_blocking() {
        let (door, obstacles) = setup();
        assert_eq!(door.state(), DoorState::Closed);
        assert!(obstacles.is_enabled(door.blocker()));
        assert_eq!(door.leaf_angles(), (0.0, 0.0));
    }

    #[test]
    fn test_toggle_without_gaze_is_noop() {
        let (mut door, mut obstacles) = setup();
        let (eye, _) = facing_door();
        // Looking away
        assert_eq!(door.toggle(eye, Vec3::NEG_Z, &mut obstacles), None);
        // Looking at it but too far
        assert_eq!(door.toggle(Vec3::new(0.0, 1.6, 5.0), Vec3::Z, &mut obstacles), None);
        assert_eq!(door.state(), DoorState::Closed);
        assert!(obstacles.is_enabled(door.blocker()));
    }

    #[test]
    fn test_toggle_open_disables_blocker_immediately() {
        let (mut door, mut obstacles) = setup();
        let (eye, dir) = facing_door();
        assert_eq!(door.toggle(eye, dir, &mut obstacles), Some(DoorState::Opening));
        assert!(!obstacles.is_enabled(door.blocker()));
        // Angles have not moved yet
        assert_eq!(door.swing(), 0.0);
    }

    #[test]
    fn test_opening_converges_monotonically() {
        let (mut door, mut obstacles) = setup();
        door.force_toggle(&mut obstacles);

        let mut last_error = door.target_angle();
        let mut finished = None;
        for _ in 0..200 {
            finished = door.update(1.0 / 60.0);
            let (l, r) = door.leaf_angles();
            assert!(l <= 0.0 && r >= 0.0);
            assert!((l + r).abs() < 1e-5, "leaves must stay symmetric");
            let error = (door.target_angle() - r).abs();
            assert!(error < last_error || error == 0.0);
            last_error = error;
            if finished.is_some() {
                break;
            }
        }
        assert_eq!(finished, Some(DoorState::Open));
        assert_eq!(door.swing(), DoorConfig::default().open_angle);
    }

    #[test]
    fn test_toggle_mid_opening_reverses() {
        let (mut door, mut obstacles) = setup();
        door.force_toggle(&mut obstacles);
        door.update(0.1);
        let swing = door.swing();
        assert_eq!(door.force_toggle(&mut obstacles), Some(DoorState::Closing));
        assert!(obstacles.is_enabled(door.blocker()));
        door.update(0.1);
        assert!(door.swing() < swing);
    }

    #[test]
    fn test_open_is_idempotent() {
        let (mut door, mut obstacles) = setup();
        assert!(door.open(&mut obstacles).is_some());
        assert!(door.open(&mut obstacles).is_none());
        assert_eq!(door.state(), DoorState::Opening);
        assert!(door.close(&mut obstacles).is_some());
        assert!(door.close(&mut obstacles).is_none());
    }

    #[test]
    fn test_bad_dt_does_not_move_leaves() {
        let (mut door, mut obstacles) = setup();
        door.force_toggle(&mut obstacles);
        door.update(f32::NAN);
        door.update(-1.0);
        assert_eq!(door.swing(), 0.0);
        assert_eq!(door.state(), DoorState::Opening);
    }

    #[test]
    fn test_open_leaves_swing_out_of_the_room() {
        let (mut door, mut obstacles) = setup();
        door.force_toggle(&mut obstacles);
        for _ in 0..300 {
            door.update(1.0 / 60.0);
        }
        let bounds = door.hierarchy_bounds();
        let right_leaf = bounds.last().unwrap();
        assert!(right_leaf.max.z > 14.82 + 2.0);
        assert!(right_leaf.min.x > -0.1);
    }
}
