//! Guide patrol script
//!
//! A guide walks a closed loop of waypoints, pausing at each one before
//! heading to the next. Steering itself is the [`Navigator`]'s job; the guide
//! only decides where to go and when.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::navigator::{AgentNavState, NavOutcome, Navigator};
use crate::physics::ProximityProbe;
use crate::world::RoomBounds;

/// One guide's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub name: String,
    /// Patrol loop; the guide spawns on the first point. Empty means "use the
    /// hall's default route".
    pub waypoints: Vec<Vec3>,
    /// Pause at each waypoint (seconds)
    pub dwell_time: f32,
    /// Overrides the navigator's default speed (m/s)
    pub speed: Option<f32>,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            name: "guide".to_string(),
            waypoints: Vec::new(),
            dwell_time: 1.5,
            speed: None,
        }
    }
}

/// A patrolling agent.
#[derive(Debug, Clone)]
pub struct Guide {
    name: String,
    nav: AgentNavState,
    waypoints: Vec<Vec3>,
    index: usize,
    dwell_time: f32,
    dwell_remaining: f32,
}

impl Guide {
    /// Spawn on the first waypoint, heading for the second.
    ///
    /// With fewer than two waypoints the guide simply stands still.
    pub fn new(config: &GuideConfig, default_speed: f32) -> Self {
        let spawn = config.waypoints.first().copied().unwrap_or(Vec3::ZERO);
        let mut nav = AgentNavState::new(spawn, config.speed.unwrap_or(default_speed));
        let index = if config.waypoints.len() > 1 { 1 } else { 0 };
        if let Some(&next) = config.waypoints.get(index) {
            nav.set_target(next);
        }

        Self {
            name: config.name.clone(),
            nav,
            waypoints: config.waypoints.clone(),
            index,
            dwell_time: config.dwell_time.max(0.0),
            dwell_remaining: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nav(&self) -> &AgentNavState {
        &self.nav
    }

    pub fn position(&self) -> Vec3 {
        self.nav.position
    }

    pub fn facing(&self) -> f32 {
        self.nav.facing
    }

    pub fn target(&self) -> Vec3 {
        self.nav.target()
    }

    /// Waypoint currently being walked to (or dwelt at).
    pub fn waypoint_index(&self) -> usize {
        self.index
    }

    pub fn is_dwelling(&self) -> bool {
        self.dwell_remaining > 0.0
    }

    /// Point the guide somewhere else right away. No-op if already headed
    /// there.
    pub fn retarget(&mut self, target: Vec3) -> bool {
        self.dwell_remaining = 0.0;
        self.nav.set_target(target)
    }

    /// Advance one tick. Returns the new target whenever it changed, either
    /// because the patrol moved on or because stuck recovery nudged it.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        navigator: &Navigator,
        dt: f32,
        probe: &impl ProximityProbe,
        room: &RoomBounds,
        rng: &mut R,
    ) -> Option<Vec3> {
        if self.dwell_remaining > 0.0 {
            self.dwell_remaining -= crate::clamp_dt(dt, navigator.config().max_dt);
            if self.dwell_remaining > 0.0 {
                return None;
            }
            self.dwell_remaining = 0.0;
            return self.advance();
        }

        let step = navigator.step(&mut self.nav, dt, probe, room, rng);
        match step.outcome {
            NavOutcome::Arrived if self.waypoints.len() > 1 => {
                if self.dwell_time > 0.0 {
                    log::trace!("{} dwelling at waypoint {}", self.name, self.index);
                    self.dwell_remaining = self.dwell_time;
                    None
                } else {
                    self.advance()
                }
            }
            NavOutcome::Blocked {
                retargeted: Some(target),
                ..
            } => Some(target),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.waypoints.len();
        let next = self.waypoints[self.index];
        self.nav.set_target(next).then(|| {
            log::debug!("{} heading to waypoint {} at {next:?}", self.name, self.index);
            next
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NoObstacles;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square() -> GuideConfig {
        GuideConfig {
            name: "square".to_string(),
            waypoints: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            dwell_time: 0.5,
            speed: Some(2.0),
        }
    }

    #[test]
    fn test_spawns_on_first_waypoint() {
        let guide = Guide::new(&square(), 0.9);
        assert_eq!(guide.position(), Vec3::ZERO);
        assert_eq!(guide.target(), Vec3::X);
        assert_eq!(guide.nav().speed, 2.0);
    }

    #[test]
    fn test_dwells_then_moves_on() {
        let nav = Navigator::default();
        let room = RoomBounds::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut guide = Guide::new(&square(), 0.9);

        // Walk to waypoint 1 (5 ticks), arrive, start dwelling
        for _ in 0..8 {
            guide.update(&nav, 0.1, &NoObstacles, &room, &mut rng);
        }
        assert!(guide.is_dwelling());
        assert_eq!(guide.target(), Vec3::X);

        // Dwell runs out after 0.5 s and the next waypoint is announced
        let mut announced = None;
        for _ in 0..10 {
            if let Some(t) = guide.update(&nav, 0.1, &NoObstacles, &room, &mut rng) {
                announced = Some(t);
                break;
            }
        }
        assert_eq!(announced, Some(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(guide.waypoint_index(), 2);
    }

    #[test]
    fn test_loop_wraps() {
        let mut guide = Guide::new(&square(), 0.9);
        guide.index = 2;
        assert_eq!(guide.advance(), Some(Vec3::ZERO));
        assert_eq!(guide.waypoint_index(), 0);
    }

    #[test]
    fn test_single_waypoint_stands_still() {
        let nav = Navigator::default();
        let config = GuideConfig {
            waypoints: vec![Vec3::new(2.0, 0.0, 2.0)],
            ..GuideConfig::default()
        };
        let mut guide = Guide::new(&config, 0.9);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert!(guide.update(&nav, 0.1, &NoObstacles, &RoomBounds::default(), &mut rng).is_none());
        }
        assert_eq!(guide.position(), Vec3::new(2.0, 0.0, 2.0));
        assert!(!guide.is_dwelling());
    }

    #[test]
    fn test_retarget_same_point_is_noop() {
        let mut guide = Guide::new(&square(), 0.9);
        assert!(!guide.retarget(Vec3::X));
        assert!(guide.retarget(Vec3::new(3.0, 0.0, 3.0)));
    }
}
