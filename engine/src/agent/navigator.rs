//! Local steering for autonomous agents
//!
//! No path graph. Each tick the agent tries, in order:
//! 1. the straight line to its target
//! 2. a sweep of headings at growing angles either side of that line
//! 3. a short step straight back
//!
//! and if nothing worked for long enough, it nudges its own target by a
//! random offset so a reentrant corner stops being a trap.
//!
//! All "is it clear" questions go through the same [`ProximityProbe`] the
//! cameras use, cast at body height.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clamp_dt;
use crate::physics::ProximityProbe;
use crate::world::RoomBounds;

/// Steering tunables shared by every agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Default walking speed (m/s)
    pub speed: f32,
    /// Probe origin height above the agent's feet (meters)
    pub probe_height: f32,
    /// Extra reach of the direct probe beyond the step (meters)
    pub direct_clearance: f32,
    /// Fallback headings relative to the direct line, tried in order (degrees)
    pub sweep_angles_deg: Vec<f32>,
    /// Longest step taken along a sweep heading (meters)
    pub sweep_step: f32,
    /// Extra reach of a sweep probe beyond its step (meters)
    pub sweep_clearance: f32,
    /// Back-off distance when every heading is blocked (meters)
    pub back_step: f32,
    /// Extra reach of the back-off probe (meters)
    pub back_clearance: f32,
    /// Blocked time before the target is perturbed (seconds)
    pub stuck_threshold: f32,
    /// Maximum target perturbation per horizontal axis (meters)
    pub jitter: f32,
    /// Distance at which the target counts as reached (meters)
    pub arrival_epsilon: f32,
    /// Upper bound on a single tick's delta (seconds)
    pub max_dt: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            speed: 0.9,
            probe_height: 1.0,
            direct_clearance: 0.40,
            sweep_angles_deg: vec![25.0, -25.0, 50.0, -50.0, 75.0, -75.0, 110.0, -110.0],
            sweep_step: 0.25,
            sweep_clearance: 0.35,
            back_step: 0.18,
            back_clearance: 0.25,
            stuck_threshold: 1.2,
            jitter: 0.6,
            arrival_epsilon: 0.02,
            max_dt: 0.1,
        }
    }
}

/// Per-agent steering state.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentNavState {
    /// Feet position; y is left alone by the navigator
    pub position: Vec3,
    /// Heading around +Y, 0 = facing +Z (radians)
    pub facing: f32,
    /// Walking speed (m/s)
    pub speed: f32,
    target: Vec3,
    stuck_time: f32,
}

impl AgentNavState {
    /// An agent standing at `position` with its target on itself.
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            facing: 0.0,
            speed,
            target: position,
            stuck_time: 0.0,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Seconds spent fully blocked since the last successful move.
    pub fn stuck_time(&self) -> f32 {
        self.stuck_time
    }

    /// Assign a new destination. Returns `false` (and changes nothing) if it
    /// equals the current one.
    pub fn set_target(&mut self, target: Vec3) -> bool {
        if target == self.target {
            return false;
        }
        self.target = target;
        self.stuck_time = 0.0;
        true
    }

    /// Horizontal distance left to the target.
    pub fn remaining_distance(&self) -> f32 {
        let to_target = self.target - self.position;
        Vec3::new(to_target.x, 0.0, to_target.z).length()
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavOutcome {
    /// Already within the arrival epsilon; nothing moved
    Arrived,
    /// Walked straight toward the target
    Direct,
    /// Direct line blocked; walked along a sweep heading
    Swept { angle_deg: f32 },
    /// Every heading blocked
    Blocked {
        /// Stepped back because the way back was clear
        backed_off: bool,
        /// Target after stuck recovery, if it fired this tick
        retargeted: Option<Vec3>,
    },
}

/// Result of [`Navigator::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStep {
    pub outcome: NavOutcome,
    /// Horizontal distance to the target after the tick
    pub remaining: f32,
}

/// Stateless steering rules; all per-agent state lives in [`AgentNavState`].
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    config: NavigatorConfig,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Advance `agent` by one tick.
    ///
    /// Recovered targets are clamped into `room`'s walkable area.
    pub fn step<R: Rng + ?Sized>(
        &self,
        agent: &mut AgentNavState,
        dt: f32,
        probe: &impl ProximityProbe,
        room: &RoomBounds,
        rng: &mut R,
    ) -> NavStep {
        let dt = clamp_dt(dt, self.config.max_dt);

        let to_target = agent.target - agent.position;
        let flat = Vec3::new(to_target.x, 0.0, to_target.z);
        let dist = flat.length();
        if dist < self.config.arrival_epsilon || !dist.is_finite() {
            agent.stuck_time = 0.0;
            return NavStep {
                outcome: NavOutcome::Arrived,
                remaining: 0.0,
            };
        }

        let dir = flat / dist;
        let speed = if agent.speed.is_finite() { agent.speed.max(0.0) } else { 0.0 };
        let move_len = (speed * dt).min(dist);
        let eye = agent.position + Vec3::Y * self.config.probe_height;

        // Straight line
        if !probe.is_blocked(eye, dir, move_len + self.config.direct_clearance) {
            agent.position += dir * move_len;
            agent.facing = heading(dir);
            agent.stuck_time = 0.0;
            return NavStep {
                outcome: NavOutcome::Direct,
                remaining: dist - move_len,
            };
        }

        // Sweep; a standing agent (no speed or no time) has nothing to sweep
        let side_step = self.config.sweep_step.min(move_len);
        let sweep_angles: &[f32] = if side_step > 0.0 { &self.config.sweep_angles_deg } else { &[] };
        for &angle_deg in sweep_angles {
            let candidate = Quat::from_rotation_y(angle_deg.to_radians()) * dir;
            if !probe.is_blocked(eye, candidate, side_step + self.config.sweep_clearance) {
                agent.position += candidate * side_step;
                agent.facing = heading(candidate);
                agent.stuck_time = 0.0;
                log::trace!("agent swept {angle_deg}° around an obstacle");
                return NavStep {
                    outcome: NavOutcome::Swept { angle_deg },
                    remaining: agent.remaining_distance(),
                };
            }
        }

        // Back off
        agent.stuck_time += dt;
        let back = -dir;
        let backed_off =
            move_len > 0.0 && !probe.is_blocked(eye, back, self.config.back_step + self.config.back_clearance);
        if backed_off {
            agent.position += back * self.config.back_step;
            agent.facing = heading(back);
        }

        // Stuck recovery
        let mut retargeted = None;
        if agent.stuck_time > self.config.stuck_threshold {
            agent.stuck_time = 0.0;
            let j = self.config.jitter.abs();
            let offset = if j > 0.0 {
                Vec3::new(rng.gen_range(-j..=j), 0.0, rng.gen_range(-j..=j))
            } else {
                Vec3::ZERO
            };
            let target = room.clamp_xz(agent.target + offset);
            log::debug!("agent stuck at {:?}, target nudged to {target:?}", agent.position);
            agent.target = target;
            retargeted = Some(target);
        }

        NavStep {
            outcome: NavOutcome::Blocked { backed_off, retargeted },
            remaining: agent.remaining_distance(),
        }
    }
}

/// Yaw that faces `dir`, 0 = +Z.
fn heading(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::NoObstacles;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn agent_at_origin(target: Vec3) -> AgentNavState {
        let mut agent = AgentNavState::new(Vec3::ZERO, 0.9);
        agent.set_target(target);
        agent
    }

    #[test]
    fn test_arrived_resets_stuck() {
        let nav = Navigator::default();
        let mut agent = AgentNavState::new(Vec3::ZERO, 0.9);
        agent.stuck_time = 0.5;
        let step = nav.step(&mut agent, 0.1, &NoObstacles, &RoomBounds::default(), &mut rng());
        assert_eq!(step.outcome, NavOutcome::Arrived);
        assert_eq!(step.remaining, 0.0);
        assert_eq!(agent.stuck_time(), 0.0);
    }

    #[test]
    fn test_direct_step() {
        let nav = Navigator::default();
        let mut agent = agent_at_origin(Vec3::new(0.0, 0.0, 5.0));
        let step = nav.step(&mut agent, 0.1, &NoObstacles, &RoomBounds::default(), &mut rng());
        assert_eq!(step.outcome, NavOutcome::Direct);
        assert!((agent.position.z - 0.09).abs() < 1e-6);
        assert!((step.remaining - 4.91).abs() < 1e-5);
        assert_eq!(agent.facing, 0.0);
    }

    #[test]
    fn test_does_not_overshoot() {
        let nav = Navigator::default();
        let mut agent = agent_at_origin(Vec3::new(0.05, 0.0, 0.0));
        nav.step(&mut agent, 0.1, &NoObstacles, &RoomBounds::default(), &mut rng());
        assert!((agent.position.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_sweep_takes_first_clear_angle() {
        let nav = Navigator::default();
        // Target toward -Z; only near-straight-ahead is blocked
        let mut agent = agent_at_origin(Vec3::new(0.0, 0.0, -5.0));
        let probe = |_o: Vec3, d: Vec3, _m: f32| (d.z < -0.95).then_some(0.3_f32);
        let step = nav.step(&mut agent, 0.1, &probe, &RoomBounds::default(), &mut rng());
        assert_eq!(step.outcome, NavOutcome::Swept { angle_deg: 25.0 });

        let expected = Quat::from_rotation_y(25.0_f32.to_radians()) * Vec3::NEG_Z * 0.09;
        assert!((agent.position - expected).length() < 1e-5);
        assert!((agent.facing - expected.x.atan2(expected.z)).abs() < 1e-5);
    }

    #[test]
    fn test_fully_blocked_backs_off() {
        let nav = Navigator::default();
        let mut agent = agent_at_origin(Vec3::new(0.0, 0.0, -5.0));
        // Everything blocked except straight back (+Z)
        let probe = |_o: Vec3, d: Vec3, _m: f32| (d.z < 0.99).then_some(0.1_f32);
        let step = nav.step(&mut agent, 0.1, &probe, &RoomBounds::default(), &mut rng());
        assert_eq!(
            step.outcome,
            NavOutcome::Blocked {
                backed_off: true,
                retargeted: None
            }
        );
        assert!((agent.position.z - 0.18).abs() < 1e-6);
        assert!((agent.stuck_time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_stuck_recovery_jitters_target() {
        let nav = Navigator::default();
        let target = Vec3::new(0.0, 0.0, -5.0);
        let mut agent = agent_at_origin(target);
        let walls = |_o: Vec3, _d: Vec3, _m: f32| Some(0.1_f32);
        let room = RoomBounds::default();
        let mut rng = rng();

        let mut recovered = None;
        for _ in 0..13 {
            let step = nav.step(&mut agent, 0.1, &walls, &room, &mut rng);
            assert_eq!(agent.position, Vec3::ZERO);
            if let NavOutcome::Blocked { retargeted: Some(t), .. } = step.outcome {
                recovered = Some(t);
                break;
            }
        }
        let new_target = recovered.expect("stuck recovery never fired");
        assert!((new_target.x - target.x).abs() <= 0.6 + 1e-6);
        assert!((new_target.z - target.z).abs() <= 0.6 + 1e-6);
        assert_eq!(agent.stuck_time(), 0.0);
        assert_eq!(agent.target(), new_target);
    }

    #[test]
    fn test_set_same_target_is_noop() {
        let mut agent = agent_at_origin(Vec3::X);
        assert!(!agent.set_target(Vec3::X));
        assert!(agent.set_target(Vec3::Z));
    }

    #[test]
    fn test_bad_dt_stays_put() {
        let nav = Navigator::default();
        let mut agent = agent_at_origin(Vec3::new(0.0, 0.0, 5.0));
        nav.step(&mut agent, f32::NAN, &NoObstacles, &RoomBounds::default(), &mut rng());
        assert_eq!(agent.position, Vec3::ZERO);
    }

    #[test]
    fn test_standing_agent_still_recovers() {
        let nav = Navigator::default();
        let mut rng = rng();
        // Only headings close to -Z are blocked
        let probe = |_o: Vec3, d: Vec3, _m: f32| (d.z < -0.5).then_some(0.2_f32);
        let mut agent = agent_at_origin(Vec3::new(0.0, 0.0, -5.0));
        agent.speed = 0.0;

        let paused = nav.step(&mut agent, 0.0, &probe, &RoomBounds::default(), &mut rng);
        assert_eq!(
            paused.outcome,
            NavOutcome::Blocked {
                backed_off: false,
                retargeted: None
            }
        );
        assert_eq!(agent.stuck_time(), 0.0);

        let mut recovered = false;
        for _ in 0..20 {
            let step = nav.step(&mut agent, 0.1, &probe, &RoomBounds::default(), &mut rng);
            assert!(!matches!(step.outcome, NavOutcome::Swept { .. }));
            if let NavOutcome::Blocked { retargeted: Some(_), .. } = step.outcome {
                recovered = true;
                break;
            }
        }
        assert!(recovered, "standing agent never recovered");
        assert_eq!(agent.position, Vec3::ZERO);
    }
}
