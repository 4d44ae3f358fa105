//! Click-to-move target tracker
//!
//! Holds at most one floor target. Each frame the look-at point closes a fixed
//! fraction of the remaining gap, `1 - e^(-k·dt)`, so the view glides instead
//! of snapping. A new click replaces the old target; there is no queue.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveTargetConfig {
    /// Exponential easing rate `k` (1/s)
    pub easing_rate: f32,
    /// Remaining distance below which the target counts as reached (meters)
    pub arrival_epsilon: f32,
}

impl Default for MoveTargetConfig {
    fn default() -> Self {
        Self {
            easing_rate: 5.0,
            arrival_epsilon: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveTargetTracker {
    config: MoveTargetConfig,
    target: Option<Vec3>,
}

impl MoveTargetTracker {
    pub fn new(config: MoveTargetConfig) -> Self {
        Self { config, target: None }
    }

    /// Current target, if one is active.
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Replace the target.
    pub fn set(&mut self, target: Vec3) {
        log::debug!("move target set to {target:?}");
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Displacement to apply to `current` this frame.
    ///
    /// Clears the target once the remaining distance drops below the arrival
    /// epsilon.
    pub fn step(&mut self, current: Vec3, dt: f32) -> Vec3 {
        let Some(target) = self.target else {
            return Vec3::ZERO;
        };
        let remaining = target - current;
        if remaining.length() < self.config.arrival_epsilon {
            self.target = None;
            return Vec3::ZERO;
        }

        let delta = remaining * (1.0 - (-self.config.easing_rate * dt).exp());
        if (remaining - delta).length() < self.config.arrival_epsilon {
            log::debug!("move target reached");
            self.target = None;
        }
        delta
    }
}
