//! Proximity probe
//!
//! A bounded ray cast against the enabled obstacles. Every controller asks
//! "can I go there" through this one function so orbit, first-person and
//! agent movement agree on what is solid.
//!
//! The probe fails open: malformed boxes, boxes that already contain the
//! origin, and degenerate directions all read as "not blocked".

use glam::Vec3;

use super::collision::{ObstacleSet, ray_aabb_intersect};

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeResult {
    /// True if an enabled obstacle lies within `[0, max_distance]`
    pub blocked: bool,
    /// Distance to the nearest hit, when blocked
    pub hit_distance: Option<f32>,
}

impl ProbeResult {
    /// A result reporting no obstruction.
    pub const CLEAR: Self = Self {
        blocked: false,
        hit_distance: None,
    };

    fn hit(distance: f32) -> Self {
        Self {
            blocked: true,
            hit_distance: Some(distance),
        }
    }
}

/// Casts from `origin` along `direction` and reports the nearest enabled
/// obstacle within `max_distance`.
///
/// `direction` is normalised here; a zero or non-finite direction, a
/// non-positive or non-finite range, and an empty set all report clear.
pub fn probe(origin: Vec3, direction: Vec3, max_distance: f32, obstacles: &ObstacleSet) -> ProbeResult {
    if !(max_distance > 0.0) || obstacles.is_empty() || !origin.is_finite() {
        return ProbeResult::CLEAR;
    }
    let Some(dir) = direction.try_normalize() else {
        return ProbeResult::CLEAR;
    };

    let nearest = obstacles
        .iter_enabled()
        .filter(|o| o.bounds.is_well_formed())
        .filter(|o| !o.bounds.contains_strict(origin))
        .filter_map(|o| ray_aabb_intersect(origin, dir, &o.bounds))
        .filter(|&t| t <= max_distance)
        .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))));

    match nearest {
        Some(t) => {
            log::trace!("probe from {origin:?} hit at {t:.3} (max {max_distance:.3})");
            ProbeResult::hit(t)
        }
        None => ProbeResult::CLEAR,
    }
}

/// Anything that can answer a bounded ray query.
///
/// Controllers take `&impl ProximityProbe` so tests can pass a closure
/// returning a fixed hit distance instead of building geometry.
pub trait ProximityProbe {
    /// Nearest obstruction along `direction` within `max_distance`.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult;

    /// Shorthand for `cast(..).blocked`.
    fn is_blocked(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        self.cast(origin, direction, max_distance).blocked
    }
}

impl ProximityProbe for ObstacleSet {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult {
        probe(origin, direction, max_distance, self)
    }
}

/// Closure probes return the raw hit distance; range and degenerate-input
/// rules are applied here so doubles behave like the real probe.
impl<F> ProximityProbe for F
where
    F: Fn(Vec3, Vec3, f32) -> Option<f32>,
{
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ProbeResult {
        if !(max_distance > 0.0) {
            return ProbeResult::CLEAR;
        }
        let Some(dir) = direction.try_normalize() else {
            return ProbeResult::CLEAR;
        };
        match self(origin, dir, max_distance) {
            Some(t) if t.is_finite() && t >= 0.0 && t <= max_distance => ProbeResult::hit(t),
            _ => ProbeResult::CLEAR,
        }
    }
}

/// A probe that never reports anything. Useful for open-field tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ProximityProbe for NoObstacles {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> ProbeResult {
        ProbeResult::CLEAR
    }
}
