//! Collision geometry module
//!
//! Solid bodies in the gallery (walls, dividers, the door blocker, the floor
//! slab) are all axis-aligned boxes. This module owns the box type, the
//! slab-method ray test and the obstacle collection every probe runs against.
//!
//! # Example
//!
//! ```ignore
//! use art_gallery_engine::physics::collision::{Aabb, ObstacleSet};
//! use glam::Vec3;
//!
//! let mut obstacles = ObstacleSet::new();
//! let wall = obstacles.add("backWall", Aabb::from_center_size(
//!     Vec3::new(0.0, 5.25, -15.0),
//!     Vec3::new(18.0, 10.5, 0.22),
//! ));
//!
//! obstacles.set_enabled(wall, false); // no longer considered by probes
//! ```

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from its center point and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for p in rest {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        Some(aabb)
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents of the box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True if every coordinate is finite and `min <= max` on all axes.
    ///
    /// Malformed boxes are skipped by the probe rather than rejected.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// True if the point lies strictly inside the box.
    pub fn contains_strict(&self, point: Vec3) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }
}

/// Ray/AABB intersection using the slab method.
///
/// Each axis contributes an entry and exit time; the ray hits the box when the
/// latest entry precedes the earliest exit and the exit lies in front of the
/// origin.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb` - The box to test
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry face (`t >= 0`)
/// * `None` - Miss, box behind the origin, or origin inside the box
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_dir: Vec3, aabb: &Aabb) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));

        if t_enter > t_exit {
            return None;
        }
    }

    // Origin inside the box: only back faces would be hit, which never count
    if t_exit < 0.0 || t_enter < 0.0 {
        return None;
    }

    Some(t_enter)
}

/// Stable handle to an entry in an [`ObstacleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId(usize);

impl ObstacleId {
    /// Index of the obstacle inside its set.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A solid body participating in collision tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Scene name, used for logging and lookup
    pub label: String,
    /// World-space bounds
    pub bounds: Aabb,
    /// Disabled obstacles are invisible to every probe
    pub enabled: bool,
}

/// Flat collection of solid bodies produced by scene construction.
///
/// Entries are never removed; the door toggles its own blocker through
/// [`ObstacleSet::set_enabled`].
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an enabled obstacle and returns its handle.
    pub fn add(&mut self, label: impl Into<String>, bounds: Aabb) -> ObstacleId {
        let label = label.into();
        if !bounds.is_well_formed() {
            log::warn!("obstacle '{label}' has malformed bounds {bounds:?}; probes will treat it as passable");
        }
        self.obstacles.push(Obstacle {
            label,
            bounds,
            enabled: true,
        });
        ObstacleId(self.obstacles.len() - 1)
    }

    /// Enables or disables an obstacle. Unknown handles are ignored.
    pub fn set_enabled(&mut self, id: ObstacleId, enabled: bool) {
        if let Some(obstacle) = self.obstacles.get_mut(id.0) {
            obstacle.enabled = enabled;
        }
    }

    /// Whether the obstacle is currently enabled. Unknown handles report `false`.
    pub fn is_enabled(&self, id: ObstacleId) -> bool {
        self.obstacles.get(id.0).is_some_and(|o| o.enabled)
    }

    /// Gets an obstacle by handle.
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.0)
    }

    /// Finds the first obstacle with the given label.
    pub fn find(&self, label: &str) -> Option<ObstacleId> {
        self.obstacles
            .iter()
            .position(|o| o.label == label)
            .map(ObstacleId)
    }

    /// Number of obstacles, enabled or not.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if the set has no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Iterates over the obstacles that currently take part in collision.
    pub fn iter_enabled(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.enabled)
    }
}
