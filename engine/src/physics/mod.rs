//! Physics module for the gallery engine
//!
//! Kinematic collision only: there is no mass, momentum or restitution here.
//! Moving things ask the proximity probe whether a displacement is clear and
//! correct their position accordingly.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Angles in radians
//!
//! # Submodules
//!
//! - [`collision`] - AABB type, slab ray test, obstacle collection
//! - [`probe`] - Bounded ray cast against enabled obstacles

pub mod collision;
pub mod probe;

// Re-export commonly used types at the physics module level
pub use collision::{Aabb, Obstacle, ObstacleId, ObstacleSet, ray_aabb_intersect};
pub use probe::{NoObstacles, ProbeResult, ProximityProbe, probe};
