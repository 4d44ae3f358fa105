//! Agent Module
//!
//! Autonomous walkers that share the hall with the visitor: the reactive
//! [`navigator`] that steers one agent toward a point, and the [`guide`]
//! script that feeds it patrol waypoints.

pub mod guide;
pub mod navigator;

pub use guide::{Guide, GuideConfig};
pub use navigator::{AgentNavState, NavOutcome, NavStep, Navigator, NavigatorConfig};
