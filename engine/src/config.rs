//! Gallery configuration
//!
//! Every tunable in one serde tree. Missing fields fall back to the defaults,
//! so a JSON file only needs to name what it changes:
//!
//! ```json
//! {
//!   "layout": { "room": { "width": 20.0 } },
//!   "fps": { "walk_speed": 2.5 },
//!   "guides": []
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::{GuideConfig, NavigatorConfig};
use crate::camera::{FpsConfig, NavMode, OrbitConfig, RaycastConfig};
use crate::world::{LayoutConfig, RoomError};

/// Configuration loading/validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Startup mode, serialised in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    #[default]
    Exhibit,
    Fps,
}

impl From<StartMode> for NavMode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Exhibit => NavMode::Exhibit,
            StartMode::Fps => NavMode::Fps,
        }
    }
}

/// Aggregate of every tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub layout: LayoutConfig,
    pub orbit: OrbitConfig,
    pub fps: FpsConfig,
    pub raycast: RaycastConfig,
    pub navigator: NavigatorConfig,
    pub guides: Vec<GuideConfig>,
    pub start_mode: StartMode,
    /// Seed for stuck-recovery jitter; `None` seeds from the OS
    pub rng_seed: Option<u64>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            orbit: OrbitConfig::default(),
            fps: FpsConfig::default(),
            raycast: RaycastConfig::default(),
            navigator: NavigatorConfig::default(),
            guides: vec![
                GuideConfig {
                    name: "front-guide".to_string(),
                    ..GuideConfig::default()
                },
                GuideConfig {
                    name: "back-guide".to_string(),
                    ..GuideConfig::default()
                },
            ],
            start_mode: StartMode::Exhibit,
            rng_seed: None,
        }
    }
}

impl GalleryConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("loading gallery config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.room.validate()?;

        let orbit = &self.orbit;
        if !(orbit.min_distance > 0.0 && orbit.min_distance <= orbit.max_distance) {
            return Err(invalid(
                "orbit.min_distance",
                format!("expected 0 < min ({}) <= max ({})", orbit.min_distance, orbit.max_distance),
            ));
        }
        if !(orbit.min_polar >= 0.0
            && orbit.min_polar <= orbit.max_polar
            && orbit.max_polar <= std::f32::consts::PI)
        {
            return Err(invalid(
                "orbit.min_polar",
                format!("expected 0 <= min ({}) <= max ({}) <= pi", orbit.min_polar, orbit.max_polar),
            ));
        }
        if !(0.0..=1.0).contains(&orbit.damping_factor) {
            return Err(invalid("orbit.damping_factor", format!("{} is outside [0, 1]", orbit.damping_factor)));
        }

        for (field, value) in [
            ("orbit.max_dt", orbit.max_dt),
            ("fps.max_dt", self.fps.max_dt),
            ("navigator.max_dt", self.navigator.max_dt),
            ("fps.walk_speed", self.fps.walk_speed),
            ("fps.sprint_speed", self.fps.sprint_speed),
            ("navigator.speed", self.navigator.speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("{value} must be a non-negative finite number")));
            }
        }

        if self.navigator.sweep_angles_deg.iter().any(|a| !a.is_finite()) {
            return Err(invalid("navigator.sweep_angles_deg", "angles must be finite".to_string()));
        }

        for guide in &self.guides {
            if let Some(speed) = guide.speed.filter(|s| !(s.is_finite() && *s >= 0.0)) {
                return Err(invalid("guides.speed", format!("guide {} has speed {speed}", guide.name)));
            }
            if !guide.dwell_time.is_finite() {
                return Err(invalid("guides.dwell_time", format!("guide {} has no finite dwell", guide.name)));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
