//! Game tuning data
//!
//! All tunable numbers live in one serde bundle so balance can be tweaked
//! without touching simulation code. The bundle is immutable for the life of
//! a session; [`GameConfig::validate`] runs once at load and rejects values
//! that would later reach a division or an inverted clamp in the hot path.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ball::BallType;

/// Configuration loading/validation failures. All fatal; a session is never
/// constructed from an invalid bundle.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} range is inverted ({min} is not below {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Slider ranges and per-session defaults for the adjustable parameters.
/// In-game units drive the simulation; display units (kmph) are what the
/// UI shows for the same slider position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayRanges {
    pub min_ball_speed: f32,
    pub max_ball_speed: f32,
    pub min_display_ball_speed: f32,
    pub max_display_ball_speed: f32,
    pub min_bat_speed: f32,
    pub max_bat_speed: f32,
    pub min_display_bat_speed: f32,
    pub max_display_bat_speed: f32,
    /// Bat elevation in degrees at the grounded end of the toggle
    pub min_bat_elevation: f32,
    /// Bat elevation in degrees at the lofted end of the toggle
    pub max_bat_elevation: f32,
    /// Normalized [0,1] slider positions applied at session start
    pub default_ball_speed: f32,
    pub default_bat_speed: f32,
    pub default_ball_type: BallType,
    pub default_lofted: bool,
}

/// Bounce/spin coefficients for the delivery
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BowlingTuning {
    /// Scales the vertical rebound at first bounce (multiplied by speed)
    pub bounce_scalar: f32,
    /// Lateral deflection injected at first bounce (divided by speed)
    pub spin_scalar: f32,
}

/// The hit window: the z-range in which a swing can connect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BattingReach {
    pub reach_min_z: f32,
    pub reach_max_z: f32,
}

/// Marker drag mapping and bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkerDrag {
    /// The marker may roam x in [-boundary_x, boundary_x]
    pub boundary_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Scales screen-space drag deltas down to world units
    pub drag_scale: f32,
}

/// Swipe gesture recognition
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwipeTuning {
    /// Minimum drag length (screen units) before a swipe counts
    pub min_drag: f32,
}

/// Where the fixed scene objects sit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PitchLayout {
    /// Ball release point at the bowler's end
    pub ball_start: Vec3,
    /// Marker position before any drag
    pub marker_default: Vec3,
    /// Center of the middle stump at its base
    pub stump_base: Vec3,
    /// x-offset between neighboring stumps
    pub stump_spacing: f32,
    /// Top of the stumps above the base
    pub stump_height: f32,
    /// Horizontal contact slop around a stump
    pub stump_contact_radius: f32,
}

/// The complete per-session tuning bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub gameplay: GameplayRanges,
    pub bowling: BowlingTuning,
    pub batting: BattingReach,
    pub marker: MarkerDrag,
    pub swipe: SwipeTuning,
    pub pitch: PitchLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gameplay: GameplayRanges {
                min_ball_speed: 10.0,
                max_ball_speed: 25.0,
                min_display_ball_speed: 80.0,
                max_display_ball_speed: 160.0,
                min_bat_speed: 5.0,
                max_bat_speed: 15.0,
                min_display_bat_speed: 60.0,
                max_display_bat_speed: 120.0,
                min_bat_elevation: 10.0,
                max_bat_elevation: 35.0,
                default_ball_speed: 0.5,
                default_bat_speed: 0.5,
                default_ball_type: BallType::Straight,
                default_lofted: true,
            },
            bowling: BowlingTuning {
                bounce_scalar: 0.1,
                spin_scalar: 2.0,
            },
            batting: BattingReach {
                reach_min_z: 8.5,
                reach_max_z: 10.4,
            },
            marker: MarkerDrag {
                boundary_x: 3.0,
                min_z: 2.0,
                max_z: 8.0,
                drag_scale: 0.01,
            },
            swipe: SwipeTuning { min_drag: 50.0 },
            pitch: PitchLayout {
                ball_start: Vec3::new(0.0, 1.0, -10.0),
                marker_default: Vec3::new(0.0, 0.0, 5.0),
                stump_base: Vec3::new(0.0, 0.0, 10.5),
                stump_spacing: 0.12,
                stump_height: 0.7,
                stump_contact_radius: 0.25,
            },
        }
    }
}

impl GameConfig {
    /// Parse a config bundle from a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config bundle from a JSON file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded game config from {path}");
        Ok(config)
    }

    /// Reject values that would corrupt the simulation later. The spin
    /// computation divides by ball speed, so a non-positive speed range is a
    /// fatal precondition violation here, not a runtime case.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gameplay;
        Self::positive("gameplay.min_ball_speed", g.min_ball_speed)?;
        Self::positive("gameplay.min_bat_speed", g.min_bat_speed)?;
        Self::ordered("gameplay.ball_speed", g.min_ball_speed, g.max_ball_speed)?;
        Self::ordered("gameplay.bat_speed", g.min_bat_speed, g.max_bat_speed)?;
        Self::ordered(
            "gameplay.display_ball_speed",
            g.min_display_ball_speed,
            g.max_display_ball_speed,
        )?;
        Self::ordered(
            "gameplay.display_bat_speed",
            g.min_display_bat_speed,
            g.max_display_bat_speed,
        )?;
        Self::ordered(
            "gameplay.bat_elevation",
            g.min_bat_elevation,
            g.max_bat_elevation,
        )?;
        Self::positive("marker.drag_scale", self.marker.drag_scale)?;
        Self::positive("swipe.min_drag", self.swipe.min_drag)?;
        Self::ordered("marker.z", self.marker.min_z, self.marker.max_z)?;
        Self::ordered(
            "batting.reach_z",
            self.batting.reach_min_z,
            self.batting.reach_max_z,
        )?;
        Ok(())
    }

    fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositive { field, value })
        }
    }

    fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
        if min < max {
            Ok(())
        } else {
            Err(ConfigError::InvertedRange { field, min, max })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_ball_speed() {
        let mut config = GameConfig::default();
        config.gameplay.min_ball_speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field, .. }) if field == "gameplay.min_ball_speed"
        ));
    }

    #[test]
    fn test_rejects_inverted_hit_window() {
        let mut config = GameConfig::default();
        config.batting.reach_min_z = 11.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field, .. }) if field == "batting.reach_z"
        ));
    }

    #[test]
    fn test_rejects_zero_drag_scale() {
        let mut config = GameConfig::default();
        config.marker.drag_scale = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(parsed.bowling.spin_scalar, config.bowling.spin_scalar);
        assert_eq!(parsed.pitch.ball_start, config.pitch.ball_start);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
