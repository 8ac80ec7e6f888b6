//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be replayed with
//! different physics from a JSON file. Defaults match `crate::consts`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub avatar_radius: f32,
    pub avatar_x_fraction: f32,
    /// Added to the avatar velocity once per simulated frame
    pub gravity: f32,
    /// Velocity set on flap (must be negative)
    pub impulse_velocity: f32,
    pub bob_rate: f32,
    pub bob_amplitude: f32,
    pub obstacle_width: f32,
    pub obstacle_gap: f32,
    pub obstacle_min_height: f32,
    pub obstacle_speed: f32,
    pub spawn_interval_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            avatar_radius: AVATAR_RADIUS,
            avatar_x_fraction: AVATAR_X_FRACTION,
            gravity: GRAVITY,
            impulse_velocity: IMPULSE_VELOCITY,
            bob_rate: BOB_RATE,
            bob_amplitude: BOB_AMPLITUDE,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
        }
    }
}

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Parse(String),
    NotPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    ImpulseNotUpward { value: f32 },
    FractionOutOfRange { value: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::ImpulseNotUpward { value } => {
                write!(f, "impulse_velocity must be negative (upward), got {value}")
            }
            Self::FractionOutOfRange { value } => {
                write!(f, "avatar_x_fraction must be within (0, 1), got {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("avatar_radius", self.avatar_radius),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_gap", self.obstacle_gap),
            ("obstacle_speed", self.obstacle_speed),
            ("spawn_interval_ms", self.spawn_interval_ms),
        ];
        for (field, value) in positive {
            // NaN fails this check too
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("obstacle_min_height", self.obstacle_min_height),
            ("bob_rate", self.bob_rate),
            ("bob_amplitude", self.bob_amplitude),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field, value });
            }
        }

        if !(self.impulse_velocity < 0.0) {
            return Err(TuningError::ImpulseNotUpward {
                value: self.impulse_velocity,
            });
        }
        if !(self.avatar_x_fraction > 0.0 && self.avatar_x_fraction < 1.0) {
            return Err(TuningError::FractionOutOfRange {
                value: self.avatar_x_fraction,
            });
        }
        Ok(())
    }

    /// Feasible range for an obstacle's top height on a screen of `height`.
    ///
    /// Returns `None` when the screen is too short to fit the gap plus two
    /// minimum-height rectangles.
    pub fn top_height_range(&self, height: f32) -> Option<(f32, f32)> {
        let lo = self.obstacle_min_height;
        let hi = height - self.obstacle_gap - self.obstacle_min_height;
        (hi >= lo).then_some((lo, hi))
    }
}
