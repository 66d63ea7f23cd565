//! Game settings and tuning
//!
//! Every number the simulation depends on lives here so a host can swap the
//! arena or paddle dimensions without touching the physics. Settings are
//! plain JSON; missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Arena;

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for [`Settings`]
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot run with
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Bodies ===
    /// Side length of the (square) ball box
    pub ball_size: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,

    // === Physics ===
    /// Speed of the ball right after a serve
    pub serve_speed: f32,
    /// Velocity multiplier on paddle hits (must exceed 1.0)
    pub paddle_boost: f32,
    /// Vertical velocity added per unit of hit offset
    pub deflection: f32,

    // === Input ===
    /// Paddle movement per key press
    pub key_step: f32,

    // === Host ===
    /// Ticks per second the host should drive
    pub tick_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ball_size: BALL_SIZE,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            serve_speed: SERVE_SPEED,
            paddle_boost: PADDLE_BOOST,
            deflection: PADDLE_DEFLECTION,
            key_step: KEY_STEP,
            tick_rate: TICK_RATE,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ball_size", self.ball_size),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("serve_speed", self.serve_speed),
            ("tick_rate", self.tick_rate),
        ];
        for (field, value) in positive {
            // `!(v > 0)` also catches NaN
            if !(value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(SettingsError::Invalid {
                field: "tick_rate",
                reason: "must be between 1 and 1000 ticks per second",
            });
        }

        if !(self.paddle_boost > 1.0) {
            return Err(SettingsError::Invalid {
                field: "paddle_boost",
                reason: "must be greater than 1.0",
            });
        }

        if !self.deflection.is_finite() || !self.key_step.is_finite() {
            return Err(SettingsError::Invalid {
                field: if self.deflection.is_finite() {
                    "key_step"
                } else {
                    "deflection"
                },
                reason: "must be finite",
            });
        }

        Ok(())
    }

    /// Playfield bounds, anchored at the origin
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Duration of one host tick in seconds
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }
}
