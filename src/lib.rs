//! Twin Pong - a two-paddle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, paddle collisions, scoring)
//! - `settings`: Data-driven game tuning, loadable from JSON
//!
//! Rendering, windowing and raw device input are left to the host. The host
//! calls [`sim::tick()`] at a fixed cadence and reads [`sim::GameState::snapshot`]
//! afterwards to draw.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal host tick rate (Hz)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep, one tick
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Accepted range for a configured tick rate
    pub const MIN_TICK_RATE: f32 = 1.0;
    pub const MAX_TICK_RATE: f32 = 1000.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ball is a square box of this side length
    pub const BALL_SIZE: f32 = 50.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 25.0;
    pub const PADDLE_HEIGHT: f32 = 200.0;

    /// Speed of a freshly served ball (units per tick)
    pub const SERVE_SPEED: f32 = 4.0;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.1;
    /// Extra vertical velocity per unit of hit offset
    pub const PADDLE_DEFLECTION: f32 = 2.0;

    /// Paddle movement per key press
    pub const KEY_STEP: f32 = 20.0;
}

/// Rotate a vector counter-clockwise by an angle given in degrees
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}
