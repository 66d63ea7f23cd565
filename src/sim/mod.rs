//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocity is per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use input::{InputAdapter, InputEvent, Key, pointer_target};
pub use state::{
    Arena, Ball, Court, GameEvent, GamePhase, GameState, Paddle, Player, Snapshot,
};
pub use tick::{bounce_off_paddle, bounce_off_walls, check_scoring, move_ball, serve, tick};
