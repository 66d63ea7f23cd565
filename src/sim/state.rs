//! Game state and core simulation types
//!
//! Coordinates follow a y-up convention: a paddle's `pos` is its lower-left
//! corner and `top()` is the largest y it covers.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::settings::Settings;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Left paddle
    One,
    /// Right paddle
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];
}

/// Lifecycle of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball and paddles not built yet; ticks and input are ignored
    Uninitialized,
    /// Active gameplay
    InPlay,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball crossed the top or bottom boundary
    WallBounce,
    /// Ball rebounded off a paddle
    PaddleBounce { player: Player },
    /// A player won a point
    PointScored { player: Player },
    /// Ball was recentred with a new velocity
    Served { velocity: Vec2 },
}

/// Fixed playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub center: Vec2,
    pub vel: Vec2,
    /// Side length of the ball's box
    pub size: f32,
}

impl Ball {
    pub fn new(center: Vec2, size: f32) -> Self {
        Self {
            center,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.size / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.size / 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, Vec2::splat(self.size))
    }
}

/// A player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Lower-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub score: u32,
}

impl Paddle {
    /// Paddle whose left edge sits at `x`, vertically centred on `center_y`
    pub fn new(x: f32, center_y: f32, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(x, center_y - size.y / 2.0),
            size,
            score: 0,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    pub fn set_center_y(&mut self, y: f32) {
        self.pos.y = y - self.size.y / 2.0;
    }

    /// Shift the paddle vertically (positive = up)
    pub fn nudge(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Ball and both paddles; only exists once the game is initialised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub ball: Ball,
    pub player1: Paddle,
    pub player2: Paddle,
}

impl Court {
    /// Ball centred in the arena, paddles flush with the side walls
    pub fn new(arena: &Arena, settings: &Settings) -> Self {
        let center = arena.center();
        let paddle_size = Vec2::new(settings.paddle_width, settings.paddle_height);
        Self {
            ball: Ball::new(center, settings.ball_size),
            player1: Paddle::new(arena.left(), center.y, paddle_size),
            player2: Paddle::new(arena.width() - paddle_size.x, center.y, paddle_size),
        }
    }

    pub fn paddle(&self, player: Player) -> &Paddle {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    pub fn paddle_mut(&mut self, player: Player) -> &mut Paddle {
        match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        }
    }

    /// Borrow the ball mutably alongside one paddle
    pub fn ball_and_paddle(&mut self, player: Player) -> (&mut Ball, &Paddle) {
        match player {
            Player::One => (&mut self.ball, &self.player1),
            Player::Two => (&mut self.ball, &self.player2),
        }
    }
}

/// Read-only view handed to a renderer after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub arena: Arena,
    pub ball: Option<Ball>,
    pub paddles: Option<[Paddle; 2]>,
    pub score_text: String,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the serve RNG
    pub seed: u64,
    pub settings: Settings,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// `None` until [`GameState::initialize`] runs
    pub court: Option<Court>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) score_text: String,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a ready-to-play game; the first serve has already happened
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut state = Self::deferred(settings, seed);
        state.initialize();
        state
    }

    /// Create a game shell with no ball or paddles yet
    ///
    /// Every tick is a no-op until [`GameState::initialize`] is called.
    /// `settings` must pass [`Settings::validate`]; a zero paddle height, for
    /// one, turns the ball velocity into NaN on the first paddle hit.
    pub fn deferred(settings: Settings, seed: u64) -> Self {
        debug_assert!(settings.validate().is_ok(), "invalid settings: {settings:?}");
        Self {
            seed,
            settings,
            arena: settings.arena(),
            phase: GamePhase::Uninitialized,
            time_ticks: 0,
            court: None,
            events: Vec::new(),
            score_text: format_score(0, 0),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Build the ball and paddles and make the opening serve
    ///
    /// Returns `false` (and changes nothing) if already initialised.
    pub fn initialize(&mut self) -> bool {
        if self.court.is_some() {
            return false;
        }

        self.court = Some(Court::new(&self.arena, &self.settings));
        self.phase = GamePhase::InPlay;
        log::info!(
            "Game initialised: arena {}x{}, seed {}",
            self.arena.width(),
            self.arena.height(),
            self.seed
        );

        let base = Vec2::new(self.settings.serve_speed, 0.0);
        self.serve(base);
        true
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.phase == GamePhase::InPlay
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.court.as_ref().map(|c| &c.ball)
    }

    pub fn paddle(&self, player: Player) -> Option<&Paddle> {
        self.court.as_ref().map(|c| c.paddle(player))
    }

    /// Score of one player (0 before initialisation)
    pub fn score(&self, player: Player) -> u32 {
        self.paddle(player).map(|p| p.score).unwrap_or(0)
    }

    /// Human-readable score, "<player one> - <player two>"
    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub(crate) fn update_score_text(&mut self) {
        self.score_text = format_score(self.score(Player::One), self.score(Player::Two));
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            arena: self.arena,
            ball: self.ball().copied(),
            paddles: self.court.as_ref().map(|c| [c.player1, c.player2]),
            score_text: self.score_text.clone(),
        }
    }
}

fn format_score(left: u32, right: u32) -> String {
    format!("{left} - {right}")
}
