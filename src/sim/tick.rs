//! Fixed timestep simulation tick
//!
//! One call to [`tick`] is one simulation step. Velocities are in units per
//! tick, so the host's elapsed-time hint never scales the physics.

use glam::Vec2;
use rand::Rng;

use super::input::InputAdapter;
use super::state::{Arena, Ball, GameEvent, GameState, Paddle, Player};
use crate::rotate_degrees;

/// Advance the game state by one fixed step
///
/// Pending input is applied first. `_dt` is the host's elapsed-time hint and
/// is ignored. Before initialisation this only discards queued input.
pub fn tick(state: &mut GameState, input: &mut InputAdapter, _dt: f32) {
    state.events.clear();
    state.apply_input(input);

    if !state.is_initialized() {
        return;
    }

    state.time_ticks += 1;
    let arena = state.arena;
    let boost = state.settings.paddle_boost;
    let deflection = state.settings.deflection;

    let Some(court) = state.court.as_mut() else {
        return;
    };

    move_ball(&mut court.ball);

    if bounce_off_walls(&mut court.ball, &arena) {
        state.events.push(GameEvent::WallBounce);
    }

    for player in Player::BOTH {
        let (ball, paddle) = court.ball_and_paddle(player);
        if bounce_off_paddle(ball, paddle, boost, deflection) {
            log::debug!("Paddle bounce ({player:?}), ball velocity {}", ball.vel);
            state.events.push(GameEvent::PaddleBounce { player });
        }
    }

    if let Some(player) = check_scoring(&court.ball, &arena) {
        state.award_point(player);
    }
}

/// Add one tick of velocity to the ball
#[inline]
pub fn move_ball(ball: &mut Ball) {
    ball.center += ball.vel;
}

/// Flip vertical velocity when the ball crosses the floor or ceiling
///
/// The floor test compares against 0 and the ceiling test against the arena
/// height, each with a single ball edge. Returns whether a flip happened.
pub fn bounce_off_walls(ball: &mut Ball, arena: &Arena) -> bool {
    if ball.bottom() < 0.0 || ball.top() > arena.height() {
        ball.vel.y = -ball.vel.y;
        return true;
    }
    false
}

/// Rebound the ball off a paddle if their boxes overlap
///
/// Horizontal velocity is reversed and the whole vector scaled by `boost`;
/// only then is `offset * deflection` added to the vertical component, where
/// `offset` is the hit height relative to the paddle centre in half-heights.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, boost: f32, deflection: f32) -> bool {
    if !ball.bounds().overlaps(&paddle.bounds()) {
        return false;
    }

    let offset = (ball.center.y - paddle.center_y()) / (paddle.height() / 2.0);
    let bounced = Vec2::new(-ball.vel.x, ball.vel.y);
    ball.vel = bounced * boost;
    ball.vel.y += offset * deflection;
    true
}

/// Which player, if any, won a point this tick
///
/// Ball leaving past the left wall scores for player two; past the right
/// wall, for player one.
pub fn check_scoring(ball: &Ball, arena: &Arena) -> Option<Player> {
    if ball.left() < arena.left() {
        Some(Player::Two)
    } else if ball.right() > arena.width() {
        Some(Player::One)
    } else {
        None
    }
}

/// Recentre the ball and launch it along `base` rotated by a random angle
///
/// The angle is uniform in [0°, 360°). Returns the new velocity.
pub fn serve<R: Rng>(ball: &mut Ball, arena: &Arena, base: Vec2, rng: &mut R) -> Vec2 {
    let degrees: f32 = rng.random_range(0.0..360.0);
    ball.center = arena.center();
    ball.vel = rotate_degrees(base, degrees);
    ball.vel
}

impl GameState {
    /// Serve the ball from the arena centre and refresh the score text
    ///
    /// No-op before initialisation.
    pub fn serve(&mut self, base: Vec2) {
        let Some(court) = self.court.as_mut() else {
            return;
        };
        let velocity = serve(&mut court.ball, &self.arena, base, &mut self.rng);
        log::debug!("Served ball with velocity {velocity}");
        self.events.push(GameEvent::Served { velocity });
        self.update_score_text();
    }

    /// Credit a point and serve toward the player who conceded it
    pub(crate) fn award_point(&mut self, player: Player) {
        let Some(court) = self.court.as_mut() else {
            return;
        };
        court.paddle_mut(player).score += 1;
        self.events.push(GameEvent::PointScored { player });
        self.update_score_text();
        log::info!("{player:?} scores: {}", self.score_text);

        let speed = self.settings.serve_speed;
        let base = match player {
            Player::Two => Vec2::new(speed, 0.0),
            Player::One => Vec2::new(-speed, 0.0),
        };
        self.serve(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    fn paddle_at(x: f32, center_y: f32) -> Paddle {
        Paddle::new(x, center_y, Vec2::new(25.0, 200.0))
    }

    /// Game with the ball parked at `center` moving at `vel`
    fn game_with_ball(center: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new(Settings::default(), 12345);
        let ball = &mut state.court.as_mut().unwrap().ball;
        ball.center = center;
        ball.vel = vel;
        state
    }

    #[test]
    fn test_move_adds_velocity_once() {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 50.0);
        ball.vel = Vec2::new(4.0, -2.5);
        move_ball(&mut ball);
        assert_eq!(ball.center, Vec2::new(404.0, 297.5));
    }

    #[test]
    fn test_tick_ignores_dt() {
        let mut a = game_with_ball(Vec2::new(400.0, 300.0), Vec2::new(3.0, 1.0));
        let mut b = a.clone();
        let mut input = InputAdapter::new();
        tick(&mut a, &mut input, SIM_DT);
        tick(&mut b, &mut input, 10.0);
        assert_eq!(a.ball().unwrap().center, b.ball().unwrap().center);
        assert_eq!(a.ball().unwrap().center, Vec2::new(403.0, 301.0));
    }

    #[test]
    fn test_bounce_off_floor() {
        let mut ball = Ball::new(Vec2::new(400.0, 24.0), 50.0);
        ball.vel = Vec2::new(4.0, -3.0);
        assert!(bounce_off_walls(&mut ball, &arena()));
        assert_eq!(ball.vel, Vec2::new(4.0, 3.0));
    }

    #[test]
    fn test_bounce_off_ceiling() {
        let mut ball = Ball::new(Vec2::new(400.0, 576.0), 50.0);
        ball.vel = Vec2::new(-4.0, 3.0);
        assert!(bounce_off_walls(&mut ball, &arena()));
        assert_eq!(ball.vel, Vec2::new(-4.0, -3.0));
    }

    #[test]
    fn test_no_bounce_touching_walls() {
        let mut ball = Ball::new(Vec2::new(400.0, 25.0), 50.0);
        ball.vel = Vec2::new(4.0, -3.0);
        assert!(!bounce_off_walls(&mut ball, &arena()));
        ball.center.y = 575.0;
        assert!(!bounce_off_walls(&mut ball, &arena()));
        assert_eq!(ball.vel, Vec2::new(4.0, -3.0));
    }

    #[test]
    fn test_wall_flip_is_unconditional_on_direction() {
        // Ball already heading back in still gets flipped while outside
        let mut ball = Ball::new(Vec2::new(400.0, 20.0), 50.0);
        ball.vel = Vec2::new(0.0, 2.0);
        assert!(bounce_off_walls(&mut ball, &arena()));
        assert_eq!(ball.vel.y, -2.0);
    }

    #[test]
    fn test_paddle_bounce_with_offset() {
        // Paddle spans y 200..400, ball centre 50 above paddle centre
        let paddle = paddle_at(0.0, 300.0);
        let mut ball = Ball::new(Vec2::new(30.0, 350.0), 50.0);
        ball.vel = Vec2::new(-4.0, 0.0);

        assert!(bounce_off_paddle(&mut ball, &paddle, 1.1, 2.0));
        assert!((ball.vel.x - 4.4).abs() < 1e-5);
        assert!((ball.vel.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_offset_term_not_boosted() {
        let paddle = paddle_at(0.0, 300.0);
        let mut ball = Ball::new(Vec2::new(30.0, 200.0), 50.0);
        ball.vel = Vec2::new(-4.0, 2.0);

        assert!(bounce_off_paddle(&mut ball, &paddle, 1.1, 2.0));
        // 2.0 * 1.1 + (-1.0 * 2.0)
        assert!((ball.vel.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_offset_unbounded() {
        // Ball centre 120 below paddle centre, box still touching the paddle
        let paddle = paddle_at(0.0, 300.0);
        let mut ball = Ball::new(Vec2::new(30.0, 180.0), 50.0);
        ball.vel = Vec2::new(-4.0, 0.0);

        assert!(bounce_off_paddle(&mut ball, &paddle, 1.1, 2.0));
        assert!((ball.vel.y - -2.4).abs() < 1e-5);
    }

    #[test]
    fn test_no_paddle_bounce_when_apart() {
        let paddle = paddle_at(0.0, 300.0);
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 50.0);
        ball.vel = Vec2::new(-4.0, 1.0);
        assert!(!bounce_off_paddle(&mut ball, &paddle, 1.1, 2.0));
        assert_eq!(ball.vel, Vec2::new(-4.0, 1.0));
    }

    #[test]
    fn test_scoring_sides() {
        let arena = arena();
        let mut ball = Ball::new(Vec2::new(24.0, 300.0), 50.0);
        assert_eq!(check_scoring(&ball, &arena), Some(Player::Two));
        ball.center.x = 776.0;
        assert_eq!(check_scoring(&ball, &arena), Some(Player::One));
        ball.center.x = 400.0;
        assert_eq!(check_scoring(&ball, &arena), None);
        ball.center.x = 25.0;
        assert_eq!(check_scoring(&ball, &arena), None);
    }

    #[test]
    fn test_serve_recentres_ball() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut ball = Ball::new(Vec2::new(-10.0, 40.0), 50.0);
        ball.vel = Vec2::new(-9.0, 3.0);
        let vel = serve(&mut ball, &arena(), Vec2::new(4.0, 0.0), &mut rng);
        assert_eq!(ball.center, Vec2::new(400.0, 300.0));
        assert_eq!(ball.vel, vel);
        assert!((vel.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_serve_direction_varies() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ball = Ball::new(Vec2::ZERO, 50.0);
        let first = serve(&mut ball, &arena(), Vec2::new(4.0, 0.0), &mut rng);
        let distinct = (0..20)
            .map(|_| serve(&mut ball, &arena(), Vec2::new(4.0, 0.0), &mut rng))
            .filter(|v| v.distance(first) > 1e-3)
            .count();
        assert!(distinct > 0, "serve angle should be drawn fresh each time");
    }

    #[test]
    fn test_point_for_player_two() {
        let mut state = game_with_ball(Vec2::new(24.0, 300.0), Vec2::ZERO);
        assert_eq!(state.score_text(), "0 - 0");

        let mut input = InputAdapter::new();
        tick(&mut state, &mut input, SIM_DT);

        assert_eq!(state.score(Player::Two), 1);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.score_text(), "0 - 1");
        let ball = state.ball().unwrap();
        assert_eq!(ball.center, state.arena.center());
        assert!((ball.vel.length() - 4.0).abs() < 1e-4);
        assert!(
            state
                .events
                .contains(&GameEvent::PointScored { player: Player::Two })
        );
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Served { .. }))
        );
    }

    #[test]
    fn test_point_for_player_one() {
        let mut state = game_with_ball(Vec2::new(780.0, 300.0), Vec2::new(4.0, 0.0));
        let mut input = InputAdapter::new();
        tick(&mut state, &mut input, SIM_DT);

        assert_eq!(state.score(Player::One), 1);
        assert_eq!(state.score(Player::Two), 0);
        assert_eq!(state.score_text(), "1 - 0");
    }

    #[test]
    fn test_tick_before_initialize_is_noop() {
        let mut state = GameState::deferred(Settings::default(), 1);
        let mut input = InputAdapter::new();
        input.key_down("w");
        input.pointer_drag(10.0, 100.0);

        for _ in 0..10 {
            tick(&mut state, &mut input, SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::Uninitialized);
        assert_eq!(state.time_ticks, 0);
        assert!(state.court.is_none());
        assert!(state.events.is_empty());
        assert!(input.is_empty());
    }

    #[test]
    fn test_events_cleared_each_tick() {
        let mut state = game_with_ball(Vec2::new(400.0, 20.0), Vec2::new(1.0, -1.0));
        let mut input = InputAdapter::new();
        tick(&mut state, &mut input, SIM_DT);
        assert_eq!(state.events, vec![GameEvent::WallBounce]);

        let ball = &mut state.court.as_mut().unwrap().ball;
        ball.center = Vec2::new(400.0, 300.0);
        tick(&mut state, &mut input, SIM_DT);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameState::new(Settings::default(), 42);
        let mut b = GameState::new(Settings::default(), 42);
        let mut input = InputAdapter::new();
        for _ in 0..2000 {
            tick(&mut a, &mut input, SIM_DT);
            tick(&mut b, &mut input, SIM_DT);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    proptest! {
        #[test]
        fn prop_wall_flip_keeps_horizontal(
            x in 100.0f32..700.0,
            below in proptest::bool::ANY,
            depth in 0.1f32..20.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
        ) {
            let y = if below { 25.0 - depth } else { 575.0 + depth };
            let mut ball = Ball::new(Vec2::new(x, y), 50.0);
            ball.vel = Vec2::new(vx, vy);
            prop_assert!(bounce_off_walls(&mut ball, &arena()));
            prop_assert_eq!(ball.vel.x, vx);
            prop_assert_eq!(ball.vel.y, -vy);
        }

        #[test]
        fn prop_paddle_bounce_boosts_horizontal(
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            dy in -120.0f32..120.0,
        ) {
            prop_assume!(vx.abs() > 0.01);
            let paddle = paddle_at(0.0, 300.0);
            let mut ball = Ball::new(Vec2::new(30.0, 300.0 + dy), 50.0);
            ball.vel = Vec2::new(vx, vy);
            prop_assert!(bounce_off_paddle(&mut ball, &paddle, 1.1, 2.0));
            prop_assert!(ball.vel.x.signum() != vx.signum());
            prop_assert!((ball.vel.x.abs() - vx.abs() * 1.1).abs() < 1e-4);
            prop_assert!(ball.vel.x.abs() > vx.abs());
        }

        #[test]
        fn prop_serve_speed_is_base_speed(seed in any::<u64>(), speed in 0.5f32..50.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ball = Ball::new(Vec2::ZERO, 50.0);
            let vel = serve(&mut ball, &arena(), Vec2::new(speed, 0.0), &mut rng);
            prop_assert_eq!(ball.center, arena().center());
            prop_assert!((vel.length() - speed).abs() < speed * 1e-5);
        }

        #[test]
        fn prop_scores_never_decrease(
            seed in any::<u64>(),
            keys in proptest::collection::vec(0usize..5, 0..300),
        ) {
            let symbols = ["w", "s", "up", "down", "space"];
            let mut state = GameState::new(Settings::default(), seed);
            let mut input = InputAdapter::new();
            let mut last = (0, 0);
            for key in keys {
                input.key_down(symbols[key]);
                for _ in 0..10 {
                    tick(&mut state, &mut input, SIM_DT);
                    let now = (state.score(Player::One), state.score(Player::Two));
                    prop_assert!(now.0 >= last.0 && now.1 >= last.1);
                    prop_assert!(now.0 + now.1 <= last.0 + last.1 + 1);
                    last = now;
                }
            }
        }
    }
}
