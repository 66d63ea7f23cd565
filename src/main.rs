//! Twin Pong headless host
//!
//! Drives the simulation at the configured tick rate without a window and
//! logs what happens. Usage:
//!
//! ```text
//! twin-pong [settings.json] [ticks] [--fast]
//! ```
//!
//! `--fast` skips real-time pacing.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use twin_pong::Settings;
    use twin_pong::sim::{GameEvent, GameState, InputAdapter, tick};

    /// Default run length: one minute of play
    const DEFAULT_TICKS: u64 = 60 * 60;
    /// Scripted key presses, one every `KEY_INTERVAL` ticks
    const DEMO_KEYS: [&str; 6] = ["w", "w", "s", "up", "down", "down"];
    const KEY_INTERVAL: u64 = 30;

    env_logger::init();
    log::info!("Twin Pong (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let fast = args.iter().any(|a| a == "--fast");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));

    let mut settings = match positional.next() {
        Some(path) => Settings::load(path).unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let ticks = positional
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TICKS);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let frame = match Duration::try_from_secs_f32(settings.sim_dt()) {
        Ok(frame) => frame,
        Err(err) => {
            let rate = settings.tick_rate;
            log::warn!("Unusable tick rate {rate}: {err}; using default settings");
            settings = Settings::default();
            Duration::from_secs_f32(settings.sim_dt())
        }
    };
    let dt = settings.sim_dt();

    // Built empty, then initialised on the first scheduled tick like a GUI host would
    let mut state = GameState::deferred(settings, seed);
    let mut input = InputAdapter::new();

    for n in 0..ticks {
        if n == 0 && state.initialize() {
            println!("{}", state.score_text());
        }

        if n % KEY_INTERVAL == 0 {
            let key = DEMO_KEYS[(n / KEY_INTERVAL) as usize % DEMO_KEYS.len()];
            input.key_down(key);
        }

        tick(&mut state, &mut input, dt);

        for event in &state.events {
            match event {
                GameEvent::PointScored { .. } => println!("{}", state.score_text()),
                GameEvent::WallBounce | GameEvent::PaddleBounce { .. } => {
                    log::trace!("tick {}: {event:?}", state.time_ticks)
                }
                GameEvent::Served { velocity } => {
                    log::debug!("tick {}: serve {velocity}", state.time_ticks)
                }
            }
        }

        if !fast {
            std::thread::sleep(frame);
        }
    }

    match serde_json::to_string(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize final state: {err}"),
    }
    log::info!("Final score {} after {} ticks", state.score_text(), state.time_ticks);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts drive the library directly
}
