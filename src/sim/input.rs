//! Paddle input
//!
//! The host translates its platform events into calls on an [`InputAdapter`];
//! the simulation drains the adapter and turns each event into a paddle
//! centre setpoint. Nothing here knows about windows or devices.

use super::state::{GameState, Player};

/// Keys the game responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Player one up
    W,
    /// Player one down
    S,
    /// Player two up
    Up,
    /// Player two down
    Down,
}

impl Key {
    /// Map a host key symbol to a game key
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "w" => Some(Key::W),
            "s" => Some(Key::S),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            _ => None,
        }
    }

    /// Paddle this key moves
    pub fn player(self) -> Player {
        match self {
            Key::W | Key::S => Player::One,
            Key::Up | Key::Down => Player::Two,
        }
    }

    /// +1 for up, -1 for down
    pub fn direction(self) -> f32 {
        match self {
            Key::W | Key::Up => 1.0,
            Key::S | Key::Down => -1.0,
        }
    }
}

/// A raw input event queued by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer/touch dragged to (x, y) in arena coordinates
    PointerDrag { x: f32, y: f32 },
    KeyDown(Key),
}

/// Event queue between the host and the simulation
#[derive(Debug, Clone)]
pub struct InputAdapter {
    pending: Vec<InputEvent>,
    keyboard_attached: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            keyboard_attached: true,
        }
    }
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pointer drag
    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        self.pending.push(InputEvent::PointerDrag { x, y });
    }

    /// Queue a key press
    ///
    /// Unknown symbols, and all keys while the keyboard is released, are
    /// dropped. Always reports the event as consumed.
    pub fn key_down(&mut self, symbol: &str) -> bool {
        if !self.keyboard_attached {
            return true;
        }
        match Key::from_symbol(symbol) {
            Some(key) => self.pending.push(InputEvent::KeyDown(key)),
            None => log::trace!("Ignoring key {symbol:?}"),
        }
        true
    }

    /// Detach the keyboard (the host lost it); pointer input still works
    pub fn release_keyboard(&mut self) {
        if self.keyboard_attached {
            log::debug!("Keyboard released");
        }
        self.keyboard_attached = false;
        self.pending.retain(|event| !matches!(event, InputEvent::KeyDown(_)));
    }

    pub fn attach_keyboard(&mut self) {
        self.keyboard_attached = true;
    }

    pub fn is_keyboard_attached(&self) -> bool {
        self.keyboard_attached
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Take all queued events in arrival order
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.pending.drain(..)
    }
}

/// Which paddle a pointer at `x` controls, by thirds of the arena width
pub fn pointer_target(x: f32, arena_width: f32) -> Option<Player> {
    let third = arena_width / 3.0;
    if x < third {
        Some(Player::One)
    } else if x > arena_width - third {
        Some(Player::Two)
    } else {
        None
    }
}

impl GameState {
    /// Apply every queued event to the paddles
    ///
    /// Events are still drained before initialisation, but dropped.
    pub fn apply_input(&mut self, input: &mut InputAdapter) {
        for event in input.drain() {
            self.handle_input(event);
        }
    }

    /// Apply one event to the paddles
    pub fn handle_input(&mut self, event: InputEvent) {
        let width = self.arena.width();
        let step = self.settings.key_step;
        let Some(court) = self.court.as_mut() else {
            return;
        };

        match event {
            InputEvent::PointerDrag { x, y } => {
                if let Some(player) = pointer_target(x, width) {
                    court.paddle_mut(player).set_center_y(y);
                }
            }
            InputEvent::KeyDown(key) => {
                court.paddle_mut(key.player()).nudge(key.direction() * step);
            }
        }
    }
}
