//! Held-key auto-repeat for terminal environments.
//!
//! Left/right and soft drop repeat while held: the first press acts at once,
//! then after `delay_ms` the action repeats every `rate_ms`. Terminals that
//! never report key releases are handled with a timeout: a held key that has
//! not been pressed again within `release_timeout_ms` counts as released.
//!
//! A single press is a tap. Repeats only start once a second press of the
//! same key (terminal auto-repeat, or a `Repeat` key event) confirms it is
//! held, so one tap is always exactly one action.
//!
//! Time is whatever the host passes to [`KeyRepeat::update`], so the repeat
//! clock follows the same frame time as the game.

use arrayvec::ArrayVec;

use crate::types::{
    GameAction, DEFAULT_REPEAT_DELAY_MS, DEFAULT_REPEAT_RATE_MS, SOFT_DROP_REPEAT_DELAY_MS,
    SOFT_DROP_REPEAT_RATE_MS,
};

/// Upper bound on repeats produced by a single update.
pub const MAX_REPEATS_PER_UPDATE: usize = 32;

pub type RepeatActions = ArrayVec<GameAction, MAX_REPEATS_PER_UPDATE>;

const DEFAULT_RELEASE_TIMEOUT_MS: u32 = 150;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
    None,
}

impl Horizontal {
    fn action(self) -> Option<GameAction> {
        match self {
            Horizontal::Left => Some(GameAction::MoveLeft),
            Horizontal::Right => Some(GameAction::MoveRight),
            Horizontal::None => None,
        }
    }
}

/// One repeating channel: time held and time banked toward the next repeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Channel {
    held_ms: u32,
    banked_ms: u32,
    /// Seen a second press since the key went down.
    confirmed: bool,
}

impl Channel {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by `elapsed_ms`, returning how many repeats are due.
    fn advance(&mut self, elapsed_ms: u32, delay_ms: u32, rate_ms: u32) -> u32 {
        let before = self.held_ms;
        self.held_ms = self.held_ms.saturating_add(elapsed_ms);
        if !self.confirmed || self.held_ms < delay_ms {
            return 0;
        }

        // Only the part past the initial delay counts toward repeats.
        let excess = if before < delay_ms {
            self.held_ms - delay_ms
        } else {
            elapsed_ms
        };
        self.banked_ms = self.banked_ms.saturating_add(excess);

        let rate_ms = rate_ms.max(1);
        let due = self.banked_ms / rate_ms;
        self.banked_ms -= due * rate_ms;
        due
    }
}

/// Tracks held movement keys and produces repeated actions.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    horizontal: Horizontal,
    down_held: bool,
    horizontal_channel: Channel,
    down_channel: Channel,
    since_press_ms: u32,
    delay_ms: u32,
    rate_ms: u32,
    release_timeout_ms: u32,
}

impl KeyRepeat {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_REPEAT_DELAY_MS, DEFAULT_REPEAT_RATE_MS)
    }

    /// Horizontal repeat timing; soft drop always uses its own fixed timing.
    pub fn with_config(delay_ms: u32, rate_ms: u32) -> Self {
        Self {
            horizontal: Horizontal::None,
            down_held: false,
            horizontal_channel: Channel::default(),
            down_channel: Channel::default(),
            since_press_ms: 0,
            delay_ms,
            rate_ms,
            release_timeout_ms: DEFAULT_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn release_timeout_ms(&self) -> u32 {
        self.release_timeout_ms
    }

    pub fn horizontal(&self) -> Horizontal {
        self.horizontal
    }

    pub fn is_down_held(&self) -> bool {
        self.down_held
    }

    /// Register a key press that mapped to `action`.
    ///
    /// Returns the action to apply now. A press of a key that is already
    /// held (terminal auto-repeat) only refreshes the release timeout and
    /// returns `None`. Non-repeating actions pass straight through.
    pub fn press(&mut self, action: GameAction) -> Option<GameAction> {
        let direction = match action {
            GameAction::MoveLeft => Horizontal::Left,
            GameAction::MoveRight => Horizontal::Right,
            GameAction::SoftDrop => {
                self.since_press_ms = 0;
                if self.down_held {
                    self.down_channel.confirmed = true;
                    return None;
                }
                self.down_held = true;
                self.down_channel.reset();
                return Some(action);
            }
            _ => return Some(action),
        };

        self.since_press_ms = 0;
        if self.horizontal == direction {
            self.horizontal_channel.confirmed = true;
            return None;
        }
        self.horizontal = direction;
        self.horizontal_channel.reset();
        Some(action)
    }

    /// Register a key release that mapped to `action`.
    pub fn release(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft if self.horizontal == Horizontal::Left => self.release_horizontal(),
            GameAction::MoveRight if self.horizontal == Horizontal::Right => {
                self.release_horizontal()
            }
            GameAction::SoftDrop => self.release_down(),
            _ => {}
        }
    }

    fn release_horizontal(&mut self) {
        self.horizontal = Horizontal::None;
        self.horizontal_channel.reset();
    }

    fn release_down(&mut self) {
        self.down_held = false;
        self.down_channel.reset();
    }

    /// Advance the repeat clocks and collect the repeats that fell due.
    pub fn update(&mut self, elapsed_ms: u32) -> RepeatActions {
        let mut actions = RepeatActions::new();

        self.since_press_ms = self.since_press_ms.saturating_add(elapsed_ms);
        if self.since_press_ms > self.release_timeout_ms {
            self.release_horizontal();
            self.release_down();
        }

        if let Some(action) = self.horizontal.action() {
            let due = self
                .horizontal_channel
                .advance(elapsed_ms, self.delay_ms, self.rate_ms);
            for _ in 0..due {
                if actions.try_push(action).is_err() {
                    break;
                }
            }
        }

        if self.down_held {
            let due = self.down_channel.advance(
                elapsed_ms,
                SOFT_DROP_REPEAT_DELAY_MS,
                SOFT_DROP_REPEAT_RATE_MS,
            );
            for _ in 0..due {
                if actions.try_push(GameAction::SoftDrop).is_err() {
                    break;
                }
            }
        }

        actions
    }

    /// Forget every held key (new game, focus loss).
    pub fn reset(&mut self) {
        self.release_horizontal();
        self.release_down();
        self.since_press_ms = 0;
    }
}

impl Default for KeyRepeat {
    fn default() -> Self {
        Self::new()
    }
}
