//! Timers module - the two logical clocks of a game session
//!
//! Gravity and the line-clear delay are plain counters advanced by the
//! elapsed time the host passes to `GameState::tick`, so the game can be
//! driven by synthetic time in tests. There is exactly one gravity
//! accumulator: restarting the gravity driver means resetting it.

/// Gravity accumulator and line-clear countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timers {
    gravity_elapsed_ms: u32,
    clear_remaining_ms: u32,
    clear_total_ms: u32,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop both clocks.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restart the gravity driver from zero (level change, soft drop, new game).
    pub fn restart_gravity(&mut self) {
        self.gravity_elapsed_ms = 0;
    }

    pub fn accumulate_gravity(&mut self, elapsed_ms: u32) {
        self.gravity_elapsed_ms = self.gravity_elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Consume one gravity period if enough time has accumulated.
    pub fn take_gravity_step(&mut self, period_ms: u32) -> bool {
        let period_ms = period_ms.max(1);
        if self.gravity_elapsed_ms >= period_ms {
            self.gravity_elapsed_ms -= period_ms;
            true
        } else {
            false
        }
    }

    pub fn gravity_elapsed_ms(&self) -> u32 {
        self.gravity_elapsed_ms
    }

    /// Begin the line-clear countdown.
    pub fn start_clear(&mut self, duration_ms: u32) {
        self.clear_remaining_ms = duration_ms;
        self.clear_total_ms = duration_ms;
    }

    /// Advance the line-clear countdown; true once it has expired.
    pub fn advance_clear(&mut self, elapsed_ms: u32) -> bool {
        self.clear_remaining_ms = self.clear_remaining_ms.saturating_sub(elapsed_ms);
        self.clear_remaining_ms == 0
    }

    pub fn clear_remaining_ms(&self) -> u32 {
        self.clear_remaining_ms
    }

    /// Fraction of the clear delay that has elapsed, in [0, 1].
    pub fn clear_progress(&self) -> f32 {
        if self.clear_total_ms == 0 {
            return 1.0;
        }
        1.0 - (self.clear_remaining_ms as f32 / self.clear_total_ms as f32)
    }
}
