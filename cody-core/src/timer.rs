//! Interview countdown.
//!
//! `Countdown` is the pure half of the timer: remaining seconds plus a
//! generation stamp. The half that actually sleeps lives in
//! [`crate::runtime`], which sends one tick per second tagged with the
//! generation it was started for. Every `start` and `stop` bumps the
//! generation, so ticks already in flight for an older countdown are dropped
//! by [`Countdown::tick`] instead of decrementing the new one.

use std::time::Duration;

/// Default interview length: 45 minutes.
pub const INTERVIEW_DURATION: Duration = Duration::from_secs(45 * 60);

/// Cadence of the countdown task.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    generation: u64,
}

/// What a tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick belonged to an older countdown or the countdown was already at zero.
    Ignored,
    /// One second elapsed; time is left.
    Running,
    /// This tick took the countdown to zero.
    Expired,
}

impl Countdown {
    /// Seconds left. Zero means no countdown is active.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Stamp that ticks must carry to be counted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Replaces any running countdown with a fresh one of `seconds`.
    pub fn start(&mut self, seconds: u32) {
        self.generation += 1;
        self.remaining = seconds;
    }

    /// Stops the countdown and invalidates any tick already scheduled for it.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.remaining = 0;
    }

    /// Applies one tick stamped with `generation`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || self.remaining == 0 {
            return TickOutcome::Ignored;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    /// Formats the remaining time as `m:ss`.
    pub fn format(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
