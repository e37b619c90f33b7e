//! Round countdown state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Countdown for the active round.
///
/// Every [`TimerState::start`] bumps `generation`, which retires whatever
/// countdown was running before. Ticks are addressed to a generation, so a
/// tick from a retired countdown is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub generation: u64,
    pub active: bool,
    pub remaining_seconds: u64,
}

/// Result of delivering one tick to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Tick belonged to a stopped or retired countdown
    Ignored,
    Running(u64),
    Expired,
}

impl TimerState {
    /// Create a new inactive timer state
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh countdown, cancelling any previous one
    pub fn start(&mut self, seconds: u64) -> u64 {
        self.generation += 1;
        self.active = true;
        self.remaining_seconds = seconds;
        self.generation
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Check if the timer is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deliver one elapsed second to countdown `generation`.
    ///
    /// Expiry stops the countdown, so a generation expires at most once.
    pub fn tick(&mut self, generation: u64) -> Tick {
        if !self.active || generation != self.generation {
            return Tick::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.active = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining_seconds)
        }
    }

    pub fn clock(&self) -> Clock {
        Clock(self.remaining_seconds)
    }
}

/// Remaining time rendered as `MM:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock(pub u64);

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
