/// Seconds each question stays open before it counts as unanswered.
pub const QUESTION_SECONDS: u32 = 10;

/// Result of feeding one elapsed second into a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still running with this many seconds left.
    Remaining(u32),
    /// Just reached zero. Reported once.
    Expired,
    /// The countdown was cancelled or has already expired.
    Stopped,
}

/// Per-question countdown arithmetic. The scheduling of ticks lives elsewhere;
/// this only tracks how many seconds are left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    start: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            start: seconds,
            remaining: seconds,
            running: true,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&mut self) -> CountdownTick {
        if !self.running {
            return CountdownTick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            CountdownTick::Expired
        } else {
            CountdownTick::Remaining(self.remaining)
        }
    }

    /// Stop counting. The remaining seconds stay visible.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Start again from the full duration.
    pub fn restart(&mut self) {
        self.remaining = self.start;
        self.running = true;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(QUESTION_SECONDS)
    }
}
