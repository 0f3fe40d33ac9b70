/// Resend cooldown used when none is configured
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Whole-second countdown gating the "resend code" action.
///
/// Pure state; the one-second cadence comes from whoever calls [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration: u64,
    remaining: u64,
    resend_enabled: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration: duration_secs,
            remaining: duration_secs,
            resend_enabled: duration_secs == 0,
        }
    }

    /// A countdown of `duration_secs` that has already run out
    pub fn finished(duration_secs: u64) -> Self {
        Self {
            duration: duration_secs,
            remaining: 0,
            resend_enabled: true,
        }
    }

    /// Advance by one second. Ticking a finished countdown does nothing.
    pub fn tick(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.resend_enabled = true;
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.resend_enabled = self.duration == 0;
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn resend_enabled(&self) -> bool {
        self.resend_enabled
    }
}
