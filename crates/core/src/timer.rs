//! Session timer
//!
//! `Stopped -> Running <-> Paused -> Stopped (expired)`.
//!
//! The timer only advances through [`Timer::update`], called by the host once
//! per frame. Expiry is reported exactly once per [`Timer::start`].

/// Counts elapsed gameplay time against a fixed duration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    /// Elapsed time in milliseconds, from 0 to `duration`
    elapsed_ms: u64,
    duration_ms: u64,
    /// True while counting, even if paused
    running: bool,
    paused: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully stop and zero the timer
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reset, then fix the session duration
    pub fn setup(&mut self, duration_ms: u64) {
        self.reset();
        self.duration_ms = duration_ms;
    }

    pub fn start(&mut self) {
        self.running = true;
        self.paused = false;
        self.elapsed_ms = 0;
    }

    /// Stop and mark the time as complete, without reporting expiry
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.elapsed_ms = self.duration_ms;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance by `delta_ms`. Returns true on the call that reaches the duration.
    pub fn update(&mut self, delta_ms: u64) -> bool {
        if !self.running || self.paused {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if self.elapsed_ms >= self.duration_ms {
            self.stop();
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }
}
