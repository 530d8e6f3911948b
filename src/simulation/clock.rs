//! Frame timing with pause support
//!
//! Deltas only cover time spent unpaused: while the window is minimized the
//! clock stops, and the first tick after resuming reports zero.

use std::time::{Duration, Instant};

use log::debug;

#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    paused: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            paused: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            debug!("Frame clock paused");
            self.paused = true;
            self.last = None;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            debug!("Frame clock resumed");
            self.paused = false;
        }
    }

    /// Seconds since the previous tick, using the current time
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds since the previous tick, as seen at `now`
    ///
    /// Returns 0 while paused and on the first tick after construction or
    /// resume.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        if self.paused {
            return 0.0;
        }

        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        delta.as_secs_f32()
    }
}
