//! Frame-driven playback clock.
//!
//! The shell calls [`PlaybackClock::tick`] from its per-frame callback. The
//! clock advances at most one word per tick and moves its reference point by
//! exactly one interval, so frame jitter does not accumulate across words.

use std::time::{Duration, Instant};

pub const MIN_WPM: u32 = 100;
pub const MAX_WPM: u32 = 1000;
pub const DEFAULT_WPM: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running { last_advance: Instant },
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    wpm: u32,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_WPM)
    }
}

impl PlaybackClock {
    pub fn new(wpm: u32) -> Self {
        Self {
            state: ClockState::Stopped,
            wpm: clamp_wpm(wpm),
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Takes effect on the next tick; the reference point is kept.
    pub fn set_wpm(&mut self, wpm: u32) {
        self.wpm = clamp_wpm(wpm);
    }

    pub fn interval(&self) -> Duration {
        interval_for(self.wpm)
    }

    /// Start running unless the current word is already the last one.
    pub fn start(&mut self, now: Instant, index: usize, word_count: usize) -> bool {
        if word_count == 0 || index + 1 >= word_count {
            tracing::debug!(index, word_count, "Refusing to start clock at end of text");
            return false;
        }
        if !self.is_running() {
            self.state = ClockState::Running { last_advance: now };
            tracing::debug!(wpm = self.wpm, index, "Playback clock started");
        }
        true
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            tracing::debug!("Playback clock stopped");
        }
        self.state = ClockState::Stopped;
    }

    /// One scheduling decision. Returns true when the caller should advance
    /// the index by exactly one word.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ClockState::Running { last_advance } = self.state else {
            return false;
        };
        let interval = self.interval();
        let elapsed = now.saturating_duration_since(last_advance);
        if elapsed < interval {
            return false;
        }

        let mut next_reference = last_advance + interval;
        if now.saturating_duration_since(next_reference) >= interval {
            // Frames were throttled for more than a whole word; resync instead
            // of bursting through the backlog.
            tracing::trace!(?elapsed, ?interval, "Clock fell behind, resyncing");
            next_reference = now;
        }
        self.state = ClockState::Running {
            last_advance: next_reference,
        };
        true
    }
}

pub fn clamp_wpm(wpm: u32) -> u32 {
    wpm.clamp(MIN_WPM, MAX_WPM)
}

pub fn interval_for(wpm: u32) -> Duration {
    Duration::from_micros(60_000_000 / u64::from(clamp_wpm(wpm)))
}
