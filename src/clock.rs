//! Pausable stopwatch driven by frame deltas

use std::time::Duration;

/// Stopwatch that only accumulates time while running. The host loop feeds
/// it measured frame deltas, so time spent paused never counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PausableClock {
    elapsed: Duration,
    paused: bool,
}

impl PausableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time accumulated since the last restart
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[allow(dead_code)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Add a frame delta; ignored while paused
    pub fn advance(&mut self, delta: Duration) {
        if !self.paused {
            self.elapsed += delta;
        }
    }

    /// Reset to zero and resume. Returns the time elapsed before the reset.
    pub fn restart(&mut self) -> Duration {
        let elapsed = self.elapsed;
        self.elapsed = Duration::ZERO;
        self.paused = false;
        elapsed
    }

    pub fn pause(&mut self) {
        assert!(!self.paused, "clock is already paused");
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        assert!(self.paused, "clock is not paused");
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.unpause();
        } else {
            self.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_time_is_excluded() {
        let mut clock = PausableClock::new();
        clock.advance(Duration::from_millis(300));
        clock.pause();
        clock.advance(Duration::from_secs(10));
        clock.unpause();
        clock.advance(Duration::from_millis(200));
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_restart_resumes() {
        let mut clock = PausableClock::new();
        clock.advance(Duration::from_millis(40));
        clock.pause();
        assert_eq!(clock.restart(), Duration::from_millis(40));
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_double_pause_panics() {
        let mut clock = PausableClock::new();
        clock.pause();
        clock.pause();
    }
}
