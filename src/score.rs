//! Scoring and leveling

use std::ops::RangeInclusive;
use std::time::Duration;

/// Flat bonus drawn for every locked piece
pub const LOCK_BONUS: RangeInclusive<u64> = 14..=19;
/// Points per cleared line
const LINE_POINTS: u64 = 100;
/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;

/// Score tracking for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Current level, always `1 + lines / 10`
    pub level: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            lines: 0,
            level: 1,
        }
    }

    /// Points for clearing `lines` rows with one piece. Four at once pays double.
    pub fn line_points(lines: u32) -> u64 {
        let base = u64::from(lines) * LINE_POINTS;
        if lines == 4 { base * 2 } else { base }
    }

    /// Account for a locked piece. `bonus` is the random lock bonus.
    /// Returns the points gained.
    pub fn add_lock(&mut self, lines_cleared: u32, bonus: u64) -> u64 {
        let gained = bonus + Self::line_points(lines_cleared);
        self.points += gained;
        self.lines += lines_cleared;
        self.level = 1 + self.lines / LINES_PER_LEVEL;
        gained
    }

    /// Time between gravity steps at the current level
    pub fn fall_speed(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_clear() {
        let mut score = Score::new();
        assert_eq!(score.add_lock(0, 14), 14);
        assert_eq!(score.points, 14);
        assert_eq!(score.lines, 0);
    }

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        score.add_lock(1, 15);
        assert_eq!(score.points, 115);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_only_four_lines_doubles() {
        assert_eq!(Score::line_points(2), 200);
        assert_eq!(Score::line_points(3), 300);
        assert_eq!(Score::line_points(4), 800);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..9 {
            score.add_lock(1, 14);
        }
        assert_eq!(score.level, 1);
        score.add_lock(1, 14);
        assert_eq!(score.level, 2);
        score.add_lock(4, 14);
        assert_eq!(score.lines, 14);
        assert_eq!(score.level, 2);
    }

    #[test]
    fn test_fall_speed_shrinks_with_level() {
        let mut score = Score::new();
        assert_eq!(score.fall_speed(), Duration::from_secs(1));
        score.level = 4;
        assert_eq!(score.fall_speed(), Duration::from_millis(250));
    }
}
