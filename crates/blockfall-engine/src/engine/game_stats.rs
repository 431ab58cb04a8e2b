use std::time::Duration;

/// Points per cleared line.
const LINE_SCORE: u64 = 100;
/// Bonus per level reached, multiplied by the new level.
const LEVEL_UP_BONUS: u64 = 1000;
/// Lines needed to advance one level.
const LINES_PER_LEVEL: i32 = 10;

const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(50);
const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Game statistics: score, level, line counts and the tick counter.
///
/// # Scoring
///
/// - Each cleared line is worth 100 points
/// - Reaching a new level is worth 1000 points times the new level
/// - Every piece that enters play without a preceding clear is worth the
///   current tick count times the level
/// - Game over adds the tick count plus 10 points per level, and 1000 more
///   at the top level
///
/// # Levels
///
/// The game starts at a configurable level and advances one level after the
/// lines-to-next-level countdown drops below zero, at most once per clear.
/// The countdown restarts at 10 after every level-up.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new(1);
/// stats.record_line_clear(4);
///
/// assert_eq!(stats.score(), 400);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    level: u8,
    total_cleared_lines: usize,
    lines_to_next_level: i32,
    ticks: u64,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(Self::MIN_LEVEL)
    }
}

impl GameStats {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 20;

    /// Creates statistics for a game starting at `level`, clamped to the valid range.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self {
            score: 0,
            level: level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL),
            total_cleared_lines: 0,
            lines_to_next_level: LINES_PER_LEVEL,
            ticks: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Lines still needed before the next level-up.
    ///
    /// The level advances once this goes below zero.
    #[must_use]
    pub const fn lines_to_next_level(&self) -> i32 {
        self.lines_to_next_level
    }

    /// Number of moves the engine has applied.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Index `n` counts the clears that removed `n` lines at once; index 0 is unused.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Time between automatic descents at the current level.
    ///
    /// Starts at one second and shrinks by 50 ms per level above the first,
    /// never dropping below 100 ms.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        let steps = u32::from(self.level.saturating_sub(Self::MIN_LEVEL));
        INITIAL_DROP_INTERVAL
            .saturating_sub(DROP_INTERVAL_STEP * steps)
            .max(MIN_DROP_INTERVAL)
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }

    /// Updates score, lines and level after `lines` were cleared at once.
    ///
    /// # Returns
    ///
    /// `true` if the level increased.
    pub fn record_line_clear(&mut self, lines: usize) -> bool {
        if lines == 0 {
            return false;
        }

        self.total_cleared_lines += lines;
        if let Some(count) = self.line_cleared_counter.get_mut(lines) {
            *count += 1;
        }
        self.score += LINE_SCORE * lines as u64;
        self.lines_to_next_level -= i32::try_from(lines).unwrap_or(i32::MAX);

        if self.lines_to_next_level >= 0 {
            return false;
        }
        self.lines_to_next_level = LINES_PER_LEVEL;
        if self.level >= Self::MAX_LEVEL {
            return false;
        }
        self.level += 1;
        self.score += LEVEL_UP_BONUS * u64::from(self.level);
        true
    }

    /// Awards points for a piece entering play.
    pub fn record_piece_consumed(&mut self) {
        self.score += self.ticks * u64::from(self.level);
    }

    /// Awards the end-of-game bonus.
    pub fn record_game_over(&mut self) {
        self.score += self.ticks + u64::from(self.level) * 10;
        if self.level == Self::MAX_LEVEL {
            self.score += LEVEL_UP_BONUS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_level() {
        assert_eq!(GameStats::new(0).level(), 1);
        assert_eq!(GameStats::new(7).level(), 7);
        assert_eq!(GameStats::new(99).level(), 20);
    }

    #[test]
    fn test_line_clear_scores_at_least_100_per_line() {
        for level in [1, 5, 19, 20] {
            for lines in 1..=4 {
                let mut stats = GameStats::new(level);
                stats.record_line_clear(lines);
                assert!(stats.score() >= 100 * lines as u64);
                assert_eq!(stats.total_cleared_lines(), lines);
            }
        }
    }

    #[test]
    fn test_level_up_when_countdown_goes_negative() {
        let mut stats = GameStats::new(1);
        for _ in 0..2 {
            assert!(!stats.record_line_clear(4));
        }
        assert_eq!(stats.lines_to_next_level(), 2);
        assert!(!stats.record_line_clear(2));
        assert_eq!(stats.lines_to_next_level(), 0);
        assert_eq!(stats.level(), 1);

        assert!(stats.record_line_clear(1));
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.lines_to_next_level(), 10);
        // 11 lines plus the level 2 bonus
        assert_eq!(stats.score(), 1100 + 2000);
    }

    #[test]
    fn test_level_never_skips() {
        let mut stats = GameStats::new(1);
        for expected in 1..=10_u8 {
            assert_eq!(stats.level(), expected);
            for _ in 0..3 {
                stats.record_line_clear(4);
            }
        }
        // 30 clears of 4 lines: one level-up every 3 clears (12 lines)
        assert_eq!(stats.level(), 11);
    }

    #[test]
    fn test_no_bonus_at_max_level() {
        let mut stats = GameStats::new(20);
        for _ in 0..3 {
            assert!(!stats.record_line_clear(4));
        }
        assert_eq!(stats.level(), 20);
        assert_eq!(stats.score(), 1200);
        assert_eq!(stats.lines_to_next_level(), 10);
    }

    #[test]
    fn test_piece_consumed_scores_ticks_times_level() {
        let mut stats = GameStats::new(3);
        for _ in 0..7 {
            stats.record_tick();
        }
        stats.record_piece_consumed();
        assert_eq!(stats.score(), 21);
    }

    #[test]
    fn test_game_over_bonus() {
        let mut stats = GameStats::new(4);
        for _ in 0..5 {
            stats.record_tick();
        }
        stats.record_game_over();
        assert_eq!(stats.score(), 5 + 40);

        let mut stats = GameStats::new(20);
        stats.record_game_over();
        assert_eq!(stats.score(), 200 + 1000);
    }

    #[test]
    fn test_drop_interval() {
        assert_eq!(GameStats::new(1).drop_interval(), Duration::from_millis(1000));
        assert_eq!(GameStats::new(2).drop_interval(), Duration::from_millis(950));
        assert_eq!(GameStats::new(10).drop_interval(), Duration::from_millis(550));
        assert_eq!(GameStats::new(19).drop_interval(), Duration::from_millis(100));
        assert_eq!(GameStats::new(20).drop_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_drop_interval_below_min_level() {
        assert_eq!(GameStats::new(0).drop_interval(), Duration::from_millis(1000));
        let stats = GameStats {
            level: 0,
            ..GameStats::new(1)
        };
        assert_eq!(stats.drop_interval(), Duration::from_millis(1000));
    }
}
