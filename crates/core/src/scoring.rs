//! Scoring module - the scoring collaborator
//!
//! The game logic only emits events; [`ScoreKeeper`] turns them into points,
//! levels and the level-derived fall interval the driver feeds back into
//! [`crate::GameLogic::update`].
//!
//! Rules:
//! - Classic line-clear table, multiplied by (level + 1).
//! - T-Spin clears use the T-Spin table instead of the classic one.
//! - B2B applies a 3/2 multiplier to the base clear points (before combo bonus).
//! - Combo bonus is `COMBO_BASE * combo_index` with no level multiplier.
//! - Soft drop scores 1 per cell, hard drop 2 per cell.

use std::time::Duration;

use serde::Serialize;

use blockfall_types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS,
    LINES_PER_LEVEL, LINE_SCORES,
};

use crate::events::{GameEvent, GameObserver};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreResult {
    /// Base points for the clear (includes B2B multiplier, excludes combo bonus).
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`.
    pub combo_bonus: u32,
    pub total: u32,
    pub qualifies_for_b2b: bool,
    /// Whether a B2B multiplier was applied to this clear.
    pub b2b_applied: bool,
}

/// Calculate line clear score (Classic rules)
/// lines: number of lines cleared (1-4)
/// level: current level (0-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines] * (level + 1)
}

/// Calculate T-spin score (Modern rules)
pub fn calculate_tspin_score(tspin: TSpinKind, lines: usize, level: u32) -> u32 {
    let base = match (tspin, lines) {
        (TSpinKind::Full, 0) => 400,
        (TSpinKind::Full, 1) => 800,
        (TSpinKind::Full, 2) => 1200,
        (TSpinKind::Full, 3) => 1600,
        (TSpinKind::Mini, 0) => 100,
        (TSpinKind::Mini, 1) => 200,
        (TSpinKind::Mini, 2) => 400,
        _ => 0,
    };
    base * (level + 1)
}

/// Calculate combo bonus.
///
/// - `-1`: no combo chain
/// - `0`: first clear in chain (no bonus)
/// - `1+`: bonus applies as `COMBO_BASE * combo_index`
pub fn calculate_combo_bonus(combo_index: i32) -> u32 {
    if combo_index <= 0 {
        return 0;
    }
    COMBO_BASE * (combo_index as u32)
}

/// B2B applies to: T-spin full with any lines, or Tetris (4 lines)
pub fn qualifies_for_b2b(tspin: TSpinKind, lines: usize) -> bool {
    matches!(
        (tspin, lines),
        (TSpinKind::Full, 1..=4) | (TSpinKind::None, 4)
    )
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points
        .saturating_mul(B2B_NUMERATOR)
        .saturating_div(B2B_DENOMINATOR)
}

/// Calculate complete score for a lock.
pub fn calculate_score(
    lines: usize,
    level: u32,
    tspin: TSpinKind,
    combo_index: i32,
    previous_b2b: bool,
) -> ScoreResult {
    let qualifies_b2b = qualifies_for_b2b(tspin, lines);

    let base_points = match tspin {
        TSpinKind::Full | TSpinKind::Mini => calculate_tspin_score(tspin, lines, level),
        TSpinKind::None => calculate_line_score(lines, level),
    };

    let b2b_applied = qualifies_b2b && previous_b2b;
    let line_clear_score = if b2b_applied {
        apply_b2b_multiplier(base_points)
    } else {
        base_points
    };

    let combo_bonus = calculate_combo_bonus(combo_index);
    let total = line_clear_score.saturating_add(combo_bonus);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total,
        qualifies_for_b2b: qualifies_b2b,
        b2b_applied,
    }
}

/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * 2
    } else {
        cells
    }
}

/// Get drop interval for a level (in milliseconds)
pub fn drop_interval_ms(level: u32) -> u32 {
    DROP_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}

/// Point totals, level progression and the fall speed derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreKeeper {
    score: u32,
    start_level: u32,
    level: u32,
    lines: u32,
    combo: i32,
    back_to_back: bool,
    last_clear: Option<ScoreResult>,
    #[serde(skip)]
    play_time: Duration,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::with_start_level(0)
    }

    pub fn with_start_level(start_level: u32) -> Self {
        Self {
            score: 0,
            start_level,
            level: start_level,
            lines: 0,
            combo: -1,
            back_to_back: false,
            last_clear: None,
            play_time: Duration::ZERO,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn last_clear(&self) -> Option<ScoreResult> {
        self.last_clear
    }

    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Gravity interval for the current level.
    pub fn fall_interval(&self) -> Duration {
        Duration::from_millis(u64::from(drop_interval_ms(self.level)))
    }

    pub fn tick(&mut self, dt: Duration) {
        self.play_time += dt;
    }

    pub fn reset(&mut self) {
        *self = Self::with_start_level(self.start_level);
    }

    /// Fold one game event into the totals.
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SoftDropped { cells } => {
                self.score = self.score.saturating_add(calculate_drop_score(*cells, false));
            }
            GameEvent::HardDropped { distance } => {
                self.score = self.score.saturating_add(calculate_drop_score(*distance, true));
            }
            GameEvent::PieceLocked {
                t_spin,
                lines_cleared,
                ..
            } => self.apply_lock(*t_spin, *lines_cleared),
            _ => {}
        }
    }

    fn apply_lock(&mut self, t_spin: TSpinKind, lines: usize) {
        if lines == 0 {
            self.combo = -1;
            if t_spin.is_t_spin() {
                let points = calculate_tspin_score(t_spin, 0, self.level);
                self.score = self.score.saturating_add(points);
            }
            return;
        }

        self.combo += 1;
        let result = calculate_score(lines, self.level, t_spin, self.combo, self.back_to_back);
        self.score = self.score.saturating_add(result.total);
        self.back_to_back = result.qualifies_for_b2b;
        self.last_clear = Some(result);

        self.lines += lines as u32;
        self.level = self.start_level + self.lines / LINES_PER_LEVEL;
        log::debug!(
            "cleared {} lines for {} points (level {})",
            lines,
            result.total,
            self.level
        );
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObserver for ScoreKeeper {
    fn on_event(&mut self, event: &GameEvent) {
        self.apply(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_types::PieceKind;

    fn lock(t_spin: TSpinKind, lines: usize) -> GameEvent {
        GameEvent::PieceLocked {
            kind: PieceKind::T,
            cells: Vec::new(),
            t_spin,
            lines_cleared: lines,
        }
    }

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(1, 0), 40);
        assert_eq!(calculate_line_score(4, 0), 1200);
        assert_eq!(calculate_line_score(2, 2), 300);
        assert_eq!(calculate_line_score(0, 5), 0);
        assert_eq!(calculate_line_score(5, 0), 0);
    }

    #[test]
    fn test_tspin_scores() {
        assert_eq!(calculate_tspin_score(TSpinKind::Full, 2, 0), 1200);
        assert_eq!(calculate_tspin_score(TSpinKind::Mini, 1, 1), 400);
        assert_eq!(calculate_tspin_score(TSpinKind::None, 1, 0), 0);
    }

    #[test]
    fn test_b2b_and_combo() {
        let first = calculate_score(4, 0, TSpinKind::None, 0, false);
        assert_eq!(first.total, 1200);
        assert!(first.qualifies_for_b2b);
        assert!(!first.b2b_applied);

        let second = calculate_score(4, 0, TSpinKind::None, 1, true);
        assert_eq!(second.line_clear_score, 1800);
        assert_eq!(second.combo_bonus, 50);
        assert_eq!(second.total, 1850);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(0), 1000);
        assert_eq!(drop_interval_ms(5), 320);
        assert_eq!(drop_interval_ms(8), 160);
        assert_eq!(drop_interval_ms(30), 120);
    }

    #[test]
    fn test_keeper_drop_points() {
        let mut keeper = ScoreKeeper::new();
        keeper.apply(&GameEvent::SoftDropped { cells: 1 });
        keeper.apply(&GameEvent::HardDropped { distance: 10 });
        assert_eq!(keeper.score(), 21);
    }

    #[test]
    fn test_keeper_combo_chain() {
        let mut keeper = ScoreKeeper::new();
        keeper.apply(&lock(TSpinKind::None, 1));
        assert_eq!(keeper.combo(), 0);
        assert_eq!(keeper.score(), 40);

        keeper.apply(&lock(TSpinKind::None, 1));
        assert_eq!(keeper.combo(), 1);
        assert_eq!(keeper.score(), 40 + 40 + 50);

        keeper.apply(&lock(TSpinKind::None, 0));
        assert_eq!(keeper.combo(), -1);
        assert_eq!(keeper.lines(), 2);
    }

    #[test]
    fn test_keeper_level_speeds_up_gravity() {
        let mut keeper = ScoreKeeper::new();
        assert_eq!(keeper.fall_interval(), Duration::from_millis(1000));
        for _ in 0..3 {
            keeper.apply(&lock(TSpinKind::None, 4));
        }
        assert_eq!(keeper.lines(), 12);
        assert_eq!(keeper.level(), 1);
        assert_eq!(keeper.fall_interval(), Duration::from_millis(800));
    }

    #[test]
    fn test_keeper_tspin_without_lines() {
        let mut keeper = ScoreKeeper::new();
        keeper.apply(&lock(TSpinKind::Full, 0));
        assert_eq!(keeper.score(), 400);
        assert_eq!(keeper.lines(), 0);
    }

    #[test]
    fn test_keeper_reset_keeps_start_level() {
        let mut keeper = ScoreKeeper::with_start_level(3);
        keeper.apply(&lock(TSpinKind::None, 2));
        keeper.tick(Duration::from_millis(16));
        keeper.reset();
        assert_eq!(keeper.score(), 0);
        assert_eq!(keeper.level(), 3);
        assert_eq!(keeper.play_time(), Duration::ZERO);
    }
}
