use serde::{Deserialize, Serialize};

/// Points awarded for a line clear, indexed by the number of rows cleared at once.
///
/// Clearing more rows than the table covers is worth nothing.
pub const SCORE_TABLE: [usize; 5] = [0, 10, 30, 50, 80];

/// Returns the points for clearing `rows` rows at once.
#[must_use]
pub fn points_for(rows: usize) -> usize {
    SCORE_TABLE.get(rows).copied().unwrap_or(0)
}

/// Game statistics tracking score, cleared rows and locked blocks.
///
/// A block counts as completed once its drop is fully resolved: right away
/// when locking it fills no row, or when the line clear it triggered
/// finishes.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_block_drop(0);
/// stats.complete_block_drop(4);
///
/// assert_eq!(stats.score(), 80);
/// assert_eq!(stats.completed_blocks(), 2);
/// assert_eq!(stats.row_clear_counter(), &[1, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_blocks: usize,
    total_cleared_rows: usize,
    row_clear_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_blocks: 0,
            total_cleared_rows: 0,
            row_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_blocks(&self) -> usize {
        self.completed_blocks
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Histogram of resolved drops by the number of rows they cleared.
    ///
    /// Index 0 counts drops that cleared nothing, index 4 counts four-row clears.
    #[must_use]
    pub const fn row_clear_counter(&self) -> &[usize; 5] {
        &self.row_clear_counter
    }

    /// Records a resolved block drop that cleared `cleared_rows` rows and
    /// returns the points it earned.
    pub fn complete_block_drop(&mut self, cleared_rows: usize) -> usize {
        let points = points_for(cleared_rows);
        self.completed_blocks += 1;
        self.total_cleared_rows += cleared_rows;
        if let Some(count) = self.row_clear_counter.get_mut(cleared_rows) {
            *count += 1;
        }
        self.score += points;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 10);
        assert_eq!(points_for(2), 30);
        assert_eq!(points_for(3), 50);
        assert_eq!(points_for(4), 80);
        assert_eq!(points_for(5), 0);
    }

    #[test]
    fn test_score_accumulates() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_block_drop(1), 10);
        assert_eq!(stats.complete_block_drop(2), 30);
        assert_eq!(stats.complete_block_drop(0), 0);
        assert_eq!(stats.complete_block_drop(3), 50);

        assert_eq!(stats.score(), 90);
        assert_eq!(stats.completed_blocks(), 4);
        assert_eq!(stats.total_cleared_rows(), 6);
        assert_eq!(stats.row_clear_counter(), &[1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_oversized_clear_scores_nothing() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_block_drop(6), 0);
        assert_eq!(stats.total_cleared_rows(), 6);
        assert_eq!(stats.row_clear_counter(), &[0; 5]);
    }
}
