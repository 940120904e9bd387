use super::color::BlockColor;

/// A single board cell: empty, or filled with the color of a locked block.
pub type Cell = Option<BlockColor>;

/// Fixed-size grid of locked block cells.
///
/// The board is `row_count` rows of exactly `col_count` cells each. Row 0 is
/// the top of the visible board and rows grow downward. The dimensions never
/// change after construction: clearing rows removes them and inserts the
/// same number of empty rows at the top.
///
/// Coordinates passed as `i32` may lie outside the grid; such cells are
/// reported as absent rather than panicking, which lets callers probe
/// positions of a block that is partially above the board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, BlockColor};
///
/// let mut board = Board::new(4, 3);
/// for x in 0..3 {
///     board.set(x, 3, Some(BlockColor::from("red")));
/// }
/// assert_eq!(board.full_rows(), [3]);
///
/// board.remove_rows(&[3]);
/// assert!(board.rows().all(|row| row.iter().all(Option::is_none)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    col_count: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board of `row_count` × `col_count` cells.
    #[must_use]
    pub fn new(row_count: usize, col_count: usize) -> Self {
        Self {
            col_count,
            rows: vec![empty_row(col_count); row_count],
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.col_count
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.rows.get(y).map(Vec::as_slice)
    }

    /// Returns the cell at column `x`, row `y`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x)
    }

    /// Returns whether the cell at `(x, y)` lies inside the grid and is filled.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.cell(x, y), Some(Some(_)))
    }

    /// Returns whether a block cell may not be placed at `(x, y)`.
    ///
    /// A position is blocked when it is left or right of the grid, at or
    /// below the bottom row, or on a filled cell. Positions above the top
    /// row are never blocked.
    #[must_use]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !usize::try_from(x).is_ok_and(|x| x < self.col_count) {
            return true;
        }
        if usize::try_from(y).is_ok_and(|y| y >= self.row_count()) {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.is_occupied(x, y)
    }

    /// Writes `cell` at column `x`, row `y`.
    ///
    /// Returns `false` without writing when the position is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Returns the indices of rows whose every cell is filled, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes the given rows and prepends as many empty rows.
    ///
    /// Remaining rows keep their relative order and the row count is
    /// unchanged. Indices outside the grid are ignored. Returns the number of
    /// rows removed.
    pub fn remove_rows(&mut self, indices: &[usize]) -> usize {
        let before = self.rows.len();
        let mut y = 0;
        self.rows.retain(|_| {
            let keep = !indices.contains(&y);
            y += 1;
            keep
        });
        let removed = before - self.rows.len();
        let mut rows = vec![empty_row(self.col_count); removed];
        rows.append(&mut self.rows);
        self.rows = rows;
        removed
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(None);
        }
    }

    /// Returns a copy of the grid as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows.clone()
    }
}

fn empty_row(col_count: usize) -> Vec<Cell> {
    vec![None; col_count]
}
