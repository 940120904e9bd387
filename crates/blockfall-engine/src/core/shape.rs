use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::ShapeError;

/// Occupancy matrix of a block, stored row-major.
///
/// A shape is a rectangle of at most 4×4 cells where each cell is either
/// occupied or empty. Shapes are plain values: rotating one produces a new
/// shape and leaves the original untouched, so the catalog returned by
/// [`ShapeKind::shape`] can never be modified through a falling block.
///
/// Serialized as a matrix of `0`/`1` rows.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Shape, ShapeKind};
///
/// let t = ShapeKind::T.shape();
/// assert_eq!((t.width(), t.height()), (3, 2));
///
/// let rotated = t.rotated_clockwise();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated, Shape::from_rows(&[[1u8, 0], [1, 1], [1, 0]]).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    width: usize,
    height: usize,
    cells: ArrayVec<bool, MAX_CELLS>,
}

const MAX_SIDE: usize = 4;
const MAX_CELLS: usize = MAX_SIDE * MAX_SIDE;

impl Shape {
    /// Builds a shape from rows of cells, where any non-zero value is occupied.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[u8]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(ShapeError::Ragged);
        }
        if height > MAX_SIDE || width > MAX_SIDE {
            return Err(ShapeError::TooLarge);
        }

        let cells = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().map(|&cell| cell != 0))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the cell at column `x`, row `y` is occupied.
    ///
    /// Cells outside the shape's rectangle are reported as empty.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Returns an iterator over the rows of the shape.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Returns the `(dx, dy)` offsets of occupied cells, relative to the top-left cell.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(dx, _)| (side_to_i32(dx), side_to_i32(dy)))
        })
    }

    /// Returns the shape rotated by 90° clockwise.
    ///
    /// The cell at `[row][col]` moves to `[col][height - 1 - row]`, so the
    /// rotated shape is `height` cells wide and `width` cells tall.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let mut cells = ArrayVec::new();
        for new_y in 0..self.width {
            for new_x in 0..self.height {
                cells.push(self.is_occupied(new_y, self.height - 1 - new_x));
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn side_to_i32(n: usize) -> i32 {
    debug_assert!(n < MAX_SIDE);
    n as i32
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(shape: Shape) -> Self {
        shape
            .rows()
            .map(|row| row.iter().map(|&cell| u8::from(cell)).collect())
            .collect()
    }
}

/// The seven tetromino variants of the shape catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShapeKind {
    /// I-block.
    I = 0,
    /// O-block.
    O = 1,
    /// T-block.
    T = 2,
    /// S-block.
    S = 3,
    /// Z-block.
    Z = 4,
    /// J-block.
    J = 5,
    /// L-block.
    L = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// Returns a fresh copy of this kind's shape in spawn orientation.
    #[must_use]
    pub fn shape(self) -> Shape {
        let result = match self {
            Self::I => Shape::from_rows(&[[1u8, 1, 1, 1]]),
            Self::O => Shape::from_rows(&[[1u8, 1], [1, 1]]),
            Self::T => Shape::from_rows(&[[0u8, 1, 0], [1, 1, 1]]),
            Self::S => Shape::from_rows(&[[1u8, 1, 0], [0, 1, 1]]),
            Self::Z => Shape::from_rows(&[[0u8, 1, 1], [1, 1, 0]]),
            Self::J => Shape::from_rows(&[[1u8, 0, 0], [1, 1, 1]]),
            Self::L => Shape::from_rows(&[[0u8, 0, 1], [1, 1, 1]]),
        };
        result.expect("catalog shapes are well formed")
    }
}
