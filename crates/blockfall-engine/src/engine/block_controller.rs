use serde::{Deserialize, Serialize};

use crate::core::{Board, BlockColor, Shape};

/// A block waiting in the upcoming queue: a shape and its color, not yet placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub shape: Shape,
    pub color: BlockColor,
}

/// The block currently under player control.
///
/// `x` and `y` are the board coordinates of the shape's top-left cell. `y`
/// is negative while part of the block is still above the visible board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallingBlock {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: BlockColor,
}

impl FallingBlock {
    /// Returns the board positions covered by the block, including those above the board.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Owner of the single falling block and its interaction with the board.
///
/// The controller never owns the board; every operation that needs it
/// borrows it from the caller. Without an active block all operations are
/// no-ops, which is the normal state between locking one block and spawning
/// the next.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, BlockColor, BlockController, Board, ShapeKind};
///
/// let mut board = Board::new(20, 10);
/// let mut controller = BlockController::new();
/// controller.spawn(
///     &Block { shape: ShapeKind::O.shape(), color: BlockColor::from("yellow") },
///     &board,
/// );
///
/// while controller.try_move(&board, 0, 1) {}
/// controller.lock(&mut board);
///
/// assert!(controller.block().is_none());
/// assert!(board.is_occupied(4, 19));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockController {
    block: Option<FallingBlock>,
}

impl BlockController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn block(&self) -> Option<&FallingBlock> {
        self.block.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn block_mut(&mut self) -> Option<&mut FallingBlock> {
        self.block.as_mut()
    }

    /// Installs `block` as the falling block, centered horizontally and
    /// entirely above the board.
    pub fn spawn(&mut self, block: &Block, board: &Board) {
        let shape = block.shape.clone();
        let x = spawn_x(board.col_count(), shape.width());
        let y = -to_i32(shape.height());
        self.block = Some(FallingBlock {
            shape,
            x,
            y,
            color: block.color.clone(),
        });
    }

    /// Returns whether the falling block overlaps a wall, the floor, or a filled cell.
    ///
    /// Cells above the board never collide.
    #[must_use]
    pub fn collides(&self, board: &Board) -> bool {
        self.block
            .as_ref()
            .is_some_and(|block| collides(block, board))
    }

    /// Moves the falling block by `(dx, dy)` unless the new position collides.
    ///
    /// Returns `true` if the block moved.
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let Some(block) = &mut self.block else {
            return false;
        };
        block.x += dx;
        block.y += dy;
        if collides(block, board) {
            block.x -= dx;
            block.y -= dy;
            return false;
        }
        true
    }

    /// Rotates the falling block 90° clockwise in place unless the rotated
    /// shape collides.
    ///
    /// There is no wall kick: a colliding rotation is rejected and the shape
    /// is left exactly as it was. Returns `true` if the block rotated.
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        let Some(block) = &mut self.block else {
            return false;
        };
        let rotated = block.shape.rotated_clockwise();
        let previous = std::mem::replace(&mut block.shape, rotated);
        if collides(block, board) {
            block.shape = previous;
            return false;
        }
        true
    }

    /// Writes the falling block's cells into the board and releases the block.
    ///
    /// Cells still above the board are dropped.
    pub fn lock(&mut self, board: &mut Board) {
        let Some(block) = self.block.take() else {
            return;
        };
        for (x, y) in block.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            board.set(x, y, Some(block.color.clone()));
        }
    }

    /// Releases the falling block without writing it to the board.
    pub fn clear(&mut self) {
        self.block = None;
    }
}

fn collides(block: &FallingBlock, board: &Board) -> bool {
    block
        .occupied_positions()
        .any(|(x, y)| board.is_blocked(x, y))
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// `floor(cols / 2 - width / 2)`.
fn spawn_x(col_count: usize, width: usize) -> i32 {
    (to_i32(col_count) - to_i32(width)).div_euclid(2)
}
