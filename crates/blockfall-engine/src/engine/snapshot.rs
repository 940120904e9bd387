use serde::{Deserialize, Serialize};

use crate::core::Cell;

use super::{
    block_controller::{Block, FallingBlock},
    block_generator::GameSeed,
    game_engine::Phase,
    game_stats::GameStats,
};

/// Owned copy of everything a renderer or a saved report needs to know about a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: GameSeed,
    pub phase: Phase,
    pub score: usize,
    pub stats: GameStats,
    pub drop_interval_ms: u64,
    /// Board rows top to bottom; `null` marks an empty cell.
    pub board: Vec<Vec<Cell>>,
    pub falling_block: Option<FallingBlock>,
    pub upcoming: Vec<Block>,
    pub fading_rows: Vec<usize>,
}
