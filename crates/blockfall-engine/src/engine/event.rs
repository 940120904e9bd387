use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::block_controller::FallingBlock;

/// Something that happened inside the engine.
///
/// Events accumulate until the host drains them with
/// [`GameEngine::take_events`](crate::GameEngine::take_events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started,
    Spawned { block: FallingBlock },
    /// A block was written into the board.
    Locked { block: FallingBlock },
    /// Full rows were found and the clear delay began.
    RowsFading { rows: Vec<usize> },
    RowsCleared { rows: usize, points: usize },
    Paused,
    Resumed,
    DropSpeedChanged { interval: Duration },
    GameOver { score: usize },
}
