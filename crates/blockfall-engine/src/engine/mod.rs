//! Game rules and state management.
//!
//! This module builds the game on top of the core data structures:
//!
//! - [`BlockController`] - The single falling block and its collision test against the board
//! - [`GameEngine`] - Board, upcoming queue, score and the timed drop loop
//! - [`BlockGenerator`] - Random shapes and bag-dealt colors from a [`GameSeed`]
//! - [`Scheduler`] - Drop timer and line-clear delay, driven by fed time
//! - [`GameStats`] - Score and line clear counters
//!
//! # Game Flow
//!
//! 1. Build a [`GameEngine`] from an [`EngineConfig`] and call [`GameEngine::start`]
//! 2. Feed elapsed time with [`GameEngine::advance`]; each drop tick moves the block down
//! 3. Player input moves, rotates, pauses or speeds up the drop
//! 4. A block that cannot move down locks into the board; full rows fade, then clear
//! 5. The next block spawns from the upcoming queue
//! 6. Repeat until a block cannot enter the board
//!
//! The engine reports what happened through [`GameEvent`]s and exposes its
//! whole observable state as a [`GameSnapshot`].

pub use self::{
    block_controller::*, block_generator::*, color_bag::*, config::*, event::*, game_engine::*,
    game_stats::*, key::*, scheduler::*, snapshot::*,
};

mod block_controller;
mod block_generator;
mod color_bag;
mod config;
mod event;
mod game_engine;
mod game_stats;
mod key;
mod scheduler;
mod snapshot;
