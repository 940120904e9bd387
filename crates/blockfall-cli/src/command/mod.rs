use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{BlockColor, EngineConfig, GameEngine, GameSeed};
use clap::{Parser, Subcommand};

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a game without input and print the final state as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

/// Engine settings shared by every mode.
///
/// Flags override the configuration file, which overrides the defaults.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EngineArg {
    /// JSON file with `rows`, `cols` and `colors` fields; missing fields keep their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of board rows
    #[clap(long)]
    rows: Option<usize>,
    /// Number of board columns
    #[clap(long)]
    cols: Option<usize>,
    /// Block colors, comma separated (color names or #rrggbb)
    #[clap(long, value_delimiter = ',')]
    colors: Option<Vec<String>>,
    /// Seed for block generation, as 32 hex digits
    #[clap(long)]
    seed: Option<GameSeed>,
}

impl EngineArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_engine_config_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(colors) = &self.colors {
            config.colors = colors.iter().map(BlockColor::new).collect();
        }
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    pub(crate) fn build_engine(&self) -> anyhow::Result<GameEngine> {
        let config = self.load_config()?;
        let engine = match self.seed {
            Some(seed) => GameEngine::with_seed(config, seed)?,
            None => GameEngine::new(config)?,
        };
        Ok(engine)
    }
}
