use std::{path::PathBuf, time::Duration};

use blockfall_engine::{GameEngine, GameEvent};

use crate::{command::EngineArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) engine: EngineArg,
    /// Amount of game time to simulate, in milliseconds
    #[clap(long)]
    duration_ms: u64,
    /// Length of a simulated frame, in milliseconds
    #[clap(long, default_value_t = 16)]
    frame_ms: u64,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        engine,
        duration_ms,
        frame_ms,
        output,
    } = arg;
    anyhow::ensure!(*frame_ms > 0, "--frame-ms must be positive");

    let mut engine = engine.build_engine()?;
    eprintln!(
        "Simulating {duration_ms} ms of game time (seed {})...",
        engine.seed()
    );
    engine.start();
    let summary = simulate(
        &mut engine,
        Duration::from_millis(*duration_ms),
        Duration::from_millis(*frame_ms),
    );
    eprintln!(
        "Simulated {} ms: {} blocks spawned, {} line clears{}",
        summary.elapsed.as_millis(),
        summary.spawned,
        summary.line_clears,
        if engine.is_game_over() {
            ", game over"
        } else {
            ""
        }
    );
    eprintln!(
        "Score {}, {} rows cleared",
        engine.score(),
        engine.stats().total_cleared_rows()
    );

    Output::save_json(&engine.snapshot(), output.clone())?;
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    elapsed: Duration,
    spawned: usize,
    line_clears: usize,
}

/// Feeds `duration` of game time into `engine` in steps of at most `frame`,
/// stopping early once the game is over.
fn simulate(engine: &mut GameEngine, duration: Duration, frame: Duration) -> Summary {
    let mut summary = Summary::default();
    while summary.elapsed < duration && !engine.is_game_over() {
        let step = frame.min(duration - summary.elapsed);
        engine.advance(step);
        summary.elapsed += step;
        for event in engine.take_events() {
            match event {
                GameEvent::Spawned { .. } => summary.spawned += 1,
                GameEvent::RowsCleared { .. } => summary.line_clears += 1,
                _ => {}
            }
        }
    }
    summary
}
