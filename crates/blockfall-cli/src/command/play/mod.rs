use ratatui_runtime::Runtime;

use crate::command::EngineArg;

use self::app::PlayApp;

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) engine: EngineArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let engine = arg.engine.build_engine()?;
    let seed = engine.seed();

    let mut app = PlayApp::new(engine);
    Runtime::new().run(&mut app)?;

    let engine = app.engine();
    eprintln!(
        "Final score: {} ({} rows cleared, {} blocks, seed {seed})",
        engine.score(),
        engine.stats().total_cleared_rows(),
        engine.stats().completed_blocks(),
    );
    Ok(())
}
