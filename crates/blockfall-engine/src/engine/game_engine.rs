use std::{collections::VecDeque, mem, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::Board};

use super::{
    block_controller::{Block, BlockController, FallingBlock},
    block_generator::{BlockGenerator, GameSeed},
    config::EngineConfig,
    event::GameEvent,
    game_stats::GameStats,
    key::Key,
    scheduler::{Due, Scheduler},
    snapshot::GameSnapshot,
};

/// Drop interval while soft-drop is not held.
pub const NORMAL_DROP_INTERVAL: Duration = Duration::from_millis(500);
/// Drop interval while soft-drop is held.
pub const FAST_DROP_INTERVAL: Duration = Duration::from_millis(60);
/// How long full rows stay visible before they are removed.
pub const LINE_CLEAR_DELAY: Duration = Duration::from_millis(300);
/// Number of pre-generated blocks kept in the upcoming queue.
pub const UPCOMING_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Built but not started yet.
    Ready,
    Running,
    Paused,
    /// Full rows are fading out; the next block spawns once they are gone.
    Clearing,
    GameOver,
}

/// The falling-block game: board, upcoming queue, score and the drop loop.
///
/// The engine never reads a clock. The host calls [`Self::advance`] with the
/// time that passed since the previous call, and the engine fires every drop
/// tick and line-clear completion that fell due in between, in order.
/// Player input goes through the discrete operations ([`Self::move_left`],
/// [`Self::rotate`], [`Self::handle_key_down`], ...), which never fail:
/// anything not allowed in the current phase is silently ignored.
///
/// Every state change is also recorded as a [`GameEvent`]. The buffer grows
/// until the host drains it with [`Self::take_events`], so a host should
/// drain it regularly even if it only reads state through the getters.
/// [`Self::restart`] empties it.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{EngineConfig, GameEngine, Key};
///
/// let mut engine = GameEngine::new(EngineConfig::default())?;
/// engine.start();
///
/// let y = engine.falling_block().unwrap().y;
/// engine.advance(Duration::from_millis(500));
/// assert_eq!(engine.falling_block().unwrap().y, y + 1);
///
/// engine.handle_key_down(Key::Down);
/// assert_eq!(engine.drop_interval(), Duration::from_millis(60));
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    controller: BlockController,
    generator: BlockGenerator,
    upcoming: VecDeque<Block>,
    fading_rows: Vec<usize>,
    stats: GameStats,
    phase: Phase,
    drop_interval: Duration,
    scheduler: Scheduler,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Creates an engine in the [`Phase::Ready`] phase with a random seed.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = BlockGenerator::new(config.colors);
        Ok(Self::with_generator(config.rows, config.cols, generator))
    }

    /// Like [`Self::new`], but with a specific seed for deterministic block generation.
    pub fn with_seed(config: EngineConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = BlockGenerator::with_seed(config.colors, seed);
        Ok(Self::with_generator(config.rows, config.cols, generator))
    }

    fn with_generator(rows: usize, cols: usize, generator: BlockGenerator) -> Self {
        Self {
            board: Board::new(rows, cols),
            controller: BlockController::new(),
            generator,
            upcoming: VecDeque::with_capacity(UPCOMING_LEN),
            fading_rows: Vec::new(),
            stats: GameStats::new(),
            phase: Phase::Ready,
            drop_interval: NORMAL_DROP_INTERVAL,
            scheduler: Scheduler::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_block(&self) -> Option<&FallingBlock> {
        self.controller.block()
    }

    /// Returns the queued blocks, next to spawn first.
    pub fn upcoming(&self) -> impl Iterator<Item = &Block> + '_ {
        self.upcoming.iter()
    }

    /// Returns the indices of the rows waiting to be removed while [`Phase::Clearing`].
    #[must_use]
    pub fn fading_rows(&self) -> &[usize] {
        &self.fading_rows
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn is_clearing(&self) -> bool {
        self.phase.is_clearing()
    }

    /// Returns the active drop interval: normal, or fast while soft-drop is held.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.generator.seed()
    }

    /// Removes and returns the events recorded since the previous call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed(),
            phase: self.phase,
            score: self.score(),
            stats: self.stats.clone(),
            drop_interval_ms: u64::try_from(self.drop_interval.as_millis()).unwrap_or(u64::MAX),
            board: self.board.to_rows(),
            falling_block: self.controller.block().cloned(),
            upcoming: self.upcoming.iter().cloned().collect(),
            fading_rows: self.fading_rows.clone(),
        }
    }

    /// Begins the game: fills the upcoming queue, spawns the first block and
    /// starts the drop timer at normal speed.
    ///
    /// Only acts in [`Phase::Ready`].
    pub fn start(&mut self) {
        if !self.phase.is_ready() {
            return;
        }
        self.phase = Phase::Running;
        self.events.push(GameEvent::Started);
        self.fill_upcoming();
        self.spawn_next();
        self.set_drop_interval(NORMAL_DROP_INTERVAL);
    }

    /// Throws the current game away and starts a new one, from any phase.
    ///
    /// The block generator keeps its random stream, so the new game does not
    /// replay the previous one; its color bag is discarded. A pending line
    /// clear is dropped rather than completed, so the new game starts at
    /// score 0. Undrained events of the old game are discarded.
    pub fn restart(&mut self) {
        self.events.clear();
        self.scheduler.reset();
        self.controller.clear();
        self.board.clear();
        self.upcoming.clear();
        self.fading_rows.clear();
        self.stats = GameStats::new();
        self.phase = Phase::Ready;
        self.generator.discard_color_bag();
        self.start();
    }

    /// Feeds `elapsed` time into the drop timer and the pending line clear,
    /// running everything that falls due in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut budget = elapsed;
        while let Some(due) = self.scheduler.next_due(&mut budget) {
            match due {
                Due::Tick => self.tick(),
                Due::ClearComplete => self.complete_clear(),
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.phase.is_running() && self.controller.try_move(&self.board, -1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.phase.is_running() && self.controller.try_move(&self.board, 1, 0)
    }

    pub fn rotate(&mut self) -> bool {
        self.phase.is_running() && self.controller.try_rotate(&self.board)
    }

    /// Stops the drop timer. Only acts while [`Phase::Running`].
    pub fn pause(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        self.phase = Phase::Paused;
        self.scheduler.stop_drop_timer();
        self.events.push(GameEvent::Paused);
    }

    /// Restarts the drop timer from a full interval. Only acts while [`Phase::Paused`].
    pub fn resume(&mut self) {
        if !self.phase.is_paused() {
            return;
        }
        self.phase = Phase::Running;
        self.scheduler.restart_drop_timer(self.drop_interval);
        self.events.push(GameEvent::Resumed);
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Ready | Phase::Clearing | Phase::GameOver => {}
        }
    }

    /// Applies a key press.
    ///
    /// Holding [`Key::Down`] switches to the fast drop interval in every
    /// phase; a repeated press while already fast changes nothing.
    pub fn handle_key_down(&mut self, key: Key) {
        match key {
            Key::Pause => self.toggle_pause(),
            Key::Down => {
                if self.drop_interval != FAST_DROP_INTERVAL {
                    self.set_drop_interval(FAST_DROP_INTERVAL);
                }
            }
            Key::Left => {
                self.move_left();
            }
            Key::Right => {
                self.move_right();
            }
            Key::Up => {
                self.rotate();
            }
        }
    }

    /// Applies a key release. Releasing [`Key::Down`] restores the normal interval.
    pub fn handle_key_up(&mut self, key: Key) {
        if key.is_down() {
            self.set_drop_interval(NORMAL_DROP_INTERVAL);
        }
    }

    /// Parses `name` as a [`Key`] and applies the press; unknown names are ignored.
    pub fn handle_raw_key_down(&mut self, name: &str) {
        if let Ok(key) = name.parse() {
            self.handle_key_down(key);
        }
    }

    /// Parses `name` as a [`Key`] and applies the release; unknown names are ignored.
    pub fn handle_raw_key_up(&mut self, name: &str) {
        if let Ok(key) = name.parse() {
            self.handle_key_up(key);
        }
    }

    /// Switches the drop interval and restarts the timer, so the next tick
    /// is a full new interval away.
    fn set_drop_interval(&mut self, interval: Duration) {
        if self.drop_interval != interval {
            self.drop_interval = interval;
            self.events.push(GameEvent::DropSpeedChanged { interval });
        }
        self.scheduler.restart_drop_timer(interval);
    }

    /// One drop step: move the falling block down, or lock it, or end the game.
    fn tick(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        let Some(y) = self.controller.block().map(|block| block.y) else {
            return;
        };
        if self.controller.try_move(&self.board, 0, 1) {
            return;
        }
        if y < 0 {
            self.game_over();
            return;
        }
        self.lock_and_check_rows();
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.scheduler.stop_drop_timer();
        self.controller.clear();
        self.events.push(GameEvent::GameOver {
            score: self.score(),
        });
    }

    fn lock_and_check_rows(&mut self) {
        if let Some(block) = self.controller.block() {
            self.events.push(GameEvent::Locked {
                block: block.clone(),
            });
        }
        self.controller.lock(&mut self.board);

        let full_rows = self.board.full_rows();
        if full_rows.is_empty() {
            self.stats.complete_block_drop(0);
            self.spawn_next();
            return;
        }

        self.phase = Phase::Clearing;
        self.fading_rows.clone_from(&full_rows);
        self.events.push(GameEvent::RowsFading { rows: full_rows });
        self.scheduler.schedule_clear(LINE_CLEAR_DELAY);
    }

    fn complete_clear(&mut self) {
        if !self.phase.is_clearing() {
            return;
        }
        let rows = mem::take(&mut self.fading_rows);
        let removed = self.board.remove_rows(&rows);
        let points = self.stats.complete_block_drop(removed);
        self.events.push(GameEvent::RowsCleared {
            rows: removed,
            points,
        });
        self.phase = Phase::Running;
        self.spawn_next();
    }

    fn fill_upcoming(&mut self) {
        while self.upcoming.len() < UPCOMING_LEN {
            self.upcoming.push_back(self.generator.generate());
        }
    }

    /// Moves the queue head into play and queues a fresh block behind the rest.
    fn spawn_next(&mut self) {
        self.fill_upcoming();
        let next = self
            .upcoming
            .pop_front()
            .expect("upcoming queue should never be empty");
        self.upcoming.push_back(self.generator.generate());
        self.controller.spawn(&next, &self.board);
        if let Some(block) = self.controller.block() {
            self.events.push(GameEvent::Spawned {
                block: block.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BlockColor, Shape, ShapeKind};

    const SEED: GameSeed = GameSeed::from_bytes([7; 16]);

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(rows: usize, cols: usize) -> GameEngine {
        let config = EngineConfig {
            rows,
            cols,
            ..EngineConfig::default()
        };
        GameEngine::with_seed(config, SEED).unwrap()
    }

    fn started(rows: usize, cols: usize) -> GameEngine {
        let mut engine = engine(rows, cols);
        engine.start();
        engine.take_events();
        engine
    }

    fn place(engine: &mut GameEngine, shape: Shape, x: i32, y: i32) {
        let block = engine.controller.block_mut().unwrap();
        block.shape = shape;
        block.x = x;
        block.y = y;
    }

    fn column(height: usize) -> Shape {
        Shape::from_rows(&vec![[1_u8]; height]).unwrap()
    }

    fn falling_y(engine: &GameEngine) -> i32 {
        engine.falling_block().unwrap().y
    }

    fn filled_cells(engine: &GameEngine) -> usize {
        engine.board().rows().flatten().filter(|cell| cell.is_some()).count()
    }

    fn upcoming(engine: &GameEngine) -> Vec<Block> {
        engine.upcoming().cloned().collect()
    }

    /// Locks a horizontal I bar on the bottom row of a 4-column board,
    /// leaving the engine in the clearing phase.
    fn clear_bottom_row(engine: &mut GameEngine) {
        let bottom = i32::try_from(engine.board().row_count()).unwrap() - 1;
        place(engine, ShapeKind::I.shape(), 0, bottom);
        engine.tick();
        assert!(engine.is_clearing());
    }

    #[test]
    fn test_new_engine_is_ready_and_idle() {
        let mut engine = engine(20, 10);
        assert!(engine.phase().is_ready());
        assert!(engine.falling_block().is_none());
        assert_eq!(engine.upcoming().count(), 0);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.drop_interval(), NORMAL_DROP_INTERVAL);

        engine.advance(ms(10_000));
        assert!(!engine.move_left() && !engine.rotate());
        assert!(engine.phase().is_ready());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            colors: Vec::new(),
            ..EngineConfig::default()
        };
        assert_eq!(GameEngine::new(config).unwrap_err(), ConfigError::NoColors);
    }

    #[test]
    fn test_start_spawns_and_fills_queue() {
        let mut engine = engine(20, 10);
        engine.start();

        assert!(engine.phase().is_running());
        assert_eq!(engine.upcoming().count(), UPCOMING_LEN);
        let block = engine.falling_block().unwrap();
        assert_eq!(block.y, -i32::try_from(block.shape.height()).unwrap());

        let events = engine.take_events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_started());
        assert!(events[1].is_spawned());

        // a second start changes nothing
        let before = engine.snapshot();
        engine.start();
        assert_eq!(engine.snapshot(), before);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_tick_moves_block_down_each_interval() {
        let mut engine = started(20, 10);
        let y = falling_y(&engine);

        engine.advance(ms(499));
        assert_eq!(falling_y(&engine), y);
        engine.advance(ms(1));
        assert_eq!(falling_y(&engine), y + 1);
        engine.advance(ms(1_000));
        assert_eq!(falling_y(&engine), y + 3);
    }

    #[test]
    fn test_block_locks_on_floor_and_next_spawns() {
        let mut engine = started(20, 10);
        let height = i32::try_from(engine.falling_block().unwrap().shape.height()).unwrap();
        let queued = upcoming(&engine);

        // twenty successful moves bring the block onto the floor
        engine.advance(NORMAL_DROP_INTERVAL * 20);
        assert_eq!(falling_y(&engine), 20 - height);
        assert_eq!(filled_cells(&engine), 0);

        engine.advance(NORMAL_DROP_INTERVAL);
        assert_eq!(filled_cells(&engine), 4);
        assert_eq!(engine.stats().completed_blocks(), 1);
        assert_eq!(engine.stats().row_clear_counter()[0], 1);
        assert!(engine.phase().is_running());

        // the queue head became the falling block and the rest moved up
        let block = engine.falling_block().unwrap();
        assert_eq!(block.shape, queued[0].shape);
        assert_eq!(block.color, queued[0].color);
        let now = upcoming(&engine);
        assert_eq!(now.len(), UPCOMING_LEN);
        assert_eq!(now[..2], queued[1..]);

        let events = engine.take_events();
        assert!(events.iter().any(GameEvent::is_locked));
        assert!(events.last().unwrap().is_spawned());
    }

    #[test]
    fn test_line_clear_waits_then_scores() {
        let mut engine = started(6, 4);
        clear_bottom_row(&mut engine);

        assert_eq!(engine.fading_rows(), [5]);
        assert_eq!(engine.score(), 0);
        assert!(engine.falling_block().is_none());
        assert!(engine.board().row(5).unwrap().iter().all(Option::is_some));

        engine.advance(LINE_CLEAR_DELAY - ms(1));
        assert!(engine.is_clearing());

        engine.advance(ms(1));
        assert!(engine.phase().is_running());
        assert_eq!(engine.score(), 10);
        assert!(engine.fading_rows().is_empty());
        assert_eq!(filled_cells(&engine), 0);
        assert_eq!(engine.board().row_count(), 6);
        assert!(engine.falling_block().is_some());

        let events = engine.take_events();
        assert!(events.contains(&GameEvent::RowsFading { rows: vec![5] }));
        assert!(events.contains(&GameEvent::RowsCleared { rows: 1, points: 10 }));
    }

    #[test]
    fn test_score_by_rows_cleared_at_once() {
        for (rows, points) in [(1, 10), (2, 30), (3, 50), (4, 80)] {
            let mut engine = started(6, 1);
            place(&mut engine, column(rows), 0, 6 - i32::try_from(rows).unwrap());
            engine.tick();
            assert_eq!(engine.fading_rows().len(), rows);

            engine.advance(LINE_CLEAR_DELAY);
            assert_eq!(engine.score(), points, "{rows} rows");
            assert_eq!(engine.stats().total_cleared_rows(), rows);
            assert_eq!(engine.board().row_count(), 6);
        }
    }

    #[test]
    fn test_clearing_suppresses_input_and_ticks() {
        let mut engine = started(6, 4);
        clear_bottom_row(&mut engine);
        let board = engine.board().clone();

        engine.handle_key_down(Key::Left);
        engine.handle_key_down(Key::Up);
        engine.toggle_pause();
        engine.tick();
        assert!(engine.is_clearing());
        assert_eq!(engine.board(), &board);
        assert!(engine.falling_block().is_none());
    }

    #[test]
    fn test_clear_completion_runs_before_simultaneous_tick() {
        let mut engine = started(6, 4);
        place(&mut engine, ShapeKind::I.shape(), 0, 5);
        // the lock happens on the first tick, so the clear is due at 800ms
        engine.advance(ms(500));
        assert!(engine.is_clearing());

        engine.advance(ms(240));
        engine.handle_key_down(Key::Down);
        // next fast tick is due at 800ms too
        engine.advance(ms(60));

        assert!(engine.phase().is_running());
        let block = engine.falling_block().unwrap();
        let height = i32::try_from(block.shape.height()).unwrap();
        assert_eq!(block.y, -height + 1);
    }

    #[test]
    fn test_game_over_when_spawned_block_cannot_enter() {
        let mut engine = engine(4, 4);
        for x in 0..4 {
            engine.board.set(x, 0, Some(BlockColor::from("red")));
        }
        engine.start();
        engine.take_events();

        engine.advance(NORMAL_DROP_INTERVAL);
        assert!(engine.is_game_over());
        assert!(engine.falling_block().is_none());
        assert!(engine.scheduler.drop_timer().is_none());
        assert_eq!(engine.take_events(), [GameEvent::GameOver { score: 0 }]);

        // nothing moves any more
        let board = engine.board().clone();
        engine.toggle_pause();
        engine.resume();
        engine.advance(ms(60_000));
        assert!(engine.is_game_over());
        assert_eq!(engine.board(), &board);
    }

    #[test]
    fn test_soft_drop_switches_interval_and_restarts_timer() {
        let mut engine = started(20, 10);
        let y = falling_y(&engine);

        // progress toward the next normal tick is thrown away
        engine.advance(ms(400));
        engine.handle_key_down(Key::Down);
        assert_eq!(engine.drop_interval(), FAST_DROP_INTERVAL);
        engine.advance(ms(59));
        assert_eq!(falling_y(&engine), y);
        engine.advance(ms(1));
        assert_eq!(falling_y(&engine), y + 1);

        // key repeat while fast does not restart the timer
        engine.advance(ms(30));
        engine.handle_key_down(Key::Down);
        engine.advance(ms(30));
        assert_eq!(falling_y(&engine), y + 2);

        engine.advance(ms(50));
        engine.handle_key_up(Key::Down);
        assert_eq!(engine.drop_interval(), NORMAL_DROP_INTERVAL);
        engine.advance(ms(499));
        assert_eq!(falling_y(&engine), y + 2);
        engine.advance(ms(1));
        assert_eq!(falling_y(&engine), y + 3);

        let speeds: Vec<_> = engine
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::DropSpeedChanged { interval } => Some(interval),
                _ => None,
            })
            .collect();
        assert_eq!(speeds, [FAST_DROP_INTERVAL, NORMAL_DROP_INTERVAL]);
    }

    #[test]
    fn test_pause_stops_ticks_and_input() {
        let mut engine = started(20, 10);
        let y = falling_y(&engine);
        let x = engine.falling_block().unwrap().x;

        engine.advance(ms(250));
        engine.handle_key_down(Key::Pause);
        assert!(engine.is_paused());

        engine.advance(ms(10_000));
        assert!(!engine.move_left());
        assert!(!engine.move_right());
        assert!(!engine.rotate());
        assert_eq!(falling_y(&engine), y);
        assert_eq!(engine.falling_block().unwrap().x, x);

        engine.handle_key_down(Key::Pause);
        assert!(engine.phase().is_running());
        engine.advance(ms(499));
        assert_eq!(falling_y(&engine), y);
        engine.advance(ms(1));
        assert_eq!(falling_y(&engine), y + 1);

        let events = engine.take_events();
        assert_eq!(events[..2], [GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_soft_drop_while_paused_does_not_move() {
        let mut engine = started(20, 10);
        let y = falling_y(&engine);
        engine.pause();
        engine.handle_key_down(Key::Down);
        engine.advance(ms(1_000));
        assert_eq!(falling_y(&engine), y);

        engine.resume();
        assert_eq!(engine.drop_interval(), FAST_DROP_INTERVAL);
        engine.advance(ms(60));
        assert_eq!(falling_y(&engine), y + 1);
    }

    #[test]
    fn test_moves_and_rotation() {
        let mut engine = started(20, 10);
        place(&mut engine, ShapeKind::T.shape(), 0, 5);

        assert!(!engine.move_left());
        assert!(engine.move_right());
        assert_eq!(engine.falling_block().unwrap().x, 1);
        engine.handle_key_down(Key::Left);
        assert_eq!(engine.falling_block().unwrap().x, 0);

        engine.handle_key_down(Key::Up);
        assert_eq!(
            engine.falling_block().unwrap().shape,
            ShapeKind::T.shape().rotated_clockwise()
        );
        engine.handle_key_up(Key::Left);
        assert_eq!(engine.falling_block().unwrap().x, 0);
    }

    #[test]
    fn test_raw_keys() {
        let mut engine = started(20, 10);
        place(&mut engine, ShapeKind::O.shape(), 4, 5);

        engine.handle_raw_key_down("ArrowLeft");
        assert_eq!(engine.falling_block().unwrap().x, 3);
        engine.handle_raw_key_down("right");
        assert_eq!(engine.falling_block().unwrap().x, 4);

        engine.handle_raw_key_down("Enter");
        engine.handle_raw_key_up("x");
        assert_eq!(engine.falling_block().unwrap().x, 4);

        engine.handle_raw_key_down("ArrowDown");
        assert_eq!(engine.drop_interval(), FAST_DROP_INTERVAL);
        engine.handle_raw_key_up("ArrowDown");
        assert_eq!(engine.drop_interval(), NORMAL_DROP_INTERVAL);

        engine.handle_raw_key_down(" ");
        assert!(engine.is_paused());
    }

    #[test]
    fn test_restart_from_clearing_discards_pending_clear() {
        let mut engine = started(6, 4);
        clear_bottom_row(&mut engine);
        engine.handle_key_down(Key::Down);
        engine.take_events();

        engine.restart();
        assert!(engine.phase().is_running());
        assert_eq!(engine.score(), 0);
        assert_eq!(filled_cells(&engine), 0);
        assert!(engine.fading_rows().is_empty());
        assert_eq!(engine.upcoming().count(), UPCOMING_LEN);
        assert!(engine.falling_block().is_some());
        assert_eq!(engine.drop_interval(), NORMAL_DROP_INTERVAL);

        engine.advance(LINE_CLEAR_DELAY);
        assert!(!engine.take_events().iter().any(GameEvent::is_rows_cleared));
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_restart_resets_score_and_game_over() {
        let mut engine = started(6, 4);
        clear_bottom_row(&mut engine);
        engine.advance(LINE_CLEAR_DELAY);
        assert_eq!(engine.score(), 10);

        engine.game_over();
        assert!(engine.is_game_over());

        engine.restart();
        assert!(engine.phase().is_running());
        assert_eq!(engine.stats(), &GameStats::new());
        assert_eq!(engine.board().row_count(), 6);
        assert!(engine.scheduler.drop_timer().is_some());

        engine.pause();
        engine.restart();
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_restart_discards_undrained_events() {
        let mut engine = engine(20, 10);
        engine.start();
        for _ in 0..3 {
            while !engine.is_game_over() {
                engine.advance(ms(1_000));
            }
            engine.restart();

            let events = engine.take_events();
            assert_eq!(events.len(), 2);
            assert!(events[0].is_started());
            assert!(events[1].is_spawned());
            // leave the next game's events in the buffer
            engine.advance(ms(5_000));
        }
    }

    #[test]
    fn test_engine_clears_rows_two_and_five() {
        let mut engine = started(8, 3);
        let marker = |y: usize| Some(BlockColor::new(format!("row{y}")));
        for y in [2, 5] {
            for x in 0..2 {
                engine.board.set(x, y, Some(BlockColor::from("red")));
            }
        }
        for y in [3, 4, 6, 7] {
            engine.board.set(0, y, marker(y));
        }
        // a vertical bar in the last column resting on a filled cell
        engine.board.set(2, 6, Some(BlockColor::from("blue")));
        place(&mut engine, column(4), 2, 2);
        engine.tick();

        assert!(engine.is_clearing());
        assert_eq!(engine.fading_rows(), [2, 5]);
        assert!(engine.board().row(2).unwrap().iter().all(Option::is_some));
        assert!(engine.board().row(5).unwrap().iter().all(Option::is_some));

        engine.advance(LINE_CLEAR_DELAY);

        assert!(engine.phase().is_running());
        assert!(engine.fading_rows().is_empty());
        assert_eq!(engine.score(), 30);
        assert_eq!(engine.board().row_count(), 8);
        assert!(engine.board().rows().all(|row| row.len() == 3));
        // two empty rows on top, then the surviving rows 0, 1, 3, 4, 6, 7 in order
        let first_column: Vec<_> = engine
            .board()
            .rows()
            .map(|row| row[0].clone())
            .collect();
        let expected = [None, None, None, None, marker(3), marker(4), marker(6), marker(7)];
        assert_eq!(first_column, expected);
        assert!(engine.board().full_rows().is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = engine(20, 10);
        let mut b = engine(20, 10);
        assert_eq!(a.seed(), SEED);
        for game in [&mut a, &mut b] {
            game.start();
            game.advance(ms(30_000));
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_unattended_game_ends_with_board_intact() {
        let mut engine = started(20, 10);
        for _ in 0..600 {
            engine.advance(ms(1_000));
            assert_eq!(engine.board().row_count(), 20);
            assert!(engine.board().rows().all(|row| row.len() == 10));
            assert_eq!(engine.upcoming().count(), UPCOMING_LEN);
        }
        assert!(engine.is_game_over());
        assert!(engine.stats().completed_blocks() > 0);
        assert_eq!(engine.stats().total_cleared_rows(), 0);
    }

    #[test]
    fn test_snapshot_json() {
        let mut engine = started(20, 10);
        engine.handle_key_down(Key::Down);
        let json = serde_json::to_value(engine.snapshot()).unwrap();

        assert_eq!(json["phase"], "running");
        assert_eq!(json["score"], 0);
        assert_eq!(json["drop_interval_ms"], 60);
        assert_eq!(json["seed"], SEED.to_string());
        assert_eq!(json["board"].as_array().unwrap().len(), 20);
        assert!(json["board"][0][0].is_null());
        assert_eq!(json["upcoming"].as_array().unwrap().len(), 3);
        assert!(json["falling_block"]["shape"].is_array());

        let back: GameSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, engine.snapshot());
    }
}
