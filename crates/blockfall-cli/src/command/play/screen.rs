use std::time::Duration;

use blockfall_engine::{GameEngine, GameEvent, Key, Phase};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay};

/// How long a soft-drop stays engaged after the last Down press on
/// terminals that never report key releases.
///
/// Longer than the usual delay before a held key starts repeating, so the
/// gap between the first press and the first repeat does not release it.
const SOFT_DROP_RELEASE_WINDOW: Duration = Duration::from_millis(500);

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑"], "Rotate"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["Space"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

#[derive(Debug)]
pub struct PlayScreen {
    engine: GameEngine,
    soft_drop: SoftDropRelease,
    message: Option<String>,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            soft_drop: SoftDropRelease::new(false),
            message: None,
            is_exiting: false,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn set_reports_key_release(&mut self, reports_key_release: bool) {
        self.soft_drop = SoftDropRelease::new(reports_key_release);
    }

    pub fn start(&mut self) {
        self.engine.start();
        self.drain_events();
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let bindings = match self.engine.phase() {
            Phase::Ready | Phase::Running | Phase::Clearing => PLAYING_KEYS,
            Phase::Paused => PAUSED_KEYS,
            Phase::GameOver => GAME_OVER_KEYS,
        };
        let message = Text::from(self.message.as_deref().unwrap_or_default())
            .style(Style::default().fg(Color::Yellow))
            .centered();

        let [main_area, message_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(GameDisplay::new(&self.engine), main_area);
        frame.render_widget(message, message_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.key_down(event.code),
            KeyEventKind::Release => self.key_up(event.code),
        }
        self.drain_events();
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed);
        if self.soft_drop.advance(elapsed) {
            self.engine.handle_key_up(Key::Down);
        }
        self.drain_events();
    }

    fn key_down(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Char('r') => {
                self.soft_drop.release();
                self.engine.restart();
            }
            _ => {
                if let Some(key) = game_key(code) {
                    if key.is_down() {
                        self.soft_drop.press();
                    }
                    self.engine.handle_key_down(key);
                }
            }
        }
    }

    fn key_up(&mut self, code: KeyCode) {
        if let Some(key) = game_key(code) {
            if key.is_down() {
                self.soft_drop.release();
            }
            self.engine.handle_key_up(key);
        }
    }

    fn drain_events(&mut self) {
        for event in self.engine.take_events() {
            match event {
                GameEvent::Started => self.message = None,
                GameEvent::RowsCleared { rows, points } => {
                    let noun = if rows == 1 { "row" } else { "rows" };
                    self.message = Some(format!("{rows} {noun} cleared, +{points}"));
                }
                GameEvent::GameOver { score } => {
                    self.message = Some(format!("Final score {score}. Press R to play again"));
                }
                _ => {}
            }
        }
    }
}

fn game_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Pause,
        _ => return None,
    };
    Some(key)
}

/// Synthesizes the soft-drop release on terminals that only report presses.
///
/// Holding a key there produces a stream of repeated presses, so the drop is
/// released once no press arrived for [`SOFT_DROP_RELEASE_WINDOW`]. When the
/// terminal reports releases this never fires.
#[derive(Debug)]
struct SoftDropRelease {
    window: Option<Duration>,
    since_press: Option<Duration>,
}

impl SoftDropRelease {
    fn new(reports_key_release: bool) -> Self {
        Self {
            window: (!reports_key_release).then_some(SOFT_DROP_RELEASE_WINDOW),
            since_press: None,
        }
    }

    fn press(&mut self) {
        if self.window.is_some() {
            self.since_press = Some(Duration::ZERO);
        }
    }

    fn release(&mut self) {
        self.since_press = None;
    }

    /// Returns `true` when the synthetic release is due.
    fn advance(&mut self, elapsed: Duration) -> bool {
        let (Some(window), Some(since_press)) = (self.window, &mut self.since_press) else {
            return false;
        };
        *since_press += elapsed;
        if *since_press < window {
            return false;
        }
        self.since_press = None;
        true
    }
}
