use std::time::Duration;

use blockfall_engine::GameEngine;
use crossterm::event::Event;
use ratatui::Frame;
use ratatui_runtime::{App, RenderMode, Runtime};

use super::screen::PlayScreen;

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            screen: PlayScreen::new(engine),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        self.screen.engine()
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FPS));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.screen.set_reports_key_release(runtime.reports_key_release());
        self.screen.start();
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.screen.update(elapsed);
    }
}
