use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::error;

use crate::error::GameResult;
use crate::input::InputTracker;
use crate::render::Renderer;
use crate::states::GameStateManager;
use crate::ui::BrailleCanvas;

pub struct App {
    pub should_quit: bool,
    pub canvas: BrailleCanvas,
    manager: GameStateManager,
    input: InputTracker,
    last_tick: Instant,
}

impl App {
    pub fn new(manager: GameStateManager, releases_reported: bool) -> Self {
        let bounds = manager.context().bounds();
        Self {
            should_quit: false,
            canvas: BrailleCanvas::new(bounds),
            manager,
            input: InputTracker::new(releases_reported),
            last_tick: Instant::now(),
        }
    }

    pub fn manager(&self) -> &GameStateManager {
        &self.manager
    }

    /// Advance the active state by the wall-clock time since the last tick.
    pub fn on_tick(&mut self) -> GameResult<()> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        let snapshot = self.input.snapshot(now);
        let result = self.manager.update(dt, &snapshot);
        self.sync_quit();
        match result {
            Err(e) if !e.is_fatal() => {
                error!("Update failed: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> GameResult<()> {
        // Ctrl+C always quits
        if key.kind == KeyEventKind::Press
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return Ok(());
        }

        for action in self.input.on_key(key, Instant::now()) {
            if let Err(e) = self.manager.handle_event(action) {
                error!("Event {:?} failed: {}", action, e);
                if e.is_fatal() {
                    return Err(e);
                }
            }
        }
        self.sync_quit();
        Ok(())
    }

    pub fn draw(&mut self) {
        self.manager.draw(&mut self.canvas);
        self.canvas.present();
    }

    fn sync_quit(&mut self) {
        if self.manager.quit_requested() {
            self.should_quit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::config::GameConfig;
    use crate::states::{Context, MenuState, Transition};
    use crossterm::event::KeyEventState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app() -> App {
        let ctx = Context::new(
            GameConfig::default(),
            Box::new(RecordingAudio::default()),
            Box::new(StdRng::seed_from_u64(8)),
        );
        let mut manager = GameStateManager::new(ctx);
        manager.change_state(Transition::to(MenuState::new()));
        App::new(manager, false)
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn first_tick_enters_menu() {
        let mut app = app();
        assert_eq!(app.manager().current_name(), None);
        app.on_tick().unwrap();
        assert_eq!(app.manager().current_name(), Some("Menu"));
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn escape_in_menu_quits() {
        let mut app = app();
        app.on_tick().unwrap();
        app.on_key(press(KeyCode::Esc, KeyModifiers::NONE)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn enter_starts_a_game_on_next_tick() {
        let mut app = app();
        app.on_tick().unwrap();
        app.on_key(press(KeyCode::Enter, KeyModifiers::NONE)).unwrap();
        assert_eq!(app.manager().current_name(), Some("Menu"));
        app.on_tick().unwrap();
        assert_eq!(app.manager().current_name(), Some("Playing"));

        app.canvas.resize(64, 20);
        app.draw();
        assert_eq!(app.canvas.lines().len(), 20);
    }
}
