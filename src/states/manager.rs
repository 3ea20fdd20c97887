use tracing::{info, warn};

use crate::error::GameResult;
use crate::input::{Action, KeySnapshot};
use crate::render::Renderer;
use crate::states::{Context, GameState, Transition};

/// Owns the active state, at most one suspended state beneath it, and the
/// shared [`Context`].
pub struct GameStateManager {
    current: Option<Box<dyn GameState>>,
    suspended: Option<Box<dyn GameState>>,
    ctx: Context,
}

impl GameStateManager {
    pub fn new(ctx: Context) -> Self {
        Self {
            current: None,
            suspended: None,
            ctx,
        }
    }

    /// Queue a transition; it takes effect at the start of the next update.
    pub fn change_state(&mut self, transition: Transition) {
        self.ctx.change_state(transition);
    }

    pub fn update(&mut self, dt: f64, input: &KeySnapshot) -> GameResult<()> {
        if let Some(transition) = self.ctx.take_pending() {
            self.apply(transition);
        }
        self.ctx.audio.update();
        match self.current.as_mut() {
            Some(state) => state.update(dt, input, &mut self.ctx),
            None => Ok(()),
        }
    }

    pub fn handle_event(&mut self, action: Action) -> GameResult<()> {
        match self.current.as_mut() {
            Some(state) => state.handle_event(action, &mut self.ctx),
            None => Ok(()),
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let Some(state) = self.current.as_ref() else {
            return;
        };
        if state.is_overlay() {
            if let Some(below) = self.suspended.as_ref() {
                below.draw(renderer);
            }
        }
        state.draw(renderer);
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.name())
    }

    pub fn suspended_name(&self) -> Option<&'static str> {
        self.suspended.as_ref().map(|s| s.name())
    }

    pub fn quit_requested(&self) -> bool {
        self.ctx.quit_requested()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Switch(mut next) => {
                if let Some(mut old) = self.current.take() {
                    old.exit(&mut self.ctx);
                }
                // A suspended state already ran `exit` when it was parked.
                if let Some(below) = self.suspended.take() {
                    info!("Dropping suspended {}", below.name());
                }
                info!("State -> {}", next.name());
                next.enter(&mut self.ctx);
                self.current = Some(next);
            }
            Transition::Suspend(mut overlay) => {
                if let Some(dropped) = self.suspended.take() {
                    warn!("Discarding suspended {} for a new suspend", dropped.name());
                }
                if let Some(mut old) = self.current.take() {
                    old.exit(&mut self.ctx);
                    self.suspended = Some(old);
                }
                info!("State -> {} (overlay)", overlay.name());
                overlay.enter(&mut self.ctx);
                self.current = Some(overlay);
            }
            Transition::Resume => {
                let Some(mut below) = self.suspended.take() else {
                    warn!("Resume requested with nothing suspended");
                    return;
                };
                if let Some(mut old) = self.current.take() {
                    old.exit(&mut self.ctx);
                }
                info!("State -> {} (resumed)", below.name());
                below.enter(&mut self.ctx);
                self.current = Some(below);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::config::GameConfig;
    use crate::render::testing::RecordingRenderer;
    use crate::render::{Align, Rgb};
    use crate::geometry::Vector2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        overlay: bool,
        journal: Journal,
        next: Option<Box<dyn FnMut() -> Transition>>,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                overlay: false,
                journal: journal.clone(),
                next: None,
            }
        }

        fn log(&self, what: &str) {
            self.journal.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl GameState for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn enter(&mut self, _ctx: &mut Context) {
            self.log("enter");
        }

        fn exit(&mut self, _ctx: &mut Context) {
            self.log("exit");
        }

        fn update(&mut self, _dt: f64, _input: &KeySnapshot, _ctx: &mut Context) -> GameResult<()> {
            self.log("update");
            Ok(())
        }

        fn draw(&self, renderer: &mut dyn Renderer) {
            renderer.draw_text(self.name, Vector2::ZERO, Align::Left, 10.0, Rgb::WHITE);
        }

        fn handle_event(&mut self, _action: Action, ctx: &mut Context) -> GameResult<()> {
            if let Some(make) = self.next.as_mut() {
                ctx.change_state(make());
            }
            Ok(())
        }

        fn is_overlay(&self) -> bool {
            self.overlay
        }
    }

    fn manager() -> GameStateManager {
        GameStateManager::new(Context::new(
            GameConfig::default(),
            Box::new(RecordingAudio::default()),
            Box::new(StdRng::seed_from_u64(1)),
        ))
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn transition_waits_for_next_update() {
        let log = journal();
        let mut mgr = manager();
        mgr.change_state(Transition::to(Probe::new("a", &log)));
        assert!(log.borrow().is_empty());
        assert_eq!(mgr.current_name(), None);

        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        assert_eq!(*log.borrow(), vec!["a:enter", "a:update"]);
        assert_eq!(mgr.current_name(), Some("a"));
    }

    #[test]
    fn switch_exits_old_once_before_entering_new() {
        let log = journal();
        let mut mgr = manager();
        let mut first = Probe::new("a", &log);
        let second_log = log.clone();
        first.next = Some(Box::new(move || Transition::to(Probe::new("b", &second_log))));
        mgr.change_state(Transition::to(first));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        mgr.handle_event(Action::Confirm).unwrap();
        assert_eq!(mgr.current_name(), Some("a"));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a:enter", "a:update", "a:exit", "b:enter", "b:update"]
        );
    }

    #[test]
    fn suspend_and_resume_keep_the_same_instance() {
        let log = journal();
        let mut mgr = manager();
        mgr.change_state(Transition::to(Probe::new("play", &log)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        let mut overlay = Probe::new("pause", &log);
        overlay.overlay = true;
        mgr.change_state(Transition::Suspend(Box::new(overlay)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        assert_eq!(mgr.current_name(), Some("pause"));
        assert_eq!(mgr.suspended_name(), Some("play"));

        let mut renderer = RecordingRenderer::default();
        mgr.draw(&mut renderer);
        assert_eq!(renderer.texts(), vec!["play", "pause"]);

        mgr.change_state(Transition::Resume);
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        assert_eq!(mgr.current_name(), Some("play"));
        assert_eq!(mgr.suspended_name(), None);

        let updates = log.borrow().iter().filter(|e| *e == "play:update").count();
        assert_eq!(updates, 2);
        assert!(!log.borrow().contains(&"pause:update".to_string()));
    }

    #[test]
    fn quitting_from_an_overlay_exits_the_suspended_state_once() {
        let log = journal();
        let mut mgr = manager();
        mgr.change_state(Transition::to(Probe::new("play", &log)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        let mut overlay = Probe::new("pause", &log);
        overlay.overlay = true;
        let menu_log = log.clone();
        overlay.next = Some(Box::new(move || Transition::to(Probe::new("menu", &menu_log))));
        mgr.change_state(Transition::Suspend(Box::new(overlay)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        mgr.handle_event(Action::Confirm).unwrap();
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        assert_eq!(mgr.current_name(), Some("menu"));
        assert_eq!(mgr.suspended_name(), None);

        let exits = log.borrow().iter().filter(|e| *e == "play:exit").count();
        assert_eq!(exits, 1);
        assert!(log.borrow().contains(&"pause:exit".to_string()));
    }

    #[test]
    fn queued_switch_outranks_a_later_suspend() {
        let log = journal();
        let mut mgr = manager();
        mgr.change_state(Transition::to(Probe::new("play", &log)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        mgr.change_state(Transition::to(Probe::new("over", &log)));
        let mut overlay = Probe::new("pause", &log);
        overlay.overlay = true;
        mgr.change_state(Transition::Suspend(Box::new(overlay)));
        mgr.change_state(Transition::Resume);
        mgr.update(0.016, &KeySnapshot::default()).unwrap();

        assert_eq!(mgr.current_name(), Some("over"));
        assert_eq!(mgr.suspended_name(), None);
        assert!(!log.borrow().iter().any(|e| e.starts_with("pause:")));
    }

    #[test]
    fn resume_without_suspended_state_is_ignored() {
        let log = journal();
        let mut mgr = manager();
        mgr.change_state(Transition::to(Probe::new("a", &log)));
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        mgr.change_state(Transition::Resume);
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        assert_eq!(mgr.current_name(), Some("a"));
    }

    #[test]
    fn empty_manager_is_inert() {
        let mut mgr = manager();
        mgr.update(0.016, &KeySnapshot::default()).unwrap();
        mgr.handle_event(Action::Confirm).unwrap();
        let mut renderer = RecordingRenderer::default();
        mgr.draw(&mut renderer);
        assert!(renderer.calls.is_empty());
        assert!(!mgr.quit_requested());
    }
}
