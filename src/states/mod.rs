//! Screen states and the manager that switches between them.
//!
//! | State      | Exits to                              |
//! |------------|---------------------------------------|
//! | Menu       | Playing (new), quit                   |
//! | Playing    | Paused (suspend), GameOver            |
//! | Paused     | Playing (same instance), Menu         |
//! | GameOver   | Playing (new), Menu                   |
//!
//! Transitions are requested through [`Context::change_state`] and applied by
//! [`GameStateManager`] at the start of its next `update`.

pub mod game_over;
pub mod manager;
pub mod menu;
pub mod paused;
pub mod playing;

use std::path::PathBuf;

use rand::RngCore;
use tracing::debug;

use crate::audio::AudioPort;
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::geometry::{Bounds, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::render::{Align, Renderer, Rgb};

pub use game_over::GameOverState;
pub use manager::GameStateManager;
pub use menu::MenuState;
pub use paused::PausedState;
pub use playing::PlayingState;

pub trait GameState {
    fn name(&self) -> &'static str;
    fn enter(&mut self, ctx: &mut Context);
    fn exit(&mut self, ctx: &mut Context);
    fn update(&mut self, dt: f64, input: &KeySnapshot, ctx: &mut Context) -> GameResult<()>;
    fn draw(&self, renderer: &mut dyn Renderer);
    fn handle_event(&mut self, action: Action, ctx: &mut Context) -> GameResult<()>;

    /// Overlays are drawn on top of the suspended state instead of clearing.
    fn is_overlay(&self) -> bool {
        false
    }
}

pub enum Transition {
    /// Replace the current state; any suspended state is dropped without a
    /// second `exit`.
    Switch(Box<dyn GameState>),
    /// Park the current state (after its `exit`) and run `overlay` above it.
    Suspend(Box<dyn GameState>),
    /// Drop the current state and continue the suspended one.
    Resume,
}

impl Transition {
    pub fn to(state: impl GameState + 'static) -> Self {
        Transition::Switch(Box::new(state))
    }
}

/// Shared services handed to every state call.
pub struct Context {
    pub config: GameConfig,
    pub audio: Box<dyn AudioPort>,
    pub rng: Box<dyn RngCore>,
    pending: Option<Transition>,
    quit: bool,
}

impl Context {
    pub fn new(config: GameConfig, audio: Box<dyn AudioPort>, rng: Box<dyn RngCore>) -> Self {
        Self {
            config,
            audio,
            rng,
            pending: None,
            quit: false,
        }
    }

    /// Queue a transition for the next tick. A later request in the same
    /// tick replaces an earlier one, except that a queued `Switch` is never
    /// displaced by a `Suspend` or `Resume`.
    pub fn change_state(&mut self, transition: Transition) {
        if matches!(self.pending, Some(Transition::Switch(_)))
            && !matches!(transition, Transition::Switch(_))
        {
            debug!("Switch already queued, ignoring suspend/resume request");
            return;
        }
        self.pending = Some(transition);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn take_pending(&mut self) -> Option<Transition> {
        self.pending.take()
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.config.screen_width, self.config.screen_height)
    }

    pub fn music_path(&self, name: &str) -> PathBuf {
        self.config.sounds_dir.join(format!("{}_music.mp3", name))
    }
}

/// A vertical list of menu choices with wrap-around selection.
#[derive(Debug, Clone)]
pub(crate) struct OptionList {
    options: &'static [&'static str],
    selected: usize,
}

impl OptionList {
    pub(crate) fn new(options: &'static [&'static str]) -> Self {
        Self {
            options,
            selected: 0,
        }
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    /// Move the cursor for up/down; returns true if the action was navigation.
    pub(crate) fn navigate(&mut self, action: Action, ctx: &mut Context) -> bool {
        let n = self.options.len();
        match action {
            Action::MenuUp => self.selected = (self.selected + n - 1) % n,
            Action::MenuDown => self.selected = (self.selected + 1) % n,
            _ => return false,
        }
        ctx.audio.play_sound("menu_navigate");
        true
    }

    pub(crate) fn draw(&self, renderer: &mut dyn Renderer, bounds: Bounds, top: f64) {
        for (i, option) in self.options.iter().enumerate() {
            let color = if i == self.selected { Rgb::YELLOW } else { Rgb::WHITE };
            let position = Vector2::new(bounds.width / 2.0, top + i as f64 * 60.0);
            renderer.draw_text(option, position, Align::Center, 48.0, color);
        }
    }
}

pub(crate) fn draw_instructions(renderer: &mut dyn Renderer, bounds: Bounds, lines: &[&str]) {
    for (i, line) in lines.iter().enumerate() {
        let position = Vector2::new(bounds.width / 2.0, bounds.height - 100.0 + i as f64 * 25.0);
        renderer.draw_text(line, position, Align::Center, 24.0, Rgb::GRAY);
    }
}
