use tracing::info;

use crate::error::GameResult;
use crate::geometry::{Bounds, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::render::{Align, Renderer, Rgb};
use crate::states::{draw_instructions, Context, GameState, MenuState, OptionList, Transition};

const OPTIONS: &[&str] = &["Resume", "Quit to Menu"];
const RESUME: usize = 0;

/// Overlay shown above a suspended game. The game itself stays with the
/// manager and is drawn underneath.
pub struct PausedState {
    options: OptionList,
    bounds: Bounds,
}

impl PausedState {
    pub fn new() -> Self {
        Self {
            options: OptionList::new(OPTIONS),
            bounds: Bounds::new(0.0, 0.0),
        }
    }

    fn resume(&self, ctx: &mut Context) {
        ctx.audio.play_sound("unpause");
        ctx.audio.unpause_music();
        ctx.change_state(Transition::Resume);
    }
}

impl Default for PausedState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for PausedState {
    fn name(&self) -> &'static str {
        "Paused"
    }

    fn enter(&mut self, ctx: &mut Context) {
        info!("Entered Paused State");
        self.bounds = ctx.bounds();
        ctx.audio.pause_music();
        ctx.audio.play_sound("pause");
    }

    fn exit(&mut self, _ctx: &mut Context) {
        info!("Exited Paused State");
    }

    fn update(&mut self, _dt: f64, _input: &KeySnapshot, _ctx: &mut Context) -> GameResult<()> {
        Ok(())
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let b = self.bounds;
        renderer.draw_text(
            "PAUSED",
            Vector2::new(b.width / 2.0, b.height / 3.0),
            Align::Center,
            72.0,
            Rgb::WHITE,
        );
        self.options.draw(renderer, b, b.height / 2.0);
        draw_instructions(renderer, b, &["Press ESC or P to resume"]);
    }

    fn handle_event(&mut self, action: Action, ctx: &mut Context) -> GameResult<()> {
        if self.options.navigate(action, ctx) {
            return Ok(());
        }
        match action {
            Action::Confirm => {
                ctx.audio.play_sound("menu_select");
                if self.options.selected() == RESUME {
                    self.resume(ctx);
                } else {
                    ctx.change_state(Transition::to(MenuState::new()));
                }
            }
            Action::Pause | Action::Back => self.resume(ctx),
            _ => {}
        }
        Ok(())
    }

    fn is_overlay(&self) -> bool {
        true
    }
}
