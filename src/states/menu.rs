use tracing::info;

use crate::error::GameResult;
use crate::geometry::{Bounds, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::render::{Align, Renderer, Rgb};
use crate::scores::ScoreManager;
use crate::states::{draw_instructions, Context, GameState, OptionList, PlayingState, Transition};

const OPTIONS: &[&str] = &["Start Game", "Quit"];
const START: usize = 0;

pub struct MenuState {
    options: OptionList,
    bounds: Bounds,
    high_score: u64,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            options: OptionList::new(OPTIONS),
            bounds: Bounds::new(0.0, 0.0),
            high_score: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.options.selected()
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for MenuState {
    fn name(&self) -> &'static str {
        "Menu"
    }

    fn enter(&mut self, ctx: &mut Context) {
        info!("Entered Menu State");
        self.bounds = ctx.bounds();
        self.high_score = ScoreManager::new(&ctx.config.high_score_path).high_score();
        let music = ctx.music_path("menu");
        ctx.audio.play_music(&music, true);
    }

    fn exit(&mut self, _ctx: &mut Context) {
        info!("Exited Menu State");
    }

    fn update(&mut self, _dt: f64, _input: &KeySnapshot, _ctx: &mut Context) -> GameResult<()> {
        Ok(())
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let b = self.bounds;
        renderer.clear(Rgb::BLACK);
        renderer.draw_text(
            "ASTEROIDS",
            Vector2::new(b.width / 2.0, b.height / 4.0),
            Align::Center,
            72.0,
            Rgb::WHITE,
        );
        if self.high_score > 0 {
            renderer.draw_text(
                &format!("High Score: {}", self.high_score),
                Vector2::new(b.width / 2.0, b.height / 4.0 + 70.0),
                Align::Center,
                24.0,
                Rgb::GRAY,
            );
        }
        self.options.draw(renderer, b, b.height / 2.0);
        draw_instructions(
            renderer,
            b,
            &[
                "Use UP/DOWN or W/S to navigate",
                "Press ENTER to select",
                "Press ESC to quit",
            ],
        );
    }

    fn handle_event(&mut self, action: Action, ctx: &mut Context) -> GameResult<()> {
        if self.options.navigate(action, ctx) {
            return Ok(());
        }
        match action {
            Action::Confirm => {
                ctx.audio.play_sound("menu_select");
                if self.options.selected() == START {
                    let playing = PlayingState::new(&ctx.config)?;
                    ctx.change_state(Transition::to(playing));
                } else {
                    ctx.request_quit();
                }
            }
            Action::Back => ctx.request_quit(),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::config::GameConfig;
    use crate::render::testing::RecordingRenderer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context(audio: &RecordingAudio) -> Context {
        let dir = std::env::temp_dir().join("asteroids-menu-test-missing");
        let config = GameConfig {
            high_score_path: dir.join("high_score.json"),
            ..GameConfig::default()
        };
        Context::new(config, Box::new(audio.clone()), Box::new(StdRng::seed_from_u64(3)))
    }

    #[test]
    fn enter_starts_menu_music() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut menu = MenuState::new();
        menu.enter(&mut ctx);
        assert!(audio.calls()[0].starts_with("music:"));
        assert!(audio.calls()[0].ends_with("menu_music.mp3:true"));
    }

    #[test]
    fn navigation_wraps_and_plays_sound() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut menu = MenuState::new();
        menu.handle_event(Action::MenuUp, &mut ctx).unwrap();
        assert_eq!(menu.selected(), 1);
        menu.handle_event(Action::MenuDown, &mut ctx).unwrap();
        assert_eq!(menu.selected(), 0);
        assert_eq!(audio.calls(), vec!["sound:menu_navigate", "sound:menu_navigate"]);
    }

    #[test]
    fn start_queues_playing_without_switching_immediately() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut menu = MenuState::new();
        menu.handle_event(Action::Confirm, &mut ctx).unwrap();
        assert!(ctx.has_pending());
        assert!(!ctx.quit_requested());
        assert!(audio.contains("sound:menu_select"));
    }

    #[test]
    fn quit_option_and_back_request_quit() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut menu = MenuState::new();
        menu.handle_event(Action::MenuDown, &mut ctx).unwrap();
        menu.handle_event(Action::Confirm, &mut ctx).unwrap();
        assert!(ctx.quit_requested());
        assert!(!ctx.has_pending());

        let mut ctx = context(&audio);
        MenuState::new().handle_event(Action::Back, &mut ctx).unwrap();
        assert!(ctx.quit_requested());
    }

    #[test]
    fn draws_title_and_options() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut menu = MenuState::new();
        menu.enter(&mut ctx);
        let mut renderer = RecordingRenderer::default();
        menu.draw(&mut renderer);
        assert_eq!(renderer.calls[0], "clear");
        let texts = renderer.texts();
        assert!(texts.contains(&"ASTEROIDS"));
        assert!(texts.contains(&"Start Game"));
        assert!(texts.contains(&"Quit"));
    }
}
