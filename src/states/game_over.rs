use tracing::info;

use crate::error::GameResult;
use crate::geometry::{Bounds, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::render::{Align, Renderer, Rgb};
use crate::states::{
    draw_instructions, Context, GameState, MenuState, OptionList, PlayingState, Transition,
};

const OPTIONS: &[&str] = &["Restart", "Main Menu"];
const RESTART: usize = 0;
const FADE_MS: u64 = 2000;
const MUSIC_DELAY_SECS: f64 = 2.0;

pub struct GameOverState {
    final_score: u64,
    high_score: u64,
    new_record: bool,
    options: OptionList,
    bounds: Bounds,
    elapsed: f64,
    music_started: bool,
}

impl GameOverState {
    pub fn new(final_score: u64, high_score: u64, new_record: bool) -> Self {
        Self {
            final_score,
            high_score,
            new_record,
            options: OptionList::new(OPTIONS),
            bounds: Bounds::new(0.0, 0.0),
            elapsed: 0.0,
            music_started: false,
        }
    }

    pub fn final_score(&self) -> u64 {
        self.final_score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }
}

impl GameState for GameOverState {
    fn name(&self) -> &'static str {
        "GameOver"
    }

    fn enter(&mut self, ctx: &mut Context) {
        info!("Entered Game Over State (score {})", self.final_score);
        self.bounds = ctx.bounds();
        self.elapsed = 0.0;
        self.music_started = false;
        ctx.audio.fade_out(FADE_MS);
    }

    fn exit(&mut self, _ctx: &mut Context) {
        info!("Exited Game Over State");
    }

    fn update(&mut self, dt: f64, _input: &KeySnapshot, ctx: &mut Context) -> GameResult<()> {
        self.elapsed += dt;
        if !self.music_started && self.elapsed >= MUSIC_DELAY_SECS {
            self.music_started = true;
            let music = ctx.music_path("gameover");
            ctx.audio.play_music(&music, true);
        }
        Ok(())
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let b = self.bounds;
        renderer.clear(Rgb::BLACK);
        renderer.draw_text(
            "GAME OVER",
            Vector2::new(b.width / 2.0, b.height / 4.0),
            Align::Center,
            72.0,
            Rgb::RED,
        );
        renderer.draw_text(
            &format!("Final Score: {}", self.final_score),
            Vector2::new(b.width / 2.0, b.height / 4.0 + 80.0),
            Align::Center,
            36.0,
            Rgb::WHITE,
        );
        let (line, color) = if self.new_record {
            ("NEW HIGH SCORE!".to_string(), Rgb::YELLOW)
        } else {
            (format!("High Score: {}", self.high_score), Rgb::GRAY)
        };
        renderer.draw_text(
            &line,
            Vector2::new(b.width / 2.0, b.height / 4.0 + 130.0),
            Align::Center,
            36.0,
            color,
        );
        self.options.draw(renderer, b, b.height / 2.0 + 60.0);
        draw_instructions(
            renderer,
            b,
            &["Use UP/DOWN or W/S to navigate", "Press ENTER to select"],
        );
    }

    fn handle_event(&mut self, action: Action, ctx: &mut Context) -> GameResult<()> {
        if self.options.navigate(action, ctx) {
            return Ok(());
        }
        match action {
            Action::Confirm => {
                ctx.audio.play_sound("menu_select");
                if self.options.selected() == RESTART {
                    let playing = PlayingState::new(&ctx.config)?;
                    ctx.change_state(Transition::to(playing));
                } else {
                    ctx.change_state(Transition::to(MenuState::new()));
                }
            }
            Action::Back => ctx.change_state(Transition::to(MenuState::new())),
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
        Context::new(
            GameConfig::default(),
            Box::new(audio.clone()),
            Box::new(StdRng::seed_from_u64(6)),
        )
    }

    #[test]
    fn fades_out_then_starts_game_over_music() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut state = GameOverState::new(1200, 5000, false);
        state.enter(&mut ctx);
        assert_eq!(audio.calls(), vec!["fade_out:2000"]);

        state.update(1.5, &KeySnapshot::default(), &mut ctx).unwrap();
        assert_eq!(audio.calls().len(), 1);
        state.update(0.5, &KeySnapshot::default(), &mut ctx).unwrap();
        state.update(1.0, &KeySnapshot::default(), &mut ctx).unwrap();

        let music: Vec<_> = audio
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("music:"))
            .collect();
        assert_eq!(music.len(), 1);
        assert!(music[0].ends_with("gameover_music.mp3:true"));
    }

    #[test]
    fn restart_and_menu_options() {
        let audio = RecordingAudio::default();
        let mut ctx = context(&audio);
        let mut state = GameOverState::new(0, 0, false);
        state.handle_event(Action::Confirm, &mut ctx).unwrap();
        match ctx.take_pending() {
            Some(Transition::Switch(next)) => assert_eq!(next.name(), "Playing"),
            _ => panic!("expected restart"),
        }

        state.handle_event(Action::MenuDown, &mut ctx).unwrap();
        state.handle_event(Action::Confirm, &mut ctx).unwrap();
        match ctx.take_pending() {
            Some(Transition::Switch(next)) => assert_eq!(next.name(), "Menu"),
            _ => panic!("expected menu"),
        }

        state.handle_event(Action::Back, &mut ctx).unwrap();
        assert!(ctx.has_pending());
    }

    #[test]
    fn draw_reports_scores() {
        let mut renderer = RecordingRenderer::default();
        GameOverState::new(4321, 4321, true).draw(&mut renderer);
        let texts = renderer.texts();
        assert!(texts.contains(&"GAME OVER"));
        assert!(texts.contains(&"Final Score: 4321"));
        assert!(texts.contains(&"NEW HIGH SCORE!"));

        let mut renderer = RecordingRenderer::default();
        GameOverState::new(10, 4321, false).draw(&mut renderer);
        assert!(renderer.texts().contains(&"High Score: 4321"));
    }
}
