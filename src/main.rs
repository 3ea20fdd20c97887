use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::Context as _;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use asteroids::app::App;
use asteroids::audio::{AudioPort, SilentAudio, SoundBoard};
use asteroids::config::GameConfig;
use asteroids::event::{Event, EventHandler};
use asteroids::states::{Context, GameStateManager, MenuState, Transition};
use asteroids::ui;

const LOG_FILE: &str = "asteroids.log";
const TICK_MS: u64 = 16;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);
    // The terminal belongs to the UI, so logs must never reach stdout.
    match File::create(LOG_FILE) {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(io::sink).init(),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = GameConfig::load_or_default();
    config.validate().context("invalid configuration")?;
    info!(
        "Starting {}x{} with {} lives",
        config.screen_width, config.screen_height, config.initial_lives
    );

    let audio: Box<dyn AudioPort> = if config.audio {
        Box::new(SoundBoard::open(&config))
    } else {
        info!("Audio disabled");
        Box::new(SilentAudio)
    };
    let ctx = Context::new(config, audio, Box::new(StdRng::from_entropy()));
    let mut manager = GameStateManager::new(ctx);
    manager.change_state(Transition::to(MenuState::new()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
            )
        )?;
    }
    info!("Key release reporting: {}", enhanced);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(manager, enhanced);
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Exiting on error: {:#}", e);
    }
    info!("Goodbye");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let event_handler = EventHandler::new(TICK_MS);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick()?,
            Event::Key(key) => app.on_key(key)?,
            Event::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
