use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use ratatui_image::picker::Picker;
use std::fs::File;
use std::io::stdout;
use std::path::Path;

use shieldfire::{App, Assets, GameConfig};

const DEFAULT_CONFIG_PATH: &str = "shieldfire.toml";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = load_config()?;
    // Fail fast on missing artwork, before the terminal is taken over
    let assets = Assets::load(&config).wrap_err("failed to load sprite assets")?;

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    log::info!("Keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let picker = Picker::from_query_stdio().unwrap_or_else(|err| {
        log::warn!("Terminal graphics query failed ({err:?}), falling back to a fixed font size");
        Picker::from_fontsize((8, 16))
    });

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(config, assets, picker, supports_keyboard_enhancement).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Logs go to debug.log since the terminal belongs to the game
fn init_logging() -> Result<()> {
    let log_file = File::create("debug.log").wrap_err("failed to create debug.log")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// First CLI argument, else shieldfire.toml when present, else built-in defaults
fn load_config() -> Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => GameConfig::load(&path).wrap_err_with(|| format!("failed to load {path}")),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            GameConfig::load(DEFAULT_CONFIG_PATH).wrap_err("failed to load default config")
        }
        None => {
            log::info!("No config file, using defaults");
            Ok(GameConfig::default())
        }
    }
}
