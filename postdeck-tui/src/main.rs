use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use postdeck::api::ApiClient;
use postdeck::app::{App, Msg};
use postdeck::avatar::AvatarRegistry;
use postdeck::config::{CliOverrides, ConfigManager, Settings, UserPreferences};
use postdeck::terminal::{self, Tui};
use postdeck::{logging, ui};
use postdeck_types::ColorScheme;

/// postdeck - browse remote blog posts as cards in your terminal
#[derive(Parser)]
#[command(name = "postdeck")]
#[command(about = "A terminal card viewer for blog-style posts")]
#[command(version)]
struct Cli {
    /// JSON endpoint returning the post collection
    #[arg(long, short, env = "POSTDECK_ENDPOINT")]
    endpoint: Option<String>,

    /// Color scheme: default, dark, light or solarized
    #[arg(long, short, value_parser = parse_color_scheme)]
    theme: Option<ColorScheme>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Save the effective endpoint, theme and timeout as preferences
    #[arg(long)]
    save: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Where to write the log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            endpoint: self.endpoint.clone(),
            color_scheme: self.theme,
            timeout_secs: self.timeout,
        }
    }
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    ColorScheme::parse(s).ok_or_else(|| {
        format!("unknown theme '{}', expected one of: default, dark, light, solarized", s)
    })
}

// Load environment variables from .env file
// This allows POSTDECK_ENDPOINT to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

/// Load saved preferences; a missing or unreadable file falls back to defaults
fn load_preferences(manager: Option<&ConfigManager>) -> Option<UserPreferences> {
    let manager = manager?;
    match manager.load_preferences() {
        Ok(prefs) => prefs,
        Err(e) => {
            log::warn!("Ignoring preferences file: {:#}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads POSTDECK_ENDPOINT
    load_env();

    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        logging::LogConfig::verbose()
    } else {
        logging::LogConfig::default()
    };
    if let Some(path) = &cli.log_file {
        log_config.log_file = path.clone();
    }
    logging::init_logging(&log_config)?;

    let config_manager = match ConfigManager::new() {
        Ok(manager) => Some(manager),
        Err(e) => {
            log::warn!("Preferences unavailable: {:#}", e);
            None
        }
    };
    let prefs = load_preferences(config_manager.as_ref());
    let settings = Settings::resolve(cli.overrides(), prefs.as_ref());

    if cli.save {
        let manager = config_manager
            .as_ref()
            .context("Cannot save preferences without a home directory")?;
        manager.save_preferences(&settings.to_preferences())?;
        log::info!("Saved preferences");
    }

    log::info!(
        "Using endpoint {} ({}), theme={}, timeout={:?}",
        settings.endpoint,
        if settings.has_custom_endpoint() { "custom" } else { "default" },
        settings.color_scheme.as_str(),
        settings.request_timeout
    );

    let client = ApiClient::with_timeout(settings.endpoint.clone(), settings.request_timeout)
        .context("Failed to build HTTP client")?;

    let mut app = App::new(Arc::new(client), AvatarRegistry::new());
    app.color_scheme = settings.color_scheme;
    app.log_config = log_config;

    terminal::install_panic_hook();
    let mut tui = terminal::init()?;

    let result = run(&mut tui, &mut app);

    // Restore terminal
    terminal::restore()?;

    log::info!(
        "Exiting with {} live avatar handle(s)",
        app.avatars().live_handles()
    );

    result
}

/// Main event loop
fn run(tui: &mut Tui, app: &mut App) -> Result<()> {
    app.dispatch(Msg::Mount);

    while app.running {
        // Apply fetch results that arrived since the last frame
        app.drain_completions();

        tui.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                _ => {}
            }
        }
    }

    Ok(())
}
