use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use synced_connect_four::config::{AppConfig, ConfigSource};
use synced_connect_four::ui::App;

/// Play replicated Connect Four with two local clients sharing one space.
#[derive(Parser)]
#[command(name = "synced_connect_four", about = "Lock-step replicated Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the game instance identifier
    #[arg(long)]
    instance: Option<String>,

    /// Start with echoes held back
    #[arg(long)]
    hold_echoes: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let (mut config, source) = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(instance) = cli.instance {
        config.sync.instance = instance;
    }
    if cli.hold_echoes {
        config.ui.hold_echoes = true;
    }
    config.validate()?;

    init_logging(&config)?;
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "loaded config"),
        ConfigSource::Defaults => {
            warn!(path = %cli.config.display(), "config file not found, using defaults")
        }
    }
    info!(key = %config.sync.store_key(), "starting");

    run(&config).context("terminal UI failed")
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    let log_file = File::create(&config.logging.file)
        .with_context(|| format!("creating log file {}", config.logging.file.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(config: &AppConfig) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
