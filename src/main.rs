use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use wifiwatch::settings::{Overrides, Settings};
use wifiwatch::{controller, events, ui, App, CommandSampler, Controller, History, Recorder};

#[derive(Parser, Debug)]
#[command(name = "wifiwatch", version)]
#[command(about = "Live Wi-Fi signal and noise chart with SQLite logging")]
struct Args {
    /// Initial sampling interval in seconds (1-10)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=10))]
    interval: Option<u64>,

    /// SQLite file samples are appended to
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Shell command printing the signal line followed by the noise line
    #[arg(long)]
    command: Option<String>,

    /// File to write diagnostics to (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Number of samples kept in memory for the chart
    #[arg(long)]
    history: Option<usize>,

    /// Settings file (TOML, YAML, JSON, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        interval: args.interval,
        database: args.database,
        command: args.command,
        log_file: args.log_file,
        history: args.history,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    init_logging(&settings.log_file)?;
    tracing::info!("wifiwatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(?settings, "settings loaded");

    // The sampling loop runs on this runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;

    let sampler = controller::shared(CommandSampler::new(settings.command.clone()));
    let controller = Controller::new(sampler, rt.handle().clone(), settings.interval()?);
    let app = App::new(
        controller,
        History::with_capacity(settings.history),
        Recorder::new(&settings.database),
        ui::Theme::auto_detect(),
    );

    let result = run_tui(app);
    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Send `tracing` output to a file, filtered by `RUST_LOG` (default: info).
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        // Aggregate and record whatever the sampling loop delivered
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short poll keeps the UI responsive between samples
        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
