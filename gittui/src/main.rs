//! gittui - GitHub profile dashboard
//!
//! Terminal UI showing a GitHub user's contribution calendar, streaks,
//! languages, repositories and recent activity.

mod app;
mod fetch;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gittui_core::analytics::{PushGranularity, TimeWindow};
use gittui_core::{Config, GitHubClient, Theme};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::app::App;
use crate::fetch::{FetchMessage, Fetcher};

#[derive(Parser, Debug)]
#[command(name = "gittui")]
#[command(about = "Terminal dashboard for GitHub profiles")]
#[command(version)]
struct Args {
    /// GitHub username to show (defaults to the token's owner)
    username: Option<String>,

    /// Color theme (see --list-themes)
    #[arg(long)]
    theme: Option<String>,

    /// Hide private data when viewing your own profile
    #[arg(long)]
    public_only: bool,

    /// Push-rate granularity: hour, day, week or month
    #[arg(short = 'g', long)]
    granularity: Option<PushGranularity>,

    /// Peak-hour window: week, month or year
    #[arg(short = 'w', long)]
    window: Option<TimeWindow>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the built-in theme names and exit
    #[arg(long)]
    list_themes: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_themes {
        for name in Theme::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        gittui_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("gittui starting up");

    let client = GitHubClient::new(&config.github).context("failed to create GitHub client")?;

    // Command-line flags win over the config file
    let mut display = config.display.clone();
    display.theme = args.theme.unwrap_or_else(|| display.theme_name());
    display.public_only |= args.public_only;
    if let Some(granularity) = args.granularity {
        display.push_granularity = granularity;
    }
    if let Some(window) = args.window {
        display.time_window = window;
    }
    let username = args.username.or_else(|| config.github.username.clone());
    let refresh_interval =
        (display.refresh_secs > 0).then(|| Duration::from_secs(display.refresh_secs));

    // Network work runs on the runtime; the UI loop stays synchronous
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let (tx, rx) = mpsc::unbounded_channel();
    let fetcher = Fetcher::new(
        client,
        runtime.handle().clone(),
        tx,
        config.github.event_limit,
    );

    let mut app = App::new(username, &display);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &fetcher, rx, refresh_interval);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    // In-flight requests are abandoned
    runtime.shutdown_background();

    tracing::info!("gittui shutting down");

    result
}

/// Run the main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fetcher: &Fetcher,
    mut rx: UnboundedReceiver<FetchMessage>,
    refresh_interval: Option<Duration>,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        // Apply whatever the background fetches have delivered
        while let Ok(message) = rx.try_recv() {
            app.apply(message);
        }

        if let Some(interval) = refresh_interval {
            if !app.loading.is_loading() && last_refresh.elapsed() >= interval {
                tracing::debug!("Periodic refresh");
                app.request_refresh();
            }
        }

        if app.refresh_requested {
            let generation = app.begin_refresh();
            fetcher.spawn_refresh(generation, app.requested_username.clone(), app.public_only);
            last_refresh = Instant::now();
        }

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
