//! ReplayLab TUI — replay a strategy dataset point by point in the terminal.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use replaylab_core::SystemClock;
use replaylab_runner::{InputSource, ReplayConfig};
use replaylab_tui::worker::{self, WorkerCommand};
use replaylab_tui::{input, logging, persistence, ui, App};

/// Longest the loop waits for input while nothing is due.
const MAX_POLL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "replaylab-tui", about = "Terminal dashboard for strategy replay")]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use seeded synthetic data instead of the configured CSVs
    #[arg(long)]
    synthetic: bool,

    /// Seed for synthetic data
    #[arg(long, default_value = replaylab_runner::DEFAULT_SEED)]
    seed: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = logging::app_dir(dirs::data_dir());
    logging::init_file_logging(&data_dir.join("replaylab-tui.log"))?;
    let state_path = logging::app_dir(dirs::config_dir()).join("state.json");

    let config = match &args.config {
        Some(path) => ReplayConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReplayConfig::default(),
    };
    let source = if args.synthetic {
        InputSource::Synthetic { seed: args.seed }
    } else {
        InputSource::Csv
    };

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(cmd_rx, resp_tx).context("failed to spawn worker thread")?;

    let mut app = App::new(config, source, SystemClock, cmd_tx.clone(), resp_rx);
    if args.config.is_none() {
        persistence::apply(&mut app, persistence::load(&state_path));
    }
    app.request_build();
    info!(source = ?app.source, "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let _ = persistence::save(&state_path, &persistence::extract(&app));

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("tui stopped");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // 1. Drain worker responses (non-blocking)
        app.poll_worker();

        // 2. Run due ticks
        app.pump();

        // 3. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 4. Wait for input, at most until the next tick is due
        if event::poll(app.poll_timeout(MAX_POLL))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
