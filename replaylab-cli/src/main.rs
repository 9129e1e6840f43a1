//! ReplayLab CLI — backtest, headless replay and dataset export.
//!
//! Commands:
//! - `backtest` — build a dataset and print full-run metrics and the latest recommendation
//! - `replay` — play a dataset through the controller and print each emitted frame
//! - `export` — write a built dataset to JSON for later replay

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use replaylab_core::{
    Clock, FrameSink, ManualClock, PlaybackController, PlaybackFrame, PlaybackStatus, SystemClock,
};
use replaylab_runner::{
    load_and_build, read_dataset_file, write_dataset_file, BuiltDataset, InputSource,
    PlaybackSettings, ReplayConfig, DEFAULT_SEED,
};

#[derive(Parser)]
#[command(name = "replaylab", about = "ReplayLab CLI — strategy backtest and replay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a dataset and print full-run summary metrics.
    Backtest {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: ParamOverrides,
    },
    /// Replay a dataset headless, printing emitted frames.
    Replay {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: ParamOverrides,

        /// Replay a previously exported dataset file instead of building one.
        #[arg(long, conflicts_with_all = ["synthetic", "short", "long", "fear", "greed"])]
        dataset: Option<PathBuf>,

        /// Drive a manual clock so the whole replay runs instantly.
        #[arg(long, default_value_t = false)]
        fast: bool,

        /// Print every Nth frame (the final frame is always printed).
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,
    },
    /// Build a dataset and write it as JSON.
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: ParamOverrides,

        /// Output file.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use seeded synthetic data instead of the configured CSVs.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for synthetic data.
    #[arg(long, default_value = DEFAULT_SEED)]
    seed: String,
}

#[derive(Args, Debug, Clone, Default)]
struct ParamOverrides {
    /// Short SMA window.
    #[arg(long)]
    short: Option<usize>,

    /// Long SMA window.
    #[arg(long)]
    long: Option<usize>,

    /// Extreme Fear threshold.
    #[arg(long)]
    fear: Option<u32>,

    /// Extreme Greed threshold.
    #[arg(long)]
    greed: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Backtest { input, overrides } => run_backtest_cmd(&input, &overrides),
        Commands::Replay {
            input,
            overrides,
            dataset,
            fast,
            every,
        } => run_replay_cmd(&input, &overrides, dataset.as_deref(), fast, every),
        Commands::Export {
            input,
            overrides,
            out,
        } => run_export_cmd(&input, &overrides, &out),
    }
}

/// Log to stderr so stdout stays clean for reports. JSON when
/// `REPLAYLAB_LOG_JSON=1`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("REPLAYLAB_LOG_JSON").is_ok_and(|v| v == "1");
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    // A second init (e.g. from tests) is harmless.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Load the config file (or defaults) and apply command-line overrides.
fn resolve_config(input: &InputArgs, overrides: &ParamOverrides) -> Result<(ReplayConfig, InputSource)> {
    let mut config = match &input.config {
        Some(path) => ReplayConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReplayConfig::default(),
    };
    if let Some(v) = overrides.short {
        config.strategy.short_window = v;
    }
    if let Some(v) = overrides.long {
        config.strategy.long_window = v;
    }
    if let Some(v) = overrides.fear {
        config.strategy.extreme_fear = v;
    }
    if let Some(v) = overrides.greed {
        config.strategy.extreme_greed = v;
    }
    config.validate().context("invalid parameters")?;

    let source = if input.synthetic {
        InputSource::Synthetic {
            seed: input.seed.clone(),
        }
    } else {
        InputSource::Csv
    };
    Ok((config, source))
}

fn build(input: &InputArgs, overrides: &ParamOverrides) -> Result<(ReplayConfig, BuiltDataset)> {
    let (config, source) = resolve_config(input, overrides)?;
    let built = load_and_build(&config, &source).context("failed to build dataset")?;
    info!(points = built.dataset.len(), hash = %built.data_hash, "dataset built");
    Ok((config, built))
}

fn run_backtest_cmd(input: &InputArgs, overrides: &ParamOverrides) -> Result<()> {
    let (config, built) = build(input, overrides)?;
    let mut out = io::stdout().lock();
    write_summary(&mut out, &config, &built)?;
    Ok(())
}

fn write_summary(out: &mut impl Write, config: &ReplayConfig, built: &BuiltDataset) -> io::Result<()> {
    let ds = &built.dataset;
    let s = &built.summary;
    let p = &built.params;
    writeln!(out)?;
    writeln!(out, "=== Backtest Result ===")?;
    if let (Some(first), Some(last)) = (ds.price.dates.first(), ds.price.dates.last()) {
        writeln!(out, "Period:         {first} to {last}")?;
    }
    writeln!(out, "Points:         {}", ds.len())?;
    writeln!(out, "Source:         {:?}", built.source)?;
    writeln!(
        out,
        "Params:         SMA {}/{}, fear {}, greed {}",
        p.short_window, p.long_window, p.extreme_fear, p.extreme_greed
    )?;
    writeln!(out, "Trades:         {}", s.trade_count)?;
    writeln!(out, "Days in market: {}", s.days_in_market)?;
    writeln!(out)?;
    writeln!(out, "--- Performance ---")?;
    for (label, value) in s.rows() {
        writeln!(out, "{label:<28} {value:>10.4}")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Recommendation: {}: {}",
        built.recommendation.signal.label(),
        built.recommendation.explanation
    )?;
    if config.playback.initial_points > ds.len() {
        writeln!(out, "NOTE: dataset is shorter than the initial replay window")?;
    }
    writeln!(out)?;
    Ok(())
}

fn run_replay_cmd(
    input: &InputArgs,
    overrides: &ParamOverrides,
    dataset: Option<&Path>,
    fast: bool,
    every: u64,
) -> Result<()> {
    let (config, built) = match dataset {
        Some(path) => {
            let (config, _) = resolve_config(input, overrides)?;
            let file = read_dataset_file(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?;
            (config, file.into_built())
        }
        None => build(input, overrides)?,
    };

    let printer = FramePrinter::new(io::stdout().lock(), built.dataset.len(), every);
    let printed = if fast {
        replay_fast(&built, &config.playback, printer)?
    } else {
        replay_realtime(&built, &config.playback, printer)?
    };
    info!(frames = printed, "replay complete");
    Ok(())
}

/// Replay to the end on a manual clock. Returns the number of lines printed.
fn replay_fast<W: Write>(
    built: &BuiltDataset,
    settings: &PlaybackSettings,
    printer: FramePrinter<W>,
) -> Result<usize> {
    let config = settings.to_playback_config();
    let tick = config.tick_period;
    let clock = ManualClock::new();
    let mut controller =
        PlaybackController::new(built.dataset.clone(), config, clock.clone(), printer)?;
    drive(&mut controller, |_| clock.advance(tick))
}

/// Replay to the end in wall-clock time.
fn replay_realtime<W: Write>(
    built: &BuiltDataset,
    settings: &PlaybackSettings,
    printer: FramePrinter<W>,
) -> Result<usize> {
    let mut controller = PlaybackController::new(
        built.dataset.clone(),
        settings.to_playback_config(),
        SystemClock,
        printer,
    )?;
    drive(&mut controller, |wait| std::thread::sleep(wait))
}

/// Start playback and pump until finished, calling `wait` with the time to
/// the next tick in between.
fn drive<C: Clock, W: Write>(
    controller: &mut PlaybackController<C, FramePrinter<W>>,
    mut wait: impl FnMut(Duration),
) -> Result<usize> {
    controller.start()?;
    while controller.status() == PlaybackStatus::Playing {
        wait(controller.until_next_tick().unwrap_or_default());
        controller.pump();
    }
    let printer = controller.sink_mut();
    printer.finish();
    if let Some(e) = printer.error.take() {
        return Err(e).context("failed to write frame");
    }
    Ok(printer.printed)
}

/// Writes one line per emitted frame, or every Nth frame.
struct FramePrinter<W: Write> {
    out: W,
    len: usize,
    every: u64,
    seen: u64,
    printed: usize,
    pending: Option<String>,
    error: Option<io::Error>,
}

impl<W: Write> FramePrinter<W> {
    fn new(out: W, len: usize, every: u64) -> Self {
        Self {
            out,
            len,
            every: every.max(1),
            seen: 0,
            printed: 0,
            pending: None,
            error: None,
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{line}") {
            Ok(()) => self.printed += 1,
            Err(e) => self.error = Some(e),
        }
    }

    /// Flush the last skipped frame so the final state is always shown.
    fn finish(&mut self) {
        if let Some(line) = self.pending.take() {
            self.write_line(&line);
        }
        let done = format!("{} frames, {} points, DONE", self.seen, self.len);
        self.write_line(&done);
    }
}

impl<W: Write> FrameSink for FramePrinter<W> {
    fn present(&mut self, frame: &PlaybackFrame) {
        let line = format_frame(frame, self.len);
        let due = self.seen % self.every == 0;
        self.seen += 1;
        if due {
            self.pending = None;
            self.write_line(&line);
        } else {
            self.pending = Some(line);
        }
    }
}

fn format_frame(frame: &PlaybackFrame, len: usize) -> String {
    let q = &frame.quote;
    let k = &frame.kpis;
    let change = match q.change_pct {
        Some(pct) => format!("{pct:+.2}%"),
        None => "-".to_string(),
    };
    format!(
        "{:>5}/{len} {} {:>10.2} {:>8} {:<6} {:<4} ret {:+.2}% bench {:+.2}% dd {:.2}% sharpe {:.2} win {:.1}%",
        frame.cursor + 1,
        q.date,
        q.price,
        change,
        frame.status.label(),
        frame.signal.kind.label(),
        k.strategy_return * 100.0,
        k.benchmark_return * 100.0,
        k.max_drawdown * 100.0,
        k.risk_adjusted_return,
        k.win_rate * 100.0,
    )
}

fn run_export_cmd(input: &InputArgs, overrides: &ParamOverrides, out: &Path) -> Result<()> {
    if out.is_dir() {
        bail!("--out must be a file path, got directory {}", out.display());
    }
    let (_, built) = build(input, overrides)?;
    write_dataset_file(&built, out)
        .with_context(|| format!("failed to export dataset to {}", out.display()))?;
    println!("Exported {} points to {}", built.dataset.len(), out.display());
    Ok(())
}
