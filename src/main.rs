use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};

use mouse_trajectory::board::{BoardState, Point, StrokeTracker};
use mouse_trajectory::capture::Recorder;
use mouse_trajectory::config::Config;
use mouse_trajectory::draw::{
    Anchor, Canvas, DisplaySignals, HeadlessDisplay, Renderer, StrokeStyle, load_overlay,
};
use mouse_trajectory::input::{PointerInput, ScriptCommand, ScriptError, script};
use mouse_trajectory::playback::{PlaybackSource, Player};
use mouse_trajectory::storage::{self, expand_tilde, generate_filename, take_path};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MOUSE_TRAJECTORY_GIT_HASH"),
    ")"
);

/// How long the record loop waits for script input before checking signals.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Parser, Debug)]
#[command(name = "mouse-trajectory")]
#[command(version = VERSION, about = "Record and replay pointer trajectories")]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a pointer script read from stdin into a sample table
    Record(RecordArgs),
    /// Replay a sample table onto the headless canvas
    Play(PlayArgs),
    /// Print a summary of a sample table
    Inspect {
        /// Table to inspect
        file: PathBuf,
    },
    /// Write a default configuration file
    InitConfig,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Output table (default: named from the configured template)
    #[arg(conflicts_with = "takes")]
    file: Option<PathBuf>,

    /// Sampling frequency in Hz (default: from config)
    #[arg(long, short = 'f', value_name = "HZ")]
    frequency: Option<f64>,

    /// Record this many takes, each ended by a `cut` line
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    takes: Option<u32>,

    /// File name prefix for takes
    #[arg(long, value_name = "PREFIX", default_value = "take", requires = "takes")]
    prefix: String,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Table to replay (default: `recording.default_file` from config)
    file: Option<PathBuf>,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Save the canvas as an image when finished
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,

    /// Image drawn centered on the canvas before any strokes
    #[arg(long, value_name = "IMG")]
    overlay: Option<PathBuf>,

    /// Counter-clockwise rotation of the overlay in degrees
    #[arg(long, value_name = "DEG", default_value_t = 0.0, requires = "overlay")]
    rotation: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    match cli.command {
        Command::Record(args) => {
            let config = Config::load_from(&config_path)?;
            run_record(&config, args)
        }
        Command::Play(args) => {
            let config = Config::load_from(&config_path)?;
            run_play(&config, args)
        }
        Command::Inspect { file } => run_inspect(&file),
        Command::InitConfig => {
            Config::create_default_file(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
            Ok(())
        }
    }
}

/// Builds the headless display described by the config, with OS signals wired
/// to its quit and clear flags, and the overlay (if any) already drawn.
fn open_display(config: &Config, view: &ViewArgs) -> Result<HeadlessDisplay> {
    let canvas = Canvas::new(
        config.canvas.width,
        config.canvas.height,
        config.canvas.background_gray,
        StrokeStyle {
            thickness: config.canvas.stroke_thickness,
            gray: config.canvas.stroke_gray,
        },
    );

    let signals = DisplaySignals::new();
    signals
        .register_os_signals()
        .context("Failed to register signal handlers")?;

    let mut display = HeadlessDisplay::new(canvas, signals);
    if let Some(path) = &view.overlay {
        let image = load_overlay(path, view.rotation)
            .with_context(|| format!("Failed to load overlay {}", path.display()))?;
        let center = Point::new(
            config.canvas.width as i32 / 2,
            config.canvas.height as i32 / 2,
        );
        display
            .canvas_mut()
            .draw_image(&image, center, Anchor::Center)
            .context("Failed to draw overlay")?;
    }
    Ok(display)
}

fn save_snapshot(display: &HeadlessDisplay, view: &ViewArgs) -> Result<()> {
    if let Some(path) = &view.snapshot {
        display
            .canvas()
            .save(path)
            .with_context(|| format!("Failed to save snapshot {}", path.display()))?;
        println!("Saved snapshot to {}", path.display());
    }
    Ok(())
}

/// Why a take ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TakeEnd {
    Cut,
    EndOfInput,
    Quit,
}

/// Forwards parsed script lines from stdin. The channel closes at end of input.
fn spawn_script_reader() -> Result<mpsc::Receiver<Result<ScriptCommand, ScriptError>>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("script-reader".into())
        .spawn(move || {
            for command in script::commands(io::stdin().lock()) {
                if tx.send(command).is_err() {
                    break;
                }
            }
            debug!("Script reader reached end of input");
        })
        .context("Failed to spawn script reader")?;
    Ok(rx)
}

fn run_record(config: &Config, args: RecordArgs) -> Result<()> {
    let frequency = args.frequency.unwrap_or(config.recording.frequency_hz);
    let output_dir = expand_tilde(&config.recording.output_directory.to_string_lossy());

    let board = Arc::new(BoardState::new());
    let display = open_display(config, &args.view)?;
    let signals = display.signals().clone();
    let mut tracker = StrokeTracker::new(Arc::clone(&board), display);
    let mut input = PointerInput::new();
    let mut recorder = Recorder::new(board);
    let script = spawn_script_reader()?;

    let take_count = args.takes.unwrap_or(1) as usize;
    for index in 0..take_count {
        let path = match (&args.file, args.takes) {
            (_, Some(_)) => take_path(&output_dir, &args.prefix, index),
            (Some(file), None) => file.clone(),
            (None, None) => output_dir.join(generate_filename(&config.recording.filename_template)),
        };

        recorder
            .record_to(frequency, &path)
            .context("Failed to start recording")?;
        info!("Recording take {} of {} to {}", index + 1, take_count, path.display());

        let outcome = feed_script(&script, &mut tracker, &mut input, &signals);
        let sequence = recorder
            .stop()
            .with_context(|| format!("Failed to save {}", path.display()))?;
        let end = outcome?;

        if sequence.is_empty() {
            println!("No samples recorded; {} not written", path.display());
        } else {
            println!("Saved {} samples to {}", sequence.len(), path.display());
        }

        match end {
            TakeEnd::Cut => {}
            TakeEnd::EndOfInput => {
                if index + 1 < take_count {
                    warn!(
                        "Input ended after {} of {} takes",
                        index + 1,
                        take_count
                    );
                }
                break;
            }
            TakeEnd::Quit => {
                info!("Recording interrupted");
                break;
            }
        }
    }

    save_snapshot(tracker.renderer(), &args.view)
}

/// Applies script commands to the tracker until a cut, end of input, or a
/// quit signal.
fn feed_script<R: Renderer>(
    script: &mpsc::Receiver<Result<ScriptCommand, ScriptError>>,
    tracker: &mut StrokeTracker<R>,
    input: &mut PointerInput,
    signals: &DisplaySignals,
) -> Result<TakeEnd> {
    loop {
        if signals.quit_requested() {
            return Ok(TakeEnd::Quit);
        }
        match script.recv_timeout(POLL_INTERVAL) {
            Ok(command) => match command.context("Invalid script")? {
                ScriptCommand::Pointer(event) => {
                    if tracker.renderer_mut().present().should_quit() {
                        return Ok(TakeEnd::Quit);
                    }
                    input.handle(tracker, event);
                }
                ScriptCommand::Wait(duration) => {
                    if !wait_unless_quit(duration, signals) {
                        return Ok(TakeEnd::Quit);
                    }
                }
                ScriptCommand::Cut => return Ok(TakeEnd::Cut),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(TakeEnd::EndOfInput),
        }
    }
}

/// Sleeps for `duration`, waking early on a quit request. Returns false if
/// the wait was interrupted.
fn wait_unless_quit(duration: Duration, signals: &DisplaySignals) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if signals.quit_requested() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(POLL_INTERVAL));
    }
}

fn run_play(config: &Config, args: PlayArgs) -> Result<()> {
    let path = args
        .file
        .clone()
        .unwrap_or_else(|| config.recording.default_file.clone());

    let display = open_display(config, &args.view)?;
    let mut tracker = StrokeTracker::new(Arc::new(BoardState::new()), display);
    let mut player = Player::new();

    let report = player
        .play(&mut tracker, PlaybackSource::File(path.clone()))
        .with_context(|| format!("Failed to play {}", path.display()))?;

    if report.cancelled {
        println!(
            "Playback stopped after {} of {} samples",
            report.applied, report.total
        );
    } else {
        println!("Played {} samples from {}", report.total, path.display());
    }

    save_snapshot(tracker.renderer(), &args.view)
}

fn run_inspect(path: &Path) -> Result<()> {
    let sequence = storage::load_table(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    println!("file: {}", path.display());
    println!("rows: {}", sequence.len());
    println!(
        "duration: {:.3} s",
        sequence.duration_ns() as f64 / 1_000_000_000.0
    );
    println!("strokes: {}", sequence.strokes().len());
    Ok(())
}
