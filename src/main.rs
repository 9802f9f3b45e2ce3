// Per-turn Othello player: reads a state file, picks a move, writes the move record.

use anyhow::{Context, Result};
use clap::Parser;
use othello_core::engine::clock::MonotonicClock;
use othello_core::engine::config::{EngineConfig, EvaluatorKind};
use othello_core::engine::player::Player;
use othello_core::Board;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board state file: 8 lines of `B`, `W` or `.`
    state_file: PathBuf,

    /// Color to play (`black` or `white`)
    color: String,

    /// Where the chosen move is written as `col,row`
    #[arg(long, default_value = "move.txt")]
    move_file: PathBuf,

    /// JSON engine configuration; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search depth below each root move
    #[arg(long)]
    depth: Option<u8>,

    /// Search deadline in milliseconds, counted from process start
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// `material` or `positional`
    #[arg(long)]
    evaluator: Option<String>,

    /// Disable move ordering
    #[arg(long)]
    no_ordering: bool,

    /// Search only the final depth instead of deepening from 1
    #[arg(long)]
    no_deepening: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    // The turn budget starts now, before any I/O.
    let clock = MonotonicClock::start();
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(&args, &clock) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    if let Some(ms) = args.time_limit_ms {
        config.time_limit_ms = Some(ms);
    }
    if let Some(kind) = &args.evaluator {
        config.evaluator = kind.parse::<EvaluatorKind>()?;
    }
    if args.no_ordering {
        config.move_ordering = false;
    }
    if args.no_deepening {
        config.iterative_deepening = false;
    }
    Ok(config)
}

fn run(args: &Args, clock: &MonotonicClock) -> Result<()> {
    let config = Arc::new(load_config(args)?);
    let player = Player::from_token(&args.color, config)?;

    let mut board = Board::from_file(&args.state_file)
        .with_context(|| format!("reading state file {}", args.state_file.display()))?;
    log::debug!("{} to play on\n{}", player.color(), board.decorated());

    let report = player.play(&mut board, clock);

    std::fs::write(&args.move_file, report.result.best_move.to_string())
        .with_context(|| format!("writing move file {}", args.move_file.display()))?;
    Ok(())
}
