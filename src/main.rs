use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use ostsee_engine::engines::engine_alpha_beta::AlphaBetaEngine;
use ostsee_engine::engines::engine_random::RandomEngine;
use ostsee_engine::engines::engine_trait::Engine;
use ostsee_engine::protocol::connection::{Connection, DEFAULT_HOST, DEFAULT_PORT};
use ostsee_engine::protocol::game_client::{play_game, GameEnd};
use ostsee_engine::search::iterative_deepening::{
    SearchConfig, DEFAULT_MAX_DEPTH, DEFAULT_TIME_BUDGET, MAX_DEPTH_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    AlphaBeta,
    Random,
}

/// Ostseeschach client: joins a game server room and plays one game.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Reservation code of a prepared game
    #[arg(short, long)]
    reservation: Option<String>,

    /// Move selection strategy
    #[arg(long, value_enum, default_value_t = EngineKind::AlphaBeta)]
    engine: EngineKind,

    /// Search budget per move, measured from the move request
    #[arg(long, default_value_t = DEFAULT_TIME_BUDGET.as_millis() as u64)]
    time_budget_ms: u64,

    /// Deepest iterative-deepening iteration
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_DEPTH_LIMIT))
    )]
    max_depth: u8,

    /// Log search details (debug level) unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(&args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut engine = build_engine(args);

    let mut connection = Connection::connect(&args.host, args.port, args.reservation.as_deref())
        .with_context(|| format!("joining a game on {}:{}", args.host, args.port))?;

    let end = play_game(&mut connection, engine.as_mut()).context("playing the game")?;
    match end {
        GameEnd::Result { winner } => info!("game over, winner {winner:?}"),
        GameEnd::Error { message } => info!("game aborted by the server: {message}"),
    }

    connection.close().context("closing the connection")?;
    Ok(())
}

fn build_engine(args: &Args) -> Box<dyn Engine> {
    match args.engine {
        EngineKind::AlphaBeta => Box::new(AlphaBetaEngine::new(SearchConfig {
            max_depth: args.max_depth,
            time_budget: Duration::from_millis(args.time_budget_ms),
        })),
        EngineKind::Random => Box::new(RandomEngine::new()),
    }
}
