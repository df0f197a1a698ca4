mod config;
mod live_games;
mod runner;

use std::time::Duration;

use clap::Parser;
use snake_engine::snake::GameMode;
use snake_engine::{log, logger};
use tokio::task::JoinSet;

use config::{DEFAULT_CONFIG_FILE, get_config_manager};
use live_games::LiveGameBoard;
use runner::{log_live_games, run_slot};

#[derive(Parser)]
#[command(name = "snake_spectator", about = "Runs autoplay snake games for the live games view")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Number of concurrent games
    #[arg(long)]
    games: Option<usize>,

    /// Games per slot, 0 plays until interrupted
    #[arg(long)]
    rounds: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Force every game into one mode: walls or pass-through
    #[arg(long)]
    mode: Option<GameMode>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Spectator".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = get_config_manager(&args.config).get_config()?;
    if let Some(games) = args.games {
        config.live_games = games;
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(mode) = args.mode {
        config.modes = vec![mode];
    }
    snake_engine::config::Validate::validate(&config)?;

    log!(
        "Starting {} live game(s) on a {}x{} board",
        config.live_games,
        config.session.grid_size,
        config.session.grid_size
    );

    let board = LiveGameBoard::new();
    let mut slots = JoinSet::new();
    for slot in 0..config.live_games {
        slots.spawn(run_slot(slot, config.clone(), board.clone()));
    }

    let report_board = board.clone();
    let report_interval = Duration::from_millis(config.report_interval_ms);
    let reporter = tokio::spawn(async move {
        let mut timer = tokio::time::interval(report_interval);
        timer.tick().await;
        loop {
            timer.tick().await;
            log_live_games(&report_board);
        }
    });

    let mut total_games = 0usize;
    let mut best_score = 0u32;

    loop {
        tokio::select! {
            joined = slots.join_next() => {
                match joined {
                    Some(Ok(Ok(scores))) => {
                        total_games += scores.len();
                        best_score = best_score.max(scores.into_iter().max().unwrap_or(0));
                    }
                    Some(Ok(Err(e))) => log!("Live game stopped with an error: {}", e),
                    Some(Err(e)) => log!("Live game task failed: {}", e),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log!("Shutdown signal received, stopping live games...");
                slots.abort_all();
                break;
            }
        }
    }

    reporter.abort();
    if !board.is_empty() {
        log!("Interrupted games:");
        log_live_games(&board);
    }
    log!("Finished {} game(s), best score {}", total_games, best_score);

    Ok(())
}
