use std::sync::Arc;

use chrono::Utc;
use snake_engine::snake::{GameObserver, SessionHandle, SnakeController, SnakeGameState, SnakeSession};
use snake_engine::{EngineError, SessionRng, log};

use crate::config::SpectatorConfig;
use crate::live_games::{LiveGameBoard, LiveGameId, LiveGameSummary, generate_username};

/// Mirrors one game's snapshots into the shared live listing.
pub struct LiveGameObserver {
    id: LiveGameId,
    board: LiveGameBoard,
}

impl LiveGameObserver {
    pub fn new(id: LiveGameId, board: LiveGameBoard) -> Self {
        Self { id, board }
    }
}

impl GameObserver for LiveGameObserver {
    fn on_state(&mut self, _tick: u64, state: &Arc<SnakeGameState>) {
        self.board.update_score(&self.id, state.score);
    }

    fn on_game_over(&mut self, final_score: u32) {
        if let Some(summary) = self.board.remove(&self.id) {
            log!(
                "[{}] {} finished a {} game with {} points",
                self.id,
                summary.username,
                summary.mode,
                final_score
            );
        }
    }
}

fn seed_for(config: &SpectatorConfig, slot: usize, round: u32) -> SessionRng {
    match config.seed {
        Some(base) => SessionRng::new(
            base.wrapping_add((slot as u64) << 32)
                .wrapping_add(u64::from(round)),
        ),
        None => SessionRng::from_random(),
    }
}

/// Plays the configured number of rounds for one slot, one autoplay game
/// after another. Returns the final score of every finished game.
pub async fn run_slot(
    slot: usize,
    config: SpectatorConfig,
    board: LiveGameBoard,
) -> Result<Vec<u32>, EngineError> {
    let mut scores = vec![];
    let mut round = 0u32;

    while config.rounds == 0 || round < config.rounds {
        let mut rng = seed_for(&config, slot, round);
        let id = LiveGameId::new(format!("game_{:02}_{:03}", slot, round));
        let mode = config.mode_for_slot(slot);

        board.insert(LiveGameSummary {
            id: id.clone(),
            username: generate_username(&mut rng),
            score: 0,
            mode,
            started_at: Utc::now(),
        });

        let session = SnakeSession::new(
            id.to_string(),
            mode,
            config.session.clone(),
            SnakeController::Autoplay,
            rng,
            LiveGameObserver::new(id.clone(), board.clone()),
        );
        let session = match session {
            Ok(session) => session,
            Err(e) => {
                board.remove(&id);
                return Err(e);
            }
        };

        let (handle, command_rx) = SessionHandle::channel();
        handle.start();
        drop(handle);

        let result = session.run(command_rx).await;
        board.remove(&id);
        if let Some(score) = result? {
            scores.push(score);
        }
        round += 1;
    }

    Ok(scores)
}

pub fn log_live_games(board: &LiveGameBoard) {
    let games = board.list();
    if games.is_empty() {
        log!("No live games");
        return;
    }

    log!("{} live game(s):", games.len());
    for game in games {
        log!(
            "  {:<10} {:<16} {:>6} {:<12} since {}",
            game.id.as_str(),
            game.username,
            game.score,
            game.mode.as_str(),
            game.started_at.format("%H:%M:%S")
        );
    }
}
