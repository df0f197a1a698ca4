use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Sleep, sleep};

use crate::config::Validate;
use crate::session_rng::SessionRng;
use crate::{EngineError, log};
use super::bot_controller::BotController;
use super::game_state::SnakeGameState;
use super::input::InputQueue;
use super::settings::SnakeSessionSettings;
use super::types::{Direction, GameMode};

/// Receives every published snapshot of one game instance and, once per
/// game, its final score.
pub trait GameObserver: Send + 'static {
    fn on_state(&mut self, tick: u64, state: &Arc<SnakeGameState>);

    fn on_game_over(&mut self, final_score: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeController {
    Human,
    Autoplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
    Terminated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Turn(Direction),
    TurnToken(String),
    Pause,
    Resume,
    Reset(GameMode),
    Stop,
}

/// Sending side of a running [`SnakeSession::run`]. Every method returns
/// `false` once the session has finished.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionCommand>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self { command_tx }, command_rx)
    }

    pub fn send(&self, command: SessionCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(SessionCommand::Start)
    }

    pub fn enqueue_direction(&self, direction: Direction) -> bool {
        self.send(SessionCommand::Turn(direction))
    }

    pub fn enqueue_token(&self, token: impl Into<String>) -> bool {
        self.send(SessionCommand::TurnToken(token.into()))
    }

    pub fn pause(&self) -> bool {
        self.send(SessionCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(SessionCommand::Resume)
    }

    pub fn reset(&self, mode: GameMode) -> bool {
        self.send(SessionCommand::Reset(mode))
    }

    pub fn stop(&self) -> bool {
        self.send(SessionCommand::Stop)
    }
}

/// One game instance: its snapshot, input queue, random source and lifecycle.
///
/// The synchronous methods never sleep; each returns the delay after which the
/// next [`tick`](Self::tick) is due, or `None` when no tick should be
/// scheduled. [`run`](Self::run) turns those delays into a single tokio timer.
pub struct SnakeSession<O: GameObserver> {
    session_id: String,
    settings: SnakeSessionSettings,
    controller: SnakeController,
    state: Arc<SnakeGameState>,
    phase: SessionPhase,
    input: InputQueue,
    rng: SessionRng,
    observer: O,
    tick: u64,
}

impl<O: GameObserver> SnakeSession<O> {
    pub fn new(
        session_id: impl Into<String>,
        mode: GameMode,
        settings: SnakeSessionSettings,
        controller: SnakeController,
        mut rng: SessionRng,
        observer: O,
    ) -> Result<Self, EngineError> {
        settings.validate().map_err(EngineError::InvalidSettings)?;
        let state = SnakeGameState::create_with_grid_size(mode, settings.grid_size, &mut rng)?;

        let mut session = Self {
            session_id: session_id.into(),
            settings,
            controller,
            state: Arc::new(state),
            phase: SessionPhase::Idle,
            input: InputQueue::new(),
            rng,
            observer,
            tick: 0,
        };
        log!(
            "[session:{}] created {} game (seed {}, {:?})",
            session.session_id,
            mode,
            session.rng.seed(),
            session.controller
        );
        session.publish();
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> Arc<SnakeGameState> {
        Arc::clone(&self.state)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn controller(&self) -> SnakeController {
        self.controller
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Interval until the next tick, derived from the published score.
    pub fn next_delay(&self) -> Duration {
        self.settings.difficulty.tick_interval(self.state.score)
    }

    /// Autoplay sessions steer themselves and drop external intents.
    pub fn enqueue_direction(&mut self, direction: Direction) {
        if self.controller == SnakeController::Human {
            self.input.enqueue(direction);
        }
    }

    pub fn enqueue_token(&mut self, token: &str) -> bool {
        self.controller == SnakeController::Human && self.input.enqueue_token(token)
    }

    pub fn start(&mut self) -> Option<Duration> {
        if self.phase != SessionPhase::Idle {
            return None;
        }
        self.phase = SessionPhase::Running;
        log!("[session:{}] started", self.session_id);
        Some(self.next_delay())
    }

    /// Returns whether the session was running. The published snapshot carries
    /// the pause flag.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        self.state = Arc::new(self.state.with_paused(true));
        log!("[session:{}] paused at tick {}", self.session_id, self.tick);
        self.publish();
        true
    }

    pub fn resume(&mut self) -> Option<Duration> {
        if self.phase != SessionPhase::Paused {
            return None;
        }
        self.phase = SessionPhase::Running;
        self.state = Arc::new(self.state.with_paused(false));
        log!("[session:{}] resumed at tick {}", self.session_id, self.tick);
        self.publish();
        Some(self.next_delay())
    }

    /// Discards the current game and builds a fresh one in `Idle`.
    pub fn reset(&mut self, mode: GameMode) -> Result<(), EngineError> {
        let state = SnakeGameState::create_with_grid_size(mode, self.settings.grid_size, &mut self.rng)?;
        self.state = Arc::new(state);
        self.phase = SessionPhase::Idle;
        self.input.clear();
        self.tick = 0;
        log!("[session:{}] reset to a new {} game", self.session_id, mode);
        self.publish();
        Ok(())
    }

    /// Advances one tick if running. A terminated, idle or paused session is
    /// left untouched.
    pub fn tick(&mut self) -> Result<Option<Duration>, EngineError> {
        if self.phase != SessionPhase::Running {
            return Ok(None);
        }

        let direction = match self.controller {
            SnakeController::Human => self.input.resolve(self.state.direction),
            SnakeController::Autoplay => BotController::calculate_move(
                &self.state,
                self.settings.autoplay_greedy_probability,
                &mut self.rng,
            ),
        };

        let next = match self.state.step(direction, &mut self.rng) {
            Ok(next) => next,
            Err(e) => {
                log!("[session:{}] cannot continue: {}", self.session_id, e);
                self.terminate();
                return Err(e);
            }
        };

        let ate = next.score > self.state.score;
        self.state = Arc::new(next);
        self.tick += 1;
        if ate {
            log!(
                "[session:{}] ate food at ({}, {}). Score: {}",
                self.session_id,
                self.state.head().x,
                self.state.head().y,
                self.state.score
            );
        }
        self.publish();

        if self.state.is_game_over {
            self.terminate();
            return Ok(None);
        }
        Ok(Some(self.next_delay()))
    }

    /// Drives the session from `command_rx` until `Stop`, or until the channel
    /// is closed and no tick is pending. Returns the final score of the last
    /// game that ended.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> Result<Option<u32>, EngineError> {
        let mut timer: Option<Pin<Box<Sleep>>> = None;
        let mut commands_open = true;
        let mut final_score = None;

        loop {
            if !commands_open && timer.is_none() {
                break;
            }

            tokio::select! {
                () = wait_for(&mut timer) => {
                    timer = self.tick()?.map(|delay| Box::pin(sleep(delay)));
                    if self.phase == SessionPhase::Terminated {
                        final_score = Some(self.state.score);
                    }
                }
                command = command_rx.recv(), if commands_open => {
                    match command {
                        None => commands_open = false,
                        Some(SessionCommand::Stop) => break,
                        Some(command) => {
                            if let Some(delay) = self.apply(command)? {
                                timer = Some(Box::pin(sleep(delay)));
                            }
                        }
                    }
                }
            }

            if self.phase != SessionPhase::Running {
                timer = None;
            }
        }

        log!("[session:{}] loop finished after {} ticks", self.session_id, self.tick);
        Ok(final_score)
    }

    fn apply(&mut self, command: SessionCommand) -> Result<Option<Duration>, EngineError> {
        let delay = match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Turn(direction) => {
                self.enqueue_direction(direction);
                None
            }
            SessionCommand::TurnToken(token) => {
                self.enqueue_token(&token);
                None
            }
            SessionCommand::Pause => {
                self.pause();
                None
            }
            SessionCommand::Resume => self.resume(),
            SessionCommand::Reset(mode) => {
                self.reset(mode)?;
                None
            }
            SessionCommand::Stop => None,
        };
        Ok(delay)
    }

    fn terminate(&mut self) {
        if self.phase == SessionPhase::Terminated {
            return;
        }
        self.phase = SessionPhase::Terminated;
        log!(
            "[session:{}] game over after {} ticks ({:?}). Final score: {}",
            self.session_id,
            self.tick,
            self.state.death_reason,
            self.state.score
        );
        self.observer.on_game_over(self.state.score);
    }

    fn publish(&mut self) {
        self.observer.on_state(self.tick, &self.state);
    }

    #[cfg(test)]
    fn set_state(&mut self, state: SnakeGameState) {
        self.state = Arc::new(state);
    }
}

async fn wait_for(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => pending().await,
    }
}
