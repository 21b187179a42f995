use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use crate::rng::RandomSource;
use crate::{log, log_warn};
use super::controller::{GameController, GameSnapshot, MoveOutcome};
use super::error::GameError;
use super::scheduler::{BotMoveTask, TokioBotScheduler};
use super::types::{GameMode, Scores};

type MoveReply = oneshot::Sender<Result<MoveOutcome, GameError>>;

pub enum GameCommand {
    NewGame(GameMode),
    Place { index: usize, reply: Option<MoveReply> },
    ResetScores,
    Shutdown,
}

/// Presentation-side end of a running [`GameHost`].
#[derive(Clone)]
pub struct GameHandle {
    command_tx: mpsc::UnboundedSender<GameCommand>,
    snapshot_rx: watch::Receiver<GameSnapshot>,
}

impl GameHandle {
    /// Returns `false` once the host has stopped.
    pub fn send(&self, command: GameCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn new_game(&self, mode: GameMode) -> bool {
        self.send(GameCommand::NewGame(mode))
    }

    pub fn reset_scores(&self) -> bool {
        self.send(GameCommand::ResetScores)
    }

    pub fn shutdown(&self) -> bool {
        self.send(GameCommand::Shutdown)
    }

    /// Plays `index` for the human side. `None` means the host is gone.
    pub async fn place(&self, index: usize) -> Option<Result<MoveOutcome, GameError>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if !self.send(GameCommand::Place {
            index,
            reply: Some(reply_tx),
        }) {
            return None;
        }
        reply_rx.await.ok()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// Owns the controller and is the only task that mutates it. Presentation
/// commands and fired bot moves are handled one at a time, in arrival order.
pub struct GameHost<R: RandomSource> {
    controller: GameController<TokioBotScheduler, R>,
    command_rx: mpsc::UnboundedReceiver<GameCommand>,
    fired_rx: mpsc::UnboundedReceiver<BotMoveTask>,
}

impl<R: RandomSource> GameHost<R> {
    pub fn new(mode: GameMode, rng: R, bot_delay: Duration) -> (Self, GameHandle) {
        let (scheduler, fired_rx) = TokioBotScheduler::new();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let controller = GameController::new(mode, scheduler, rng, bot_delay);
        let snapshot_rx = controller.subscribe();

        let host = Self {
            controller,
            command_rx,
            fired_rx,
        };
        let handle = GameHandle {
            command_tx,
            snapshot_rx,
        };
        (host, handle)
    }

    /// Runs until `Shutdown` arrives or every handle is dropped. Returns the
    /// final scores.
    pub async fn run(mut self) -> Scores {
        log!("Game host started in mode {}", self.controller.session().mode());

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(GameCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                Some(task) = self.fired_rx.recv() => {
                    if let Err(e) = self.controller.fire_bot_move(task) {
                        log_warn!("Bot move for game #{} failed: {}", task.generation, e);
                    }
                }
            }
        }

        log!("Game host stopped");
        self.controller.scores()
    }

    fn handle_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::NewGame(mode) => self.controller.new_game(mode),
            GameCommand::Place { index, reply } => {
                let mark = self.controller.human_mark();
                let result = self.controller.request_move(index, mark);
                if let Err(e) = &result {
                    log!("Rejected {} at {}: {}", mark, index, e);
                }
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            GameCommand::ResetScores => self.controller.reset_scores(),
            GameCommand::Shutdown => {}
        }
    }
}
