use std::time::Duration;

use tokio::sync::watch;

use crate::rng::RandomSource;
use crate::{log, log_debug};
use super::board::Board;
use super::bot_controller::{BotInput, calculate_move};
use super::error::{GameError, InvalidMoveReason};
use super::scheduler::{BotMoveTask, BotScheduler};
use super::types::{GameMode, GameResult, Mark, Scores, WinningLine};
use super::win_detector::{check_win_with_line, evaluate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingMove,
    GameOver,
}

/// One game, from new game to the next reset.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    turn: Mark,
    mode: GameMode,
    generation: u64,
}

impl GameSession {
    fn new(mode: GameMode, generation: u64) -> Self {
        Self {
            board: Board::new(),
            turn: Mark::X,
            mode,
            generation,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> GameResult {
        evaluate(&self.board)
    }
}

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub turn: Mark,
    pub result: GameResult,
    pub scores: Scores,
    pub mode: GameMode,
    pub generation: u64,
    pub winning_line: Option<WinningLine>,
}

impl GameSnapshot {
    fn capture(session: &GameSession, scores: Scores) -> Self {
        Self {
            board: session.board,
            turn: session.turn,
            result: session.result(),
            scores,
            mode: session.mode,
            generation: session.generation,
            winning_line: check_win_with_line(&session.board),
        }
    }

    pub fn status_line(&self) -> String {
        match self.result {
            GameResult::InProgress => format!("Player {}'s turn", self.turn),
            GameResult::Win(mark) => format!("Player {} has won!", mark),
            GameResult::Draw => "Game ended in a draw!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub index: usize,
    pub mark: Mark,
    pub result: GameResult,
    pub scheduled_bot_move: Option<BotMoveTask>,
}

/// Turn-taking state machine. Owns the session and the score counters; every
/// mutation goes through `&mut self`, so there is a single writer.
pub struct GameController<S: BotScheduler, R: RandomSource> {
    session: GameSession,
    scores: Scores,
    scheduler: S,
    rng: R,
    bot_delay: Duration,
    snapshot_tx: watch::Sender<GameSnapshot>,
}

impl<S: BotScheduler, R: RandomSource> GameController<S, R> {
    pub fn new(mode: GameMode, scheduler: S, rng: R, bot_delay: Duration) -> Self {
        let session = GameSession::new(mode, 0);
        let scores = Scores::default();
        let (snapshot_tx, _) = watch::channel(GameSnapshot::capture(&session, scores));

        Self {
            session,
            scores,
            scheduler,
            rng,
            bot_delay,
            snapshot_tx,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn generation(&self) -> u64 {
        self.session.generation
    }

    pub fn state(&self) -> ControllerState {
        if self.session.result().is_terminal() {
            ControllerState::GameOver
        } else {
            ControllerState::AwaitingMove
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.session, self.scores)
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The mark a human at the keyboard plays: whoever is to move in a local
    /// game, the non-bot side otherwise.
    pub fn human_mark(&self) -> Mark {
        match self.session.mode.bot_mark().and_then(|bot| bot.opponent()) {
            Some(human) => human,
            None => self.session.turn,
        }
    }

    /// Starts over with an empty board. Any bot move still pending belongs to
    /// the previous generation and will be ignored when it fires.
    pub fn new_game(&mut self, mode: GameMode) {
        let generation = self.session.generation + 1;
        self.session = GameSession::new(mode, generation);
        log!("Game #{} started in mode {}", generation, mode);

        self.schedule_bot_if_needed();
        self.publish();
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
        log!("Scores reset");
        self.publish();
    }

    pub fn request_move(&mut self, index: usize, acting_mark: Mark) -> Result<MoveOutcome, GameError> {
        if self.session.result().is_terminal() {
            return Err(GameError::InvalidMove(InvalidMoveReason::GameOver));
        }
        if acting_mark != self.session.turn {
            return Err(GameError::InvalidMove(InvalidMoveReason::WrongTurn));
        }

        self.session.board = self.session.board.apply_move(index, acting_mark)?;

        let result = self.session.result();
        match result {
            GameResult::InProgress => {
                if let Some(next) = acting_mark.opponent() {
                    self.session.turn = next;
                }
            }
            GameResult::Win(_) | GameResult::Draw => {
                self.scores.record(result);
                log!(
                    "Game #{} finished: {:?}, score X {} / O {} / draws {}",
                    self.session.generation,
                    result,
                    self.scores.x_wins,
                    self.scores.o_wins,
                    self.scores.draws
                );
            }
        }

        let scheduled_bot_move = self.schedule_bot_if_needed();
        self.publish();

        Ok(MoveOutcome {
            index,
            mark: acting_mark,
            result,
            scheduled_bot_move,
        })
    }

    /// Plays a previously scheduled bot move. Returns `Ok(None)` for a task
    /// that no longer applies.
    pub fn fire_bot_move(&mut self, task: BotMoveTask) -> Result<Option<MoveOutcome>, GameError> {
        if task.generation != self.session.generation {
            log_debug!(
                "Dropping bot move for game #{}, current game is #{}",
                task.generation,
                self.session.generation
            );
            return Ok(None);
        }
        if self.state() == ControllerState::GameOver || self.session.turn != task.bot_mark {
            log_debug!("Dropping bot move for game #{}, not the bot's turn", task.generation);
            return Ok(None);
        }
        let Some(difficulty) = self.session.mode.difficulty() else {
            return Ok(None);
        };

        let input = BotInput::new(self.session.board, task.bot_mark);
        let index = calculate_move(difficulty, input, &mut self.rng)?;
        log_debug!("Bot ({}) plays {} on {}", difficulty.key(), index, self.session.board);

        self.request_move(index, task.bot_mark).map(Some)
    }

    fn schedule_bot_if_needed(&mut self) -> Option<BotMoveTask> {
        let bot_mark = self.session.mode.bot_mark()?;
        if self.state() != ControllerState::AwaitingMove || self.session.turn != bot_mark {
            return None;
        }

        let task = BotMoveTask {
            generation: self.session.generation,
            bot_mark,
            delay: self.bot_delay,
        };
        self.scheduler.schedule(task);
        Some(task)
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SessionRng;
    use crate::tictactoe::{Difficulty, ManualBotScheduler};

    const DELAY: Duration = Duration::from_millis(500);

    fn controller(mode: GameMode) -> GameController<ManualBotScheduler, SessionRng> {
        GameController::new(mode, ManualBotScheduler::new(), SessionRng::new(12345), DELAY)
    }

    fn play(controller: &mut GameController<ManualBotScheduler, SessionRng>, moves: &[usize]) {
        for &index in moves {
            let mark = controller.session().turn();
            controller.request_move(index, mark).unwrap();
        }
    }

    fn fire_pending(controller: &mut GameController<ManualBotScheduler, SessionRng>) -> Vec<Option<MoveOutcome>> {
        let tasks = controller.scheduler_mut().take_pending();
        tasks
            .into_iter()
            .map(|task| controller.fire_bot_move(task).unwrap())
            .collect()
    }

    #[test]
    fn test_first_move_then_occupied_cell() {
        let mut c = controller(GameMode::LocalTwoPlayer);

        let outcome = c.request_move(0, Mark::X).unwrap();

        assert_eq!(outcome.result, GameResult::InProgress);
        assert_eq!(c.session().board().get(0), Some(Mark::X));
        assert_eq!(c.session().turn(), Mark::O);

        let before = c.snapshot();
        let result = c.request_move(0, Mark::O);

        assert_eq!(
            result,
            Err(GameError::InvalidMove(InvalidMoveReason::CellOccupied))
        );
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_wrong_turn_is_rejected() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        let before = c.snapshot();

        let result = c.request_move(4, Mark::O);

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMoveReason::WrongTurn)));
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut c = controller(GameMode::LocalTwoPlayer);

        let result = c.request_move(9, Mark::X);

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMoveReason::OutOfRange)));
        assert_eq!(c.session().turn(), Mark::X);
    }

    #[test]
    fn test_x_win_ends_game_and_counts_once() {
        let mut c = controller(GameMode::LocalTwoPlayer);

        play(&mut c, &[0, 3, 1, 4, 2]);

        assert_eq!(c.state(), ControllerState::GameOver);
        assert_eq!(c.session().result(), GameResult::Win(Mark::X));
        assert_eq!(c.scores(), Scores { x_wins: 1, o_wins: 0, draws: 0 });
        assert_eq!(c.snapshot().winning_line.map(|l| l.cells), Some([0, 1, 2]));
        assert_eq!(c.snapshot().status_line(), "Player X has won!");
    }

    #[test]
    fn test_moves_after_game_over_are_rejected() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        play(&mut c, &[0, 3, 1, 4, 2]);
        let before = c.snapshot();

        let turn = c.session().turn();
        let result = c.request_move(8, turn);

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMoveReason::GameOver)));
        assert_eq!(c.snapshot(), before);
        assert_eq!(c.session().turn(), Mark::X);
    }

    #[test]
    fn test_o_win_and_draw_are_counted() {
        let mut c = controller(GameMode::LocalTwoPlayer);

        play(&mut c, &[0, 3, 1, 4, 8, 5]);
        assert_eq!(c.session().result(), GameResult::Win(Mark::O));

        c.new_game(GameMode::LocalTwoPlayer);
        play(&mut c, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(c.session().result(), GameResult::Draw);
        assert_eq!(c.snapshot().status_line(), "Game ended in a draw!");

        assert_eq!(c.scores(), Scores { x_wins: 0, o_wins: 1, draws: 1 });
    }

    #[test]
    fn test_scores_survive_new_game_until_reset() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        play(&mut c, &[0, 3, 1, 4, 2]);

        c.new_game(GameMode::LocalTwoPlayer);
        assert_eq!(c.scores().x_wins, 1);
        assert_eq!(c.state(), ControllerState::AwaitingMove);
        assert_eq!(*c.session().board(), Board::new());

        c.request_move(4, Mark::X).unwrap();
        c.reset_scores();

        assert_eq!(c.scores(), Scores::default());
        assert_eq!(c.session().board().get(4), Some(Mark::X));
    }

    #[test]
    fn test_new_game_bumps_generation() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        let first = c.generation();

        c.new_game(GameMode::LocalTwoPlayer);
        c.new_game(GameMode::VersusBot(Difficulty::Easy));

        assert_eq!(c.generation(), first + 2);
        assert_eq!(c.session().mode(), GameMode::VersusBot(Difficulty::Easy));
        assert_eq!(c.session().turn(), Mark::X);
    }

    #[test]
    fn test_local_game_never_schedules_bot() {
        let mut c = controller(GameMode::LocalTwoPlayer);

        let outcome = c.request_move(0, Mark::X).unwrap();

        assert_eq!(outcome.scheduled_bot_move, None);
        assert_eq!(c.scheduler_mut().pending_count(), 0);
    }

    #[test]
    fn test_human_move_schedules_bot_reply() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Hard));

        let outcome = c.request_move(0, Mark::X).unwrap();

        let task = outcome.scheduled_bot_move.unwrap();
        assert_eq!(task.generation, c.generation());
        assert_eq!(task.bot_mark, Mark::O);
        assert_eq!(task.delay, DELAY);
        assert_eq!(c.scheduler_mut().pending_count(), 1);

        let fired = fire_pending(&mut c);

        assert_eq!(fired.len(), 1);
        // the only reply to a corner opening that does not lose
        assert_eq!(c.session().board().get(4), Some(Mark::O));
        assert_eq!(c.session().turn(), Mark::X);
        assert_eq!(c.scheduler_mut().pending_count(), 0);
    }

    #[test]
    fn test_human_cannot_play_the_bot_side() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Easy));
        c.request_move(0, Mark::X).unwrap();

        let result = c.request_move(1, Mark::X);

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMoveReason::WrongTurn)));
        assert_eq!(c.human_mark(), Mark::X);
    }

    #[test]
    fn test_stale_bot_move_is_discarded_after_new_game() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Hard));
        c.request_move(0, Mark::X).unwrap();
        let stale = c.scheduler_mut().take_pending();

        c.new_game(GameMode::VersusBot(Difficulty::Hard));
        let fired: Vec<_> = stale
            .into_iter()
            .map(|task| c.fire_bot_move(task))
            .collect();

        assert_eq!(fired, vec![Ok(None)]);
        assert_eq!(*c.session().board(), Board::new());
        assert_eq!(c.session().turn(), Mark::X);
    }

    #[test]
    fn test_mode_change_discards_pending_bot_move() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Medium));
        c.request_move(4, Mark::X).unwrap();
        let stale = c.scheduler_mut().take_pending();

        c.new_game(GameMode::LocalTwoPlayer);
        c.request_move(0, Mark::X).unwrap();
        for task in stale {
            assert_eq!(c.fire_bot_move(task), Ok(None));
        }

        assert_eq!(c.session().board().empty_cells().len(), 8);
        assert_eq!(c.session().turn(), Mark::O);
    }

    #[test]
    fn test_duplicate_fire_is_ignored() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Hard));
        let task = c.request_move(0, Mark::X).unwrap().scheduled_bot_move.unwrap();

        assert!(c.fire_bot_move(task).unwrap().is_some());
        assert_eq!(c.fire_bot_move(task), Ok(None));
        assert_eq!(c.session().board().empty_cells().len(), 7);
    }

    #[test]
    fn test_winning_human_move_schedules_nothing() {
        let mut c = controller(GameMode::VersusBot(Difficulty::Easy));
        c.session.board = "XX__O___O".parse().unwrap();

        let outcome = c.request_move(2, Mark::X).unwrap();

        assert_eq!(outcome.result, GameResult::Win(Mark::X));
        assert_eq!(outcome.scheduled_bot_move, None);
        assert_eq!(c.scheduler_mut().pending_count(), 0);
        assert_eq!(c.scores().x_wins, 1);
    }

    #[test]
    fn test_hard_bot_never_loses_to_random_human() {
        let mut human = SessionRng::new(2024);
        let mut c = controller(GameMode::VersusBot(Difficulty::Hard));

        for _ in 0..30 {
            c.new_game(GameMode::VersusBot(Difficulty::Hard));
            while c.state() == ControllerState::AwaitingMove {
                let empty = c.session().board().empty_cells();
                let index = empty[human.pick_index(empty.len())];
                c.request_move(index, Mark::X).unwrap();
                fire_pending(&mut c);
            }
        }

        let scores = c.scores();
        assert_eq!(scores.x_wins, 0);
        assert_eq!(scores.o_wins + scores.draws, 30);
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        let mut rx = c.subscribe();

        c.request_move(4, Mark::X).unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.board.get(4), Some(Mark::X));
        assert_eq!(snapshot.status_line(), "Player O's turn");

        c.reset_scores();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_rejected_move_does_not_notify() {
        let mut c = controller(GameMode::LocalTwoPlayer);
        let mut rx = c.subscribe();
        let _ = rx.borrow_and_update();

        let _ = c.request_move(4, Mark::O);

        assert!(!rx.has_changed().unwrap());
    }
}
