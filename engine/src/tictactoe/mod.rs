mod board;
mod bot_controller;
mod controller;
mod error;
mod host;
mod minimax;
mod scheduler;
mod types;
mod win_detector;

pub use board::{Board, CELL_COUNT};
pub use bot_controller::{BotInput, MEDIUM_RANDOM_PROBABILITY, calculate_move, easy_move, hard_move, medium_move};
pub use controller::{ControllerState, GameController, GameSession, GameSnapshot, MoveOutcome};
pub use error::{GameError, InvalidMoveReason, ParseModeError};
pub use host::{GameCommand, GameHandle, GameHost};
pub use minimax::{best_move, minimax};
pub use scheduler::{BotMoveTask, BotScheduler, ManualBotScheduler, TokioBotScheduler};
pub use types::{Difficulty, GameMode, GameResult, Mark, Scores, WinningLine};
pub use win_detector::{WIN_LINES, check_win, check_win_with_line, evaluate};
