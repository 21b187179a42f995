use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMoveReason {
    OutOfRange,
    CellOccupied,
    WrongTurn,
    GameOver,
    EmptyMark,
}

impl InvalidMoveReason {
    fn describe(&self) -> &'static str {
        match self {
            InvalidMoveReason::OutOfRange => "position out of bounds",
            InvalidMoveReason::CellOccupied => "cell is already marked",
            InvalidMoveReason::WrongTurn => "not your turn",
            InvalidMoveReason::GameOver => "game is already over",
            InvalidMoveReason::EmptyMark => "cannot place an empty mark",
        }
    }
}

/// Recoverable rejections. The controller leaves its state untouched whenever
/// one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid move: {}", .0.describe())]
    InvalidMove(InvalidMoveReason),
    #[error("no legal move available")]
    NoLegalMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode '{0}', expected one of: local, bot-easy, bot-medium, bot-hard")]
pub struct ParseModeError(pub String);
