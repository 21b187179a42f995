use crate::rng::RandomSource;
use super::board::Board;
use super::error::GameError;
use super::minimax::best_move;
use super::types::{Difficulty, Mark};

/// Probability that a medium bot plays a random cell instead of the best one.
pub const MEDIUM_RANDOM_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct BotInput {
    pub board: Board,
    pub bot_mark: Mark,
}

impl BotInput {
    pub fn new(board: Board, bot_mark: Mark) -> Self {
        Self { board, bot_mark }
    }
}

pub fn calculate_move(
    difficulty: Difficulty,
    input: BotInput,
    rng: &mut impl RandomSource,
) -> Result<usize, GameError> {
    match difficulty {
        Difficulty::Easy => easy_move(&input, rng),
        Difficulty::Medium => medium_move(&input, rng),
        Difficulty::Hard => hard_move(&input),
    }
}

pub fn easy_move(input: &BotInput, rng: &mut impl RandomSource) -> Result<usize, GameError> {
    let available_moves = input.board.empty_cells();
    if available_moves.is_empty() {
        return Err(GameError::NoLegalMove);
    }
    let idx = rng.pick_index(available_moves.len());
    Ok(available_moves[idx])
}

/// A coin flip between the easy and the hard strategy. The random branch is
/// deliberately weak.
pub fn medium_move(input: &BotInput, rng: &mut impl RandomSource) -> Result<usize, GameError> {
    if input.board.is_full() {
        return Err(GameError::NoLegalMove);
    }
    if rng.chance(MEDIUM_RANDOM_PROBABILITY) {
        easy_move(input, rng)
    } else {
        hard_move(input)
    }
}

pub fn hard_move(input: &BotInput) -> Result<usize, GameError> {
    let human_mark = input.bot_mark.opponent().ok_or(GameError::NoLegalMove)?;
    best_move(&input.board, input.bot_mark, human_mark).ok_or(GameError::NoLegalMove)
}
