use super::board::Board;
use super::types::{GameResult, Mark};
use super::win_detector::evaluate;

const WIN_SCORE: i32 = 10;

/// Full-depth game tree search from the bot's point of view.
///
/// Every recursive call receives its own copy of the board, so a search never
/// touches the live session board.
struct Search {
    bot_mark: Mark,
    human_mark: Mark,
    pruning: bool,
    nodes: u64,
}

impl Search {
    fn new(bot_mark: Mark, human_mark: Mark) -> Self {
        Self {
            bot_mark,
            human_mark,
            pruning: true,
            nodes: 0,
        }
    }

    fn best_move(&mut self, board: &Board) -> Option<usize> {
        let mut best_move = None;
        let mut best_score = i32::MIN;

        for index in board.empty_cells() {
            let child = board.placed(index, self.bot_mark);
            let score = self.minimax(child, 0, false, i32::MIN, i32::MAX);

            // strict: the lowest index wins ties
            if score > best_score {
                best_score = score;
                best_move = Some(index);
            }
        }

        best_move
    }

    fn minimax(
        &mut self,
        board: Board,
        depth: i32,
        is_maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        match evaluate(&board) {
            GameResult::Win(winner) if winner == self.bot_mark => return WIN_SCORE - depth,
            GameResult::Win(_) => return -WIN_SCORE + depth,
            GameResult::Draw => return 0,
            GameResult::InProgress => {}
        }

        if is_maximizing {
            let mut max_eval = i32::MIN;
            for index in board.empty_cells() {
                let eval = self.minimax(
                    board.placed(index, self.bot_mark),
                    depth + 1,
                    false,
                    alpha,
                    beta,
                );
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for index in board.empty_cells() {
                let eval = self.minimax(
                    board.placed(index, self.human_mark),
                    depth + 1,
                    true,
                    alpha,
                    beta,
                );
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

/// Optimal cell for `bot_mark`, or `None` when no cell is empty.
pub fn best_move(board: &Board, bot_mark: Mark, human_mark: Mark) -> Option<usize> {
    Search::new(bot_mark, human_mark).best_move(board)
}

/// Depth-adjusted score of `board`: `10 - depth` for a bot win,
/// `depth - 10` for a human win and `0` for a draw.
pub fn minimax(
    board: &Board,
    depth: i32,
    is_maximizing: bool,
    alpha: i32,
    beta: i32,
    bot_mark: Mark,
    human_mark: Mark,
) -> i32 {
    Search::new(bot_mark, human_mark).minimax(*board, depth, is_maximizing, alpha, beta)
}
