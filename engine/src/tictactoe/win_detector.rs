use super::board::Board;
use super::types::{GameResult, Mark, WinningLine};

pub const WIN_LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

pub fn check_win(board: &Board) -> Option<Mark> {
    check_win_with_line(board).map(|line| line.mark)
}

/// First completed line in `WIN_LINES` order, if any.
pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    let cells = board.cells();
    WIN_LINES.iter().find_map(|&[a, b, c]| {
        let mark = cells[a];
        if mark != Mark::Empty && mark == cells[b] && mark == cells[c] {
            Some(WinningLine {
                mark,
                cells: [a, b, c],
            })
        } else {
            None
        }
    })
}

pub fn evaluate(board: &Board) -> GameResult {
    if let Some(mark) = check_win(board) {
        return GameResult::Win(mark);
    }
    if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}
