use std::fmt;
use std::str::FromStr;

use super::error::{GameError, InvalidMoveReason};
use super::types::Mark;

pub const CELL_COUNT: usize = 9;

/// Row-major 3x3 grid. `Copy`, so the search can branch on owned copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Mark; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied()
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        self.get(index) == Some(Mark::Empty)
    }

    /// Returns a new board with `mark` at `index`; `self` is left as is.
    pub fn apply_move(&self, index: usize, mark: Mark) -> Result<Board, GameError> {
        if mark == Mark::Empty {
            return Err(GameError::InvalidMove(InvalidMoveReason::EmptyMark));
        }
        match self.get(index) {
            None => Err(GameError::InvalidMove(InvalidMoveReason::OutOfRange)),
            Some(Mark::Empty) => Ok(self.placed(index, mark)),
            Some(_) => Err(GameError::InvalidMove(InvalidMoveReason::CellOccupied)),
        }
    }

    // Caller guarantees `index` is an empty in-range cell.
    pub(crate) fn placed(&self, index: usize, mark: Mark) -> Board {
        let mut next = *self;
        next.cells[index] = mark;
        next
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    /// Ascending indices of every empty cell.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Mark::Empty)
            .map(|(index, _)| index)
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = String;

    /// Parses nine cells written as `X`, `O` and `_` (or `.`), whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let marks: Vec<Mark> = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'X' | 'x' => Ok(Mark::X),
                'O' | 'o' => Ok(Mark::O),
                '_' | '.' => Ok(Mark::Empty),
                other => Err(format!("Unexpected board character '{}'", other)),
            })
            .collect::<Result<_, _>>()?;

        let cells: [Mark; CELL_COUNT] = marks
            .try_into()
            .map_err(|marks: Vec<Mark>| format!("Board needs {} cells, got {}", CELL_COUNT, marks.len()))?;
        Ok(Self { cells })
    }
}
