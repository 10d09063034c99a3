use std::fmt;

use super::mark::Mark;
use crate::error::MoveError;
use crate::game::{Rules, Side};

pub const SIZE: usize = 3;
pub const CELLS: usize = SIZE * SIZE;

/// Character standing in for an empty cell in [`Board::encode`].
pub const EMPTY_SYMBOL: char = '0';

/// A `(row, col)` position.
pub type Square = (usize, usize);

/// The three columns, three rows and two diagonals.
const LINES: [[Square; SIZE]; 8] = [
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Option<Mark>; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit rows.
    pub fn from_rows(cells: [[Option<Mark>; SIZE]; SIZE]) -> Self {
        Board { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[row][col]
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    pub fn empty_squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col].is_none())
    }

    /// Row-major string with one character per cell, e.g. `"XO0000000"`.
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|cell| cell.map_or(EMPTY_SYMBOL, Mark::symbol))
            .collect()
    }
}

/// Flat row-major index of a square.
pub fn square_index((row, col): Square) -> usize {
    row * SIZE + col
}

pub fn index_square(index: usize) -> Square {
    (index / SIZE, index % SIZE)
}

impl Rules for Board {
    type Move = Square;
    type Side = Mark;

    fn is_valid_move(&self, (row, col): Square) -> bool {
        row < SIZE && col < SIZE && self.cells[row][col].is_none()
    }

    fn apply_move(&mut self, (row, col): Square, side: Mark) -> Result<(), MoveError> {
        if row >= SIZE || col >= SIZE {
            return Err(MoveError::CellOutOfRange { row, col });
        }
        if self.cells[row][col].is_some() {
            return Err(MoveError::CellOccupied { row, col });
        }
        self.cells[row][col] = Some(side);
        Ok(())
    }

    fn undo_move(&mut self, (row, col): Square) {
        if row < SIZE && col < SIZE {
            self.cells[row][col] = None;
        }
    }

    fn check_win(&self, side: Mark) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(row, col)| self.cells[row][col] == Some(side))
        })
    }

    fn check_draw(&self) -> bool {
        self.is_full() && !Mark::ALL.into_iter().any(|m| self.check_win(m))
    }

    fn legal_moves(&self) -> Vec<Square> {
        self.empty_squares().collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or('.', Mark::symbol).to_string())
                .collect();
            if i + 1 < SIZE {
                writeln!(f, "{}", line.join(" "))?;
            } else {
                write!(f, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }
}
