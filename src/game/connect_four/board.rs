use std::fmt;

use super::player::Player;
use crate::error::MoveError;
use crate::game::{Rules, Side};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Length of a winning line.
pub const WINDOW: usize = 4;
pub const CENTER_COL: usize = COLS / 2;

/// Column ordering: center-first for better alpha-beta pruning.
const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Row/column steps for horizontal, vertical, `\` and `/` lines.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Lowest empty row in `col`, if any.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::ColumnOutOfRange(col));
        }
        let row = self.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Remove the topmost piece of a column, returning where it was.
    pub fn lift_piece(&mut self, col: usize) -> Option<(usize, Cell)> {
        if col >= COLS {
            return None;
        }
        let row = (0..ROWS).find(|&row| self.cells[row][col] != Cell::Empty)?;
        let cell = std::mem::replace(&mut self.cells[row][col], Cell::Empty);
        Some((row, cell))
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Every run of [`WINDOW`] cells in all four orientations.
    pub fn windows(&self) -> impl Iterator<Item = [Cell; WINDOW]> + '_ {
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |col| self.window_at(row, col, dr, dc))
            })
        })
    }

    fn window_at(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<[Cell; WINDOW]> {
        let mut window = [Cell::Empty; WINDOW];
        for (i, slot) in window.iter_mut().enumerate() {
            let r = row as isize + dr * i as isize;
            let c = col as isize + dc * i as isize;
            if r < 0 || c < 0 || r >= ROWS as isize || c >= COLS as isize {
                return None;
            }
            *slot = self.cells[r as usize][c as usize];
        }
        Some(window)
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules for Board {
    type Move = usize;
    type Side = Player;

    fn is_valid_move(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    fn apply_move(&mut self, col: usize, side: Player) -> Result<(), MoveError> {
        self.drop_piece(col, side.to_cell()).map(|_| ())
    }

    fn undo_move(&mut self, col: usize) {
        self.lift_piece(col);
    }

    fn check_win(&self, side: Player) -> bool {
        let cell = side.to_cell();
        self.windows().any(|window| window.iter().all(|&c| c == cell))
    }

    fn check_draw(&self) -> bool {
        self.is_full() && !Player::ALL.into_iter().any(|p| self.check_win(p))
    }

    fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    fn search_order(&self) -> Vec<usize> {
        MOVE_ORDER
            .into_iter()
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Red => "R",
                    Cell::Yellow => "Y",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}
