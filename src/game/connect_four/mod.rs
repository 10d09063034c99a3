//! Connect Four: 6x7 board where pieces fall to the lowest empty row.

mod board;
mod player;

pub use board::{Board, Cell, CENTER_COL, COLS, ROWS, WINDOW};
pub use player::Player;
