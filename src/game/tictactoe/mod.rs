//! Tic-Tac-Toe: 3x3 board with direct placement.

mod board;
mod mark;

pub use board::{index_square, square_index, Board, Square, CELLS, EMPTY_SYMBOL, SIZE};
pub use mark::Mark;
