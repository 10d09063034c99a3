//! Core game logic: the shared rule-engine trait, the two boards, and a game
//! state machine that tracks the side to move and the outcome.

pub mod connect_four;
mod rules;
mod state;
pub mod tictactoe;

pub use rules::{with_move, GameOutcome, Rules, Side};
pub use state::GameState;
