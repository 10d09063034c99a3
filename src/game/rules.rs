use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::MoveError;

/// One of the two sides of a game.
pub trait Side: Copy + Eq + Hash + Debug + Display + Send + 'static {
    /// Both sides, first mover first.
    const ALL: [Self; 2];

    /// Get the other side
    fn other(self) -> Self;

    /// Stable index in `0..2`, matching the position in [`Side::ALL`].
    fn index(self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome<S> {
    Ongoing,
    Winner(S),
    Draw,
}

impl<S: Copy> GameOutcome<S> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    pub fn winner(&self) -> Option<S> {
        match self {
            GameOutcome::Winner(side) => Some(*side),
            _ => None,
        }
    }
}

/// Rule engine shared by every board.
///
/// Moves are applied for an explicit side so that speculative code (search,
/// threat detection) can place either side's piece. Every successful
/// [`Rules::apply_move`] can be reverted exactly by [`Rules::undo_move`].
pub trait Rules: Clone + Debug + PartialEq + Send + 'static {
    type Move: Copy + Eq + Hash + Debug + Send + 'static;
    type Side: Side;

    /// Whether `mv` can be played on the current board.
    fn is_valid_move(&self, mv: Self::Move) -> bool;

    /// Place `side`'s piece. Invalid moves return an error and leave the board
    /// unchanged.
    fn apply_move(&mut self, mv: Self::Move, side: Self::Side) -> Result<(), MoveError>;

    /// Revert the most recent piece placed by `mv`.
    fn undo_move(&mut self, mv: Self::Move);

    fn check_win(&self, side: Self::Side) -> bool;

    /// True iff nobody has won and no move remains.
    fn check_draw(&self) -> bool;

    /// All valid moves in ascending order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Valid moves in the order search should try them.
    fn search_order(&self) -> Vec<Self::Move> {
        self.legal_moves()
    }

    fn outcome(&self) -> GameOutcome<Self::Side> {
        for side in Self::Side::ALL {
            if self.check_win(side) {
                return GameOutcome::Winner(side);
            }
        }
        if self.check_draw() {
            GameOutcome::Draw
        } else {
            GameOutcome::Ongoing
        }
    }
}

/// Play `mv` for `side`, run `f` on the resulting board, then undo the move.
///
/// The board is restored whether or not `f` succeeds, so nothing explored
/// inside `f` is visible to the caller afterwards.
pub fn with_move<B, R, E>(
    board: &mut B,
    mv: B::Move,
    side: B::Side,
    f: impl FnOnce(&mut B) -> Result<R, E>,
) -> Result<R, E>
where
    B: Rules,
    E: From<MoveError>,
{
    board.apply_move(mv, side)?;
    let result = f(board);
    board.undo_move(mv);
    result
}
