use super::{GameOutcome, Rules, Side};
use crate::error::GameError;

/// A board together with the side to move and the cached outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<B: Rules> {
    board: B,
    current_player: B::Side,
    outcome: GameOutcome<B::Side>,
}

impl<B: Rules + Default> GameState<B> {
    /// Create initial game state; the first side in [`Side::ALL`] starts.
    pub fn initial() -> Self {
        Self::starting_with(B::Side::ALL[0])
    }

    /// Create initial game state with an explicit first mover.
    pub fn starting_with(first: B::Side) -> Self {
        GameState {
            board: B::default(),
            current_player: first,
            outcome: GameOutcome::Ongoing,
        }
    }
}

impl<B: Rules> GameState<B> {
    /// Wrap an existing position. The outcome is recomputed from the board.
    pub fn from_board(board: B, to_move: B::Side) -> Self {
        let outcome = board.outcome();
        GameState {
            board,
            current_player: to_move,
            outcome,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> B::Side {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn outcome(&self) -> GameOutcome<B::Side> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_actions(&self) -> Vec<B::Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_moves()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, mv: B::Move) -> Result<GameState<B>, GameError> {
        let mut next = self.clone();
        next.apply_move_mut(mv)?;
        Ok(next)
    }

    /// Apply move in place. Rejected moves leave the state untouched.
    pub fn apply_move_mut(&mut self, mv: B::Move) -> Result<GameOutcome<B::Side>, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }

        self.board.apply_move(mv, self.current_player)?;

        if self.board.check_win(self.current_player) {
            self.outcome = GameOutcome::Winner(self.current_player);
        } else if self.board.check_draw() {
            self.outcome = GameOutcome::Draw;
        }

        self.current_player = self.current_player.other();
        Ok(self.outcome)
    }
}
