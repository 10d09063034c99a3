use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::error::{GameError, MoveError};
use crate::game::{with_move, GameState, Rules, Side};

/// First move in `legal_moves` order that wins on the spot for `side`.
pub fn winning_move<B: Rules>(board: &B, side: B::Side) -> Result<Option<B::Move>, MoveError> {
    let mut scratch = board.clone();
    for mv in board.legal_moves() {
        if with_move(&mut scratch, mv, side, |b| Ok::<_, MoveError>(b.check_win(side)))? {
            return Ok(Some(mv));
        }
    }
    Ok(None)
}

/// Cheap non-search policy: win if possible, otherwise block the opponent's
/// immediate win, otherwise play a uniformly random legal move.
pub fn fallback_move<B: Rules, R: Rng + ?Sized>(
    board: &B,
    side: B::Side,
    rng: &mut R,
) -> Result<B::Move, GameError> {
    let legal = board.legal_moves();
    if legal.is_empty() {
        return Err(GameError::NoLegalMoves);
    }
    if let Some(mv) = winning_move(board, side)? {
        return Ok(mv);
    }
    if let Some(mv) = winning_move(board, side.other())? {
        return Ok(mv);
    }
    Ok(legal[rng.random_range(0..legal.len())])
}

/// Agent wrapper around [`fallback_move`].
pub struct FallbackAgent {
    rng: StdRng,
}

impl FallbackAgent {
    pub fn new() -> Self {
        FallbackAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        FallbackAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for FallbackAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Rules> Agent<B> for FallbackAgent {
    fn select_action(&mut self, state: &GameState<B>, _training: bool) -> Result<B::Move, GameError> {
        if state.is_terminal() {
            return Err(GameError::GameOver);
        }
        fallback_move(state.board(), state.current_player(), &mut self.rng)
    }

    fn name(&self) -> &str {
        "Fallback"
    }
}
