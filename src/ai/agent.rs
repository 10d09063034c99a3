use crate::error::GameError;
use crate::game::{GameOutcome, GameState, Rules};

/// Universal interface for all computer players.
pub trait Agent<B: Rules> {
    /// Select a move for the side to move in `state`.
    /// When `training` is true, the agent may explore and learn; otherwise it
    /// plays its current best policy.
    fn select_action(&mut self, state: &GameState<B>, training: bool) -> Result<B::Move, GameError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Called once when a game ends, with the side this agent played.
    fn observe_outcome(&mut self, _outcome: GameOutcome<B::Side>, _side: B::Side, _training: bool) {}
}
