use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::error::GameError;
use crate::game::{GameState, Rules};

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Rules> Agent<B> for RandomAgent {
    fn select_action(&mut self, state: &GameState<B>, _training: bool) -> Result<B::Move, GameError> {
        if state.is_terminal() {
            return Err(GameError::GameOver);
        }
        let actions = state.legal_actions();
        if actions.is_empty() {
            return Err(GameError::NoLegalMoves);
        }
        let idx = self.rng.random_range(0..actions.len());
        Ok(actions[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}
