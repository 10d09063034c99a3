use crate::ai::Agent;
use crate::error::GameError;
use crate::game::{GameOutcome, GameState, Rules, Side};
use crate::training::metrics::{AgentResult, EpisodeResult};

/// Play one game between `agent` (seated on `agent_side`) and `opponent`,
/// with `first` to move. Both players see the final outcome.
pub fn play_episode<B: Rules + Default>(
    agent: &mut dyn Agent<B>,
    opponent: &mut dyn Agent<B>,
    agent_side: B::Side,
    first: B::Side,
    training: bool,
) -> Result<EpisodeResult, GameError> {
    let mut state = GameState::<B>::starting_with(first);
    let mut game_length = 0;

    let outcome = loop {
        let action = if state.current_player() == agent_side {
            agent.select_action(&state, training)?
        } else {
            opponent.select_action(&state, training)?
        };
        let outcome = state.apply_move_mut(action)?;
        game_length += 1;
        if outcome.is_terminal() {
            break outcome;
        }
    };

    agent.observe_outcome(outcome, agent_side, training);
    opponent.observe_outcome(outcome, agent_side.other(), training);

    Ok(EpisodeResult {
        result: result_for(outcome, agent_side),
        game_length,
    })
}

/// Greedy game used for evaluation: no exploration, no learning.
pub fn play_eval_game<B: Rules + Default>(
    agent: &mut dyn Agent<B>,
    opponent: &mut dyn Agent<B>,
    agent_side: B::Side,
    first: B::Side,
) -> Result<EpisodeResult, GameError> {
    play_episode(agent, opponent, agent_side, first, false)
}

fn result_for<S: Side>(outcome: GameOutcome<S>, side: S) -> AgentResult {
    match outcome.winner() {
        Some(winner) if winner == side => AgentResult::Win,
        Some(_) => AgentResult::Loss,
        None => AgentResult::Draw,
    }
}

/// Derive a per-episode seed from a base seed and episode index.
pub fn episode_seed(base_seed: u64, episode_index: usize) -> u64 {
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    let index = episode_index as u64;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= index >> 32;
    hash
}
