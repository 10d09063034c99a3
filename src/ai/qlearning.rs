//! Tabular Q-learning for Tic-Tac-Toe.
//!
//! Each mark keeps its own table mapping the row-major board encoding to one
//! value per square, so a row only ever holds values for the side that
//! decides from it. Rows are inserted the first time the agent makes a
//! decision from a state; looking up the successor state for the update
//! never inserts.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use tracing::trace;

use super::agent::Agent;
use crate::error::GameError;
use crate::game::tictactoe::{index_square, square_index, Board, Mark, Square, CELLS};
use crate::game::{GameOutcome, GameState, Rules, Side};

pub type ActionValues = [f64; CELLS];

/// Q-learning hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Step size α.
    pub learning_rate: f64,
    /// Discount factor γ.
    pub discount: f64,
    /// Exploration rate ε.
    pub epsilon: f64,
    /// Reward for a move that neither wins nor ends the game.
    pub step_penalty: f64,
    pub win_reward: f64,
    pub draw_reward: f64,
    /// Applied to the agent's last move when the opponent wins.
    pub loss_reward: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        QLearningConfig {
            learning_rate: 0.5,
            discount: 0.9,
            epsilon: 0.1,
            step_penalty: -0.01,
            win_reward: 1.0,
            draw_reward: 0.0,
            loss_reward: -1.0,
        }
    }
}

/// Sparse, lazily grown action-value table.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<String, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of states seen so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, state: &str) -> Option<&ActionValues> {
        self.values.get(state)
    }

    /// Values for `state`, inserting a zeroed row on first visit.
    pub fn visit(&mut self, state: &str) -> &mut ActionValues {
        self.values
            .entry(state.to_owned())
            .or_insert([0.0; CELLS])
    }

    pub fn value(&self, state: &str, action: usize) -> f64 {
        self.get(state).map_or(0.0, |values| values[action])
    }

    /// Highest value in the row for `state`, 0 for unseen states.
    pub fn max_value(&self, state: &str) -> f64 {
        self.get(state).map_or(0.0, |values| {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Encodings of every state with a row.
    pub fn states(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn insert(&mut self, state: impl Into<String>, values: ActionValues) {
        self.values.insert(state.into(), values);
    }
}

/// Q-learning player for Tic-Tac-Toe.
pub struct QLearningAgent {
    /// Indexed by [`Side::index`] of the deciding mark.
    tables: [QTable; 2],
    config: QLearningConfig,
    rng: StdRng,
    /// Last non-terminal `(mark, state, action)`, awaiting the opponent's reply.
    pending: Option<(Mark, String, usize)>,
}

impl QLearningAgent {
    pub fn new(config: QLearningConfig) -> Self {
        QLearningAgent {
            tables: [QTable::new(), QTable::new()],
            config,
            rng: StdRng::from_os_rng(),
            pending: None,
        }
    }

    pub fn with_seed(config: QLearningConfig, seed: u64) -> Self {
        QLearningAgent {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(config)
        }
    }

    /// Values learned while playing `mark`.
    pub fn table(&self, mark: Mark) -> &QTable {
        &self.tables[mark.index()]
    }

    pub fn table_mut(&mut self, mark: Mark) -> &mut QTable {
        &mut self.tables[mark.index()]
    }

    /// States seen across both marks.
    pub fn states_learned(&self) -> usize {
        self.tables.iter().map(QTable::len).sum()
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Forget the pending transition at the start of a new game.
    pub fn reset_episode(&mut self) {
        self.pending = None;
    }

    /// One learning decision for `mark` on `board`: pick an action, score the
    /// resulting position and update the table. Returns the square played.
    pub fn learn_move(&mut self, board: &Board, mark: Mark) -> Result<Square, GameError> {
        let legal = legal_actions(board);
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves);
        }

        let state = board.encode();
        let values = *self.tables[mark.index()].visit(&state);

        let action = if self.rng.random_range(0.0..1.0) < self.config.epsilon {
            legal[self.rng.random_range(0..legal.len())]
        } else {
            self.best_action(&values, &legal)
        };
        let square = index_square(action);

        let mut next = *board;
        next.apply_move(square, mark)?;
        let (reward, terminal) = if next.check_win(mark) {
            (self.config.win_reward, true)
        } else if next.check_draw() {
            (self.config.draw_reward, true)
        } else {
            (self.config.step_penalty, false)
        };

        let future = if terminal {
            0.0
        } else {
            self.tables[mark.index()].max_value(&next.encode())
        };
        self.update(mark, &state, action, reward, future);

        self.pending = if terminal {
            None
        } else {
            Some((mark, state, action))
        };
        Ok(square)
    }

    /// Greedy decision for `mark` without exploring or learning.
    pub fn greedy_move(&mut self, board: &Board, mark: Mark) -> Result<Square, GameError> {
        let legal = legal_actions(board);
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves);
        }
        let values = self.tables[mark.index()]
            .get(&board.encode())
            .copied()
            .unwrap_or([0.0; CELLS]);
        Ok(index_square(self.best_action(&values, &legal)))
    }

    /// Settle the pending transition when the opponent's reply ended the
    /// game. There is no successor value to bootstrap from.
    pub fn observe_terminal(&mut self, reward: f64) {
        if let Some((mark, state, action)) = self.pending.take() {
            self.update(mark, &state, action, reward, 0.0);
        }
    }

    /// `Q(s,a) += α (r + γ·future − Q(s,a))`, returning the new value.
    fn update(&mut self, mark: Mark, state: &str, action: usize, reward: f64, future: f64) -> f64 {
        let QLearningConfig {
            learning_rate,
            discount,
            ..
        } = self.config;
        let values = self.tables[mark.index()].visit(state);
        let old = values[action];
        let new = old + learning_rate * (reward + discount * future - old);
        values[action] = new;
        trace!(%mark, state, action, reward, old, new, "q update");
        new
    }

    /// Uniform choice among the legal actions tied for the highest value.
    fn best_action(&mut self, values: &ActionValues, legal: &[usize]) -> usize {
        let best = legal
            .iter()
            .map(|&a| values[a])
            .fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<usize> = legal.iter().copied().filter(|&a| values[a] == best).collect();
        ties[self.rng.random_range(0..ties.len())]
    }
}

fn legal_actions(board: &Board) -> Vec<usize> {
    board.empty_squares().map(square_index).collect()
}

impl Agent<Board> for QLearningAgent {
    fn select_action(&mut self, state: &GameState<Board>, training: bool) -> Result<Square, GameError> {
        if state.is_terminal() {
            return Err(GameError::GameOver);
        }
        if training {
            self.learn_move(state.board(), state.current_player())
        } else {
            self.greedy_move(state.board(), state.current_player())
        }
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn observe_outcome(&mut self, outcome: GameOutcome<Mark>, side: Mark, training: bool) {
        if !training {
            self.pending = None;
            return;
        }
        match outcome {
            GameOutcome::Winner(winner) if winner != side => {
                self.observe_terminal(self.config.loss_reward)
            }
            GameOutcome::Draw => self.observe_terminal(self.config.draw_reward),
            _ => self.pending = None,
        }
    }
}
