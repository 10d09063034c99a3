//! Computer players: the agent trait, the Connect Four evaluator, minimax and
//! alpha-beta search, the win/block/random fallback and tabular Q-learning.

mod agent;
pub mod fallback;
pub mod heuristic;
pub mod qlearning;
mod random;
pub mod search;

pub use agent::Agent;
pub use fallback::FallbackAgent;
pub use heuristic::{ConnectFourHeuristic, Evaluator, TicTacToeScorer};
pub use qlearning::{QLearningAgent, QLearningConfig, QTable};
pub use random::RandomAgent;
pub use search::{alpha_beta, minimax, MinimaxAgent, SearchResult};
