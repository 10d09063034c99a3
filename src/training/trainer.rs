use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::{Agent, FallbackAgent, MinimaxAgent, QLearningAgent, RandomAgent};
use crate::error::{ConfigError, TrainingError};
use crate::game::tictactoe::{Board, Mark};
use crate::training::episode::{episode_seed, play_episode, play_eval_game};
use crate::training::metrics::{AgentResult, TrainingMetrics};

/// Who the learning agent trains and evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    Random,
    Fallback,
    /// Full-depth alpha-beta search.
    Minimax,
}

/// Which side the learning agent takes. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartPolicy {
    Alternate,
    Always,
    Never,
}

impl StartPolicy {
    fn agent_side(self, episode: usize) -> Mark {
        match self {
            StartPolicy::Alternate if episode % 2 == 0 => Mark::O,
            StartPolicy::Alternate | StartPolicy::Always => Mark::X,
            StartPolicy::Never => Mark::O,
        }
    }
}

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    pub log_interval: usize,
    pub eval_interval: usize,
    pub eval_games: usize,
    pub opponent: OpponentKind,
    pub agent_starts: StartPolicy,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 5000,
            log_interval: 500,
            eval_interval: 1000,
            eval_games: 100,
            opponent: OpponentKind::Random,
            agent_starts: StartPolicy::Alternate,
            seed: None,
        }
    }
}

/// Greedy evaluation results, as fractions of games played.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvalReport {
    pub games: usize,
    pub win_rate: f32,
    pub draw_rate: f32,
    pub loss_rate: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub states_learned: usize,
    pub final_eval: EvalReport,
}

fn build_opponent(kind: OpponentKind, seed: Option<u64>) -> Box<dyn Agent<Board>> {
    match (kind, seed) {
        (OpponentKind::Random, Some(seed)) => Box::new(RandomAgent::with_seed(seed)),
        (OpponentKind::Random, None) => Box::new(RandomAgent::new()),
        (OpponentKind::Fallback, Some(seed)) => Box::new(FallbackAgent::with_seed(seed)),
        (OpponentKind::Fallback, None) => Box::new(FallbackAgent::new()),
        (OpponentKind::Minimax, _) => Box::new(MinimaxAgent::tictactoe(true)),
    }
}

/// Trains a Tic-Tac-Toe Q-learning agent against a fixed opponent.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.config.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.config.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Run the full training loop.
    pub fn train(&self, agent: &mut QLearningAgent) -> Result<TrainingSummary, TrainingError> {
        self.validate()?;
        let window = self.config.log_interval;
        // Rates are reported over exactly the last `window` episodes
        let mut metrics = TrainingMetrics::with_capacity(window);
        let mut opponent = build_opponent(self.config.opponent, self.config.seed);
        let end_episode = self.config.num_episodes;

        println!(
            "Starting Q-learning for {} episodes against {}...",
            end_episode,
            opponent.name()
        );
        println!("-------------------------------------------");

        for episode in 1..=end_episode {
            agent.reset_episode();
            let agent_side = self.config.agent_starts.agent_side(episode);
            let result =
                play_episode::<Board>(agent, opponent.as_mut(), agent_side, Mark::X, true)?;
            metrics.record_episode(result);

            if episode % window == 0 {
                println!(
                    "Episode {}/{} | eps: {:.3} | states: {} | win({}): {:.1}% | draw: {:.1}% | loss: {:.1}% | avg_len: {:.1}",
                    episode,
                    end_episode,
                    agent.config().epsilon,
                    agent.states_learned(),
                    window,
                    metrics.win_rate(window) * 100.0,
                    metrics.draw_rate(window) * 100.0,
                    metrics.loss_rate(window) * 100.0,
                    metrics.average_game_length(window),
                );
            }

            if self.config.eval_interval > 0 && episode % self.config.eval_interval == 0 {
                let report = self.evaluate(agent, episode)?;
                println!(
                    "  >> Eval vs {} ({} games): {:.1}% win, {:.1}% draw",
                    opponent.name(),
                    report.games,
                    report.win_rate * 100.0,
                    report.draw_rate * 100.0
                );
            }
        }

        println!("-------------------------------------------");
        println!(
            "Training complete. Total episodes: {}",
            metrics.total_episodes()
        );

        let final_eval = self.evaluate(agent, end_episode + 1)?;
        println!(
            "Final eval: {:.1}% win, {:.1}% draw, {:.1}% loss",
            final_eval.win_rate * 100.0,
            final_eval.draw_rate * 100.0,
            final_eval.loss_rate * 100.0
        );

        Ok(TrainingSummary {
            episodes: metrics.total_episodes(),
            states_learned: agent.states_learned(),
            final_eval,
        })
    }

    /// Greedy games against a fresh opponent, alternating who moves first.
    /// The table is left untouched.
    pub fn evaluate(
        &self,
        agent: &mut QLearningAgent,
        episode: usize,
    ) -> Result<EvalReport, TrainingError> {
        let seed = self.config.seed.map(|s| episode_seed(s, episode));
        let mut opponent = build_opponent(self.config.opponent, seed);
        let games = self.config.eval_games;
        let mut tally = [0usize; 3];

        for game in 0..games {
            agent.reset_episode();
            let agent_side = if game % 2 == 0 { Mark::X } else { Mark::O };
            let result = play_eval_game::<Board>(agent, opponent.as_mut(), agent_side, Mark::X)?;
            let slot = match result.result {
                AgentResult::Win => 0,
                AgentResult::Draw => 1,
                AgentResult::Loss => 2,
            };
            tally[slot] += 1;
        }

        if games == 0 {
            return Ok(EvalReport::default());
        }
        let rate = |n: usize| n as f32 / games as f32;
        let report = EvalReport {
            games,
            win_rate: rate(tally[0]),
            draw_rate: rate(tally[1]),
            loss_rate: rate(tally[2]),
        };
        debug!(episode, ?report, "evaluation finished");
        Ok(report)
    }
}
