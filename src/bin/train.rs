use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grid_games::ai::QLearningAgent;
use grid_games::config::AppConfig;
use grid_games::training::trainer::{OpponentKind, StartPolicy, Trainer};

/// Train a Tic-Tac-Toe Q-learning agent against a fixed opponent.
#[derive(Parser)]
#[command(name = "train", about = "Train a Tic-Tac-Toe Q-learning agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the training opponent
    #[arg(long, value_enum)]
    opponent: Option<OpponentKind>,

    /// Override which side the agent takes
    #[arg(long, value_enum)]
    agent_starts: Option<StartPolicy>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Override exploration rate
    #[arg(long)]
    epsilon: Option<f64>,

    /// Seed for the agent and its opponents
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(opponent) = cli.opponent {
        app_config.training.opponent = opponent;
    }
    if let Some(agent_starts) = cli.agent_starts {
        app_config.training.agent_starts = agent_starts;
    }
    if let Some(lr) = cli.lr {
        app_config.qlearning.learning_rate = lr;
    }
    if let Some(epsilon) = cli.epsilon {
        app_config.qlearning.epsilon = epsilon;
    }
    if let Some(seed) = cli.seed {
        app_config.training.seed = Some(seed);
    }
    app_config
        .validate()
        .context("invalid configuration after overrides")?;

    let mut agent = match app_config.training.seed {
        Some(seed) => QLearningAgent::with_seed(app_config.qlearning.clone(), seed),
        None => QLearningAgent::new(app_config.qlearning.clone()),
    };

    let trainer = Trainer::new(app_config.training.clone());
    let summary = trainer.train(&mut agent).context("training failed")?;

    println!(
        "Learned {} states over {} episodes.",
        summary.states_learned, summary.episodes
    );
    Ok(())
}
