use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use grid_games::ai::{FallbackAgent, MinimaxAgent, QLearningAgent, RandomAgent};
use grid_games::config::AppConfig;
use grid_games::error::GameError;
use grid_games::game::connect_four::{self, Player};
use grid_games::game::tictactoe::{self, Mark};
use grid_games::game::{GameOutcome, Rules, Side};
use grid_games::session::{Match, Seat};
use grid_games::training::episode::episode_seed;
use grid_games::training::trainer::Trainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GameKind {
    ConnectFour,
    TicTacToe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Moves typed on stdin
    Human,
    Random,
    /// Win, else block, else random
    Fallback,
    /// Minimax search, pruned unless --no-pruning
    Minimax,
    /// Tabular Q-learning, Tic-Tac-Toe only
    QLearning,
}

/// Play Connect Four or Tic-Tac-Toe in the terminal.
#[derive(Parser)]
#[command(name = "grid-games", about = "Connect Four and Tic-Tac-Toe with search and learning players")]
struct Cli {
    #[arg(long, value_enum, default_value_t = GameKind::ConnectFour)]
    game: GameKind,

    /// Player for the side that moves first (Red / X)
    #[arg(long, value_enum, default_value_t = Policy::Human)]
    first: Policy,

    /// Player for the other side (Yellow / O)
    #[arg(long, value_enum, default_value_t = Policy::Fallback)]
    second: Policy,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for every random choice
    #[arg(long)]
    seed: Option<u64>,

    /// Override the Connect Four search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Search without alpha-beta pruning
    #[arg(long)]
    no_pruning: bool,

    /// Q-learning training episodes before play (0 skips training)
    #[arg(long)]
    train_episodes: Option<usize>,

    /// Let the Q-learning agent keep learning while it plays
    #[arg(long)]
    learn: bool,

    /// Only print game results
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(depth) = cli.depth {
        config.search.connect_four_depth = depth;
    }
    if cli.no_pruning {
        config.search.pruning = false;
    }
    if let Some(seed) = cli.seed {
        config.training.seed = Some(seed);
    }
    config.validate()?;

    match cli.game {
        GameKind::ConnectFour => {
            let seats = [
                connect_four_seat(cli.first, &config, seat_seed(&cli, 0))?,
                connect_four_seat(cli.second, &config, seat_seed(&cli, 1))?,
            ];
            play_games(&cli, Player::Red, seats, parse_column)
        }
        GameKind::TicTacToe => {
            let seats = [
                tictactoe_seat(cli.first, &cli, &config, seat_seed(&cli, 0))?,
                tictactoe_seat(cli.second, &cli, &config, seat_seed(&cli, 1))?,
            ];
            play_games(&cli, Mark::X, seats, parse_square)
        }
    }
}

fn seat_seed(cli: &Cli, seat: usize) -> Option<u64> {
    cli.seed.map(|s| episode_seed(s, seat))
}

fn connect_four_seat(
    policy: Policy,
    config: &AppConfig,
    seed: Option<u64>,
) -> Result<Seat<connect_four::Board>> {
    let seat = match policy {
        Policy::Human => Seat::Human,
        Policy::Random => Seat::computer(random_agent(seed)),
        Policy::Fallback => Seat::computer(fallback_agent(seed)),
        Policy::Minimax => Seat::computer(MinimaxAgent::connect_four(
            config.search.connect_four_depth,
            config.search.pruning,
        )),
        Policy::QLearning => bail!("q-learning is only available for tic-tac-toe"),
    };
    Ok(seat)
}

fn tictactoe_seat(
    policy: Policy,
    cli: &Cli,
    config: &AppConfig,
    seed: Option<u64>,
) -> Result<Seat<tictactoe::Board>> {
    let seat = match policy {
        Policy::Human => Seat::Human,
        Policy::Random => Seat::computer(random_agent(seed)),
        Policy::Fallback => Seat::computer(fallback_agent(seed)),
        Policy::Minimax => Seat::computer(MinimaxAgent::tictactoe(config.search.pruning)),
        Policy::QLearning => {
            let mut agent = match seed {
                Some(seed) => QLearningAgent::with_seed(config.qlearning.clone(), seed),
                None => QLearningAgent::new(config.qlearning.clone()),
            };
            let mut training = config.training.clone();
            if let Some(episodes) = cli.train_episodes {
                training.num_episodes = episodes;
            }
            if training.num_episodes > 0 {
                Trainer::new(training)
                    .train(&mut agent)
                    .context("training q-learning agent")?;
            }
            Seat::computer(agent)
        }
    };
    Ok(seat)
}

fn random_agent(seed: Option<u64>) -> RandomAgent {
    seed.map_or_else(RandomAgent::new, RandomAgent::with_seed)
}

fn fallback_agent(seed: Option<u64>) -> FallbackAgent {
    seed.map_or_else(FallbackAgent::new, FallbackAgent::with_seed)
}

fn parse_column(input: &str) -> Option<usize> {
    input.trim().parse().ok()
}

/// Accepts "row col" or "row,col".
fn parse_square(input: &str) -> Option<tictactoe::Square> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) => Some((row, col)),
        _ => None,
    }
}

fn play_games<B>(
    cli: &Cli,
    first: B::Side,
    seats: [Seat<B>; 2],
    parse: fn(&str) -> Option<B::Move>,
) -> Result<()>
where
    B: Rules + Default + Display,
{
    let mut game = Match::new(first, seats).with_training(cli.learn);
    let mut wins = [0usize; 2];
    let mut draws = 0;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for round in 1..=cli.games {
        game.restart(first);
        if !cli.quiet {
            println!("Game {round}: {}\n", matchup(&game));
            println!("{}\n", game.state().board());
        }

        let outcome = loop {
            let input = if game.is_human_turn() {
                print!("{} to move: ", game.state().current_player());
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    bail!("input closed before the game finished");
                };
                match parse(&line?) {
                    Some(mv) => Some(mv),
                    None => {
                        println!("Could not read a move.");
                        continue;
                    }
                }
            } else {
                None
            };

            let outcome = match game.advance(input) {
                Ok(outcome) => outcome,
                Err(GameError::InvalidMove(err)) if input.is_some() => {
                    println!("{err}");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if !cli.quiet {
                println!("{}\n", game.state().board());
            }
            if outcome.is_terminal() {
                break outcome;
            }
        };

        match outcome {
            GameOutcome::Winner(side) => {
                wins[side.index()] += 1;
                println!("Game {round}: {side} ({}) wins", game.seat(side).label());
            }
            _ => {
                draws += 1;
                println!("Game {round}: draw");
            }
        }
    }

    if cli.games > 1 {
        let [a, b] = B::Side::ALL;
        println!("-------------------------------------------");
        println!(
            "{a} ({}): {} | {b} ({}): {} | draws: {}",
            game.seat(a).label(),
            wins[a.index()],
            game.seat(b).label(),
            wins[b.index()],
            draws
        );
    }
    Ok(())
}

fn matchup<B: Rules>(game: &Match<B>) -> String {
    let [a, b] = B::Side::ALL;
    format!(
        "{a} ({}) vs {b} ({})",
        game.seat(a).label(),
        game.seat(b).label()
    )
}
