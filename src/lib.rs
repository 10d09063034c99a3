//! # Grid Games
//!
//! Connect Four and Tic-Tac-Toe with a small family of computer players:
//! depth-limited minimax (with or without alpha-beta pruning), a
//! win/block/random fallback policy and a tabular Q-learning agent.
//!
//! ## Modules
//!
//! - [`game`]: Rule engines for both boards, the shared `Rules` trait and game state
//! - [`ai`]: Agent trait, evaluators, search, fallback policy, Q-learning
//! - [`session`]: Turn driver for human and computer seats
//! - [`training`]: Q-learning episodes, metrics and the trainer loop
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod training;
