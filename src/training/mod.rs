//! Q-learning training: episode play, rolling metrics and the trainer loop.

pub mod episode;
pub mod metrics;
pub mod trainer;
