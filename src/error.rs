use std::path::PathBuf;

/// A move that the board cannot accept. The board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("cell ({row}, {col}) is out of range")]
    CellOutOfRange { row: usize, col: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },
}

/// Errors raised while advancing a game by one turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("game is already over")]
    GameOver,

    #[error("{side} is played by a human and no move was supplied")]
    MissingInput { side: String },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur during Q-learning training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("game error during training: {0}")]
    Game(#[from] GameError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
