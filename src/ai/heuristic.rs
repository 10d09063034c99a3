use crate::game::connect_four::{self, Cell, Player, CENTER_COL, ROWS};
use crate::game::tictactoe::{self, Mark};
use crate::game::{Rules, Side};

/// Scores positions for search, always from `side`'s point of view.
pub trait Evaluator<B: Rules>: Send {
    /// Exact score of a finished position, `None` while the game is ongoing.
    fn terminal_score(&self, board: &B, side: B::Side) -> Option<f64>;

    /// Static score of a non-terminal position at the search horizon.
    fn evaluate(&self, board: &B, side: B::Side) -> f64;
}

/// Score for a position the searching side has already won. Larger than any
/// sum of window scores.
pub const WIN_SCORE: f64 = 100_000_000_000_000.0;
/// Score for a position the opponent has already won.
pub const LOSS_SCORE: f64 = -10_000_000_000_000.0;

const CENTER_WEIGHT: f64 = 3.0;

/// Connect Four heuristic: center-column bonus plus a score for every
/// 4-cell window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    pub fn score_window(own: usize, opp: usize, empty: usize) -> f64 {
        if own == 4 {
            100.0
        } else if own == 3 && empty == 1 {
            5.0
        } else if own == 2 && empty == 2 {
            2.0
        } else if opp == 3 && empty == 1 {
            -4.0
        } else {
            0.0
        }
    }
}

impl Evaluator<connect_four::Board> for ConnectFourHeuristic {
    fn terminal_score(&self, board: &connect_four::Board, side: Player) -> Option<f64> {
        if board.check_win(side) {
            Some(WIN_SCORE)
        } else if board.check_win(side.other()) {
            Some(LOSS_SCORE)
        } else if board.check_draw() {
            Some(0.0)
        } else {
            None
        }
    }

    fn evaluate(&self, board: &connect_four::Board, side: Player) -> f64 {
        let own_cell = side.to_cell();
        let opp_cell = side.other().to_cell();

        let center = (0..ROWS)
            .filter(|&row| board.get(row, CENTER_COL) == own_cell)
            .count();
        let mut score = center as f64 * CENTER_WEIGHT;

        for window in board.windows() {
            let own = window.iter().filter(|&&c| c == own_cell).count();
            let opp = window.iter().filter(|&&c| c == opp_cell).count();
            let empty = window.iter().filter(|&&c| c == Cell::Empty).count();
            score += Self::score_window(own, opp, empty);
        }

        score
    }
}

/// Tic-Tac-Toe is searched to the end, so only finished positions matter:
/// +1 for a win, -1 for a loss, 0 for a draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeScorer;

impl Evaluator<tictactoe::Board> for TicTacToeScorer {
    fn terminal_score(&self, board: &tictactoe::Board, side: Mark) -> Option<f64> {
        if board.check_win(side) {
            Some(1.0)
        } else if board.check_win(side.other()) {
            Some(-1.0)
        } else if board.check_draw() {
            Some(0.0)
        } else {
            None
        }
    }

    fn evaluate(&self, _board: &tictactoe::Board, _side: Mark) -> f64 {
        0.0
    }
}
