//! Depth-limited minimax with optional alpha-beta pruning.
//!
//! Both searches run on a single board that is mutated in place; every move
//! tried is undone through [`with_move`] before the next sibling is explored.
//! Scores are always from the perspective of the side to move at the root
//! (the maximizing side). Among equally scored moves the first one in
//! [`Rules::search_order`] is kept.

use tracing::debug;

use super::agent::Agent;
use super::heuristic::{ConnectFourHeuristic, Evaluator, TicTacToeScorer};
use crate::error::{GameError, MoveError};
use crate::game::{connect_four, tictactoe, with_move, GameState, Rules, Side};

/// Best move found by a search and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult<M> {
    pub best_move: M,
    pub score: f64,
    /// Positions visited, including the root.
    pub nodes: u64,
}

/// Plain minimax over every legal move down to `depth` plies (at least one).
pub fn minimax<B, E>(
    board: &B,
    side: B::Side,
    depth: usize,
    evaluator: &E,
) -> Result<SearchResult<B::Move>, GameError>
where
    B: Rules,
    E: Evaluator<B> + ?Sized,
{
    let depth = depth.max(1);
    run(board, side, evaluator, |search, board| {
        search.minimax(board, depth, true)
    })
}

/// Minimax with alpha-beta pruning. Returns the same score and move as
/// [`minimax`] while visiting at most as many positions.
pub fn alpha_beta<B, E>(
    board: &B,
    side: B::Side,
    depth: usize,
    evaluator: &E,
) -> Result<SearchResult<B::Move>, GameError>
where
    B: Rules,
    E: Evaluator<B> + ?Sized,
{
    let depth = depth.max(1);
    run(board, side, evaluator, |search, board| {
        search.alpha_beta(board, depth, f64::NEG_INFINITY, f64::INFINITY, true)
    })
}

fn run<B, E, F>(board: &B, side: B::Side, evaluator: &E, f: F) -> Result<SearchResult<B::Move>, GameError>
where
    B: Rules,
    E: Evaluator<B> + ?Sized,
    F: FnOnce(&mut Search<'_, B, E>, &mut B) -> Result<(Option<B::Move>, f64), MoveError>,
{
    if evaluator.terminal_score(board, side).is_some() {
        return Err(GameError::GameOver);
    }
    if board.legal_moves().is_empty() {
        return Err(GameError::NoLegalMoves);
    }

    let mut scratch = board.clone();
    let mut search = Search {
        evaluator,
        maximizer: side,
        nodes: 0,
    };
    let (best_move, score) = f(&mut search, &mut scratch)?;
    debug_assert_eq!(&scratch, board, "search leaked a move");

    let best_move = best_move.ok_or(GameError::NoLegalMoves)?;
    debug!(?best_move, score, nodes = search.nodes, "search finished");
    Ok(SearchResult {
        best_move,
        score,
        nodes: search.nodes,
    })
}

struct Search<'e, B: Rules, E: ?Sized> {
    evaluator: &'e E,
    maximizer: B::Side,
    nodes: u64,
}

impl<B, E> Search<'_, B, E>
where
    B: Rules,
    E: Evaluator<B> + ?Sized,
{
    /// Terminal or horizon score, if the node should not be expanded.
    fn leaf_score(&mut self, board: &B, depth: usize) -> Option<f64> {
        self.nodes += 1;
        if let Some(score) = self.evaluator.terminal_score(board, self.maximizer) {
            return Some(score);
        }
        if depth == 0 {
            return Some(self.evaluator.evaluate(board, self.maximizer));
        }
        None
    }

    fn mover(&self, maximizing: bool) -> B::Side {
        if maximizing {
            self.maximizer
        } else {
            self.maximizer.other()
        }
    }

    fn minimax(
        &mut self,
        board: &mut B,
        depth: usize,
        maximizing: bool,
    ) -> Result<(Option<B::Move>, f64), MoveError> {
        if let Some(score) = self.leaf_score(board, depth) {
            return Ok((None, score));
        }

        let side = self.mover(maximizing);
        let mut best_move = None;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in board.search_order() {
            let (_, score) = with_move(board, mv, side, |b| self.minimax(b, depth - 1, !maximizing))?;
            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_move = Some(mv);
            }
        }

        Ok((best_move, best_score))
    }

    fn alpha_beta(
        &mut self,
        board: &mut B,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
    ) -> Result<(Option<B::Move>, f64), MoveError> {
        if let Some(score) = self.leaf_score(board, depth) {
            return Ok((None, score));
        }

        let side = self.mover(maximizing);
        let mut best_move = None;
        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in board.search_order() {
            let (_, score) = with_move(board, mv, side, |b| {
                self.alpha_beta(b, depth - 1, alpha, beta, !maximizing)
            })?;
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                break;
            }
        }

        Ok((best_move, best_score))
    }
}

/// Computer player that searches with [`minimax`] or [`alpha_beta`].
pub struct MinimaxAgent<B: Rules> {
    depth: usize,
    pruning: bool,
    evaluator: Box<dyn Evaluator<B>>,
    name: &'static str,
}

impl<B: Rules> MinimaxAgent<B> {
    /// `depth` is clamped to at least one ply.
    pub fn with_evaluator(depth: usize, pruning: bool, evaluator: Box<dyn Evaluator<B>>) -> Self {
        MinimaxAgent {
            depth: depth.max(1),
            pruning,
            evaluator,
            name: if pruning { "Alpha-Beta" } else { "Minimax" },
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn search(&self, board: &B, side: B::Side) -> Result<SearchResult<B::Move>, GameError> {
        if self.pruning {
            alpha_beta(board, side, self.depth, self.evaluator.as_ref())
        } else {
            minimax(board, side, self.depth, self.evaluator.as_ref())
        }
    }
}

impl MinimaxAgent<connect_four::Board> {
    /// Depth-limited search with the window heuristic.
    pub fn connect_four(depth: usize, pruning: bool) -> Self {
        Self::with_evaluator(depth, pruning, Box::new(ConnectFourHeuristic))
    }
}

impl MinimaxAgent<tictactoe::Board> {
    /// Full-depth search with exact terminal scores.
    pub fn tictactoe(pruning: bool) -> Self {
        Self::with_evaluator(tictactoe::CELLS, pruning, Box::new(TicTacToeScorer))
    }
}

impl<B: Rules> Agent<B> for MinimaxAgent<B> {
    fn select_action(&mut self, state: &GameState<B>, _training: bool) -> Result<B::Move, GameError> {
        if state.is_terminal() {
            return Err(GameError::GameOver);
        }
        self.search(state.board(), state.current_player())
            .map(|result| result.best_move)
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::connect_four::{Board, Player, COLS};
    use crate::game::tictactoe::Mark;
    use crate::game::GameOutcome;
    use proptest::prelude::*;

    fn c4_state(moves: &[usize]) -> GameState<Board> {
        let mut state = GameState::<Board>::initial();
        for &col in moves {
            state.apply_move_mut(col).unwrap();
        }
        state
    }

    /// Replay `choices` as indices into the legal moves, stopping before the
    /// game ends.
    fn random_c4_board(choices: &[usize]) -> (Board, Player) {
        let mut state = GameState::<Board>::initial();
        for &choice in choices {
            let legal = state.legal_actions();
            if legal.is_empty() {
                break;
            }
            let next = state.apply_move(legal[choice % legal.len()]).unwrap();
            if next.is_terminal() {
                break;
            }
            state = next;
        }
        (*state.board(), state.current_player())
    }

    fn random_ttt_board(choices: &[usize]) -> (tictactoe::Board, Mark) {
        let mut state = GameState::<tictactoe::Board>::initial();
        for &choice in choices {
            let legal = state.legal_actions();
            if legal.is_empty() {
                break;
            }
            let next = state.apply_move(legal[choice % legal.len()]).unwrap();
            if next.is_terminal() {
                break;
            }
            state = next;
        }
        (*state.board(), state.current_player())
    }

    #[test]
    fn takes_winning_move() {
        // Red has 0,1,2 on the bottom row; Yellow stacked on top
        let state = c4_state(&[0, 0, 1, 1, 2, 2]);
        for pruning in [false, true] {
            let mut agent = MinimaxAgent::connect_four(4, pruning);
            let action = agent.select_action(&state, false).unwrap();
            assert_eq!(action, 3, "Should take winning move at col 3");
        }
        let result = alpha_beta(state.board(), Player::Red, 4, &ConnectFourHeuristic).unwrap();
        assert_eq!(result.score, crate::ai::heuristic::WIN_SCORE);
    }

    #[test]
    fn blocks_opponent_win() {
        // Yellow holds 0,1,2 on the bottom row; Red must play col 3
        let state = c4_state(&[6, 0, 6, 1, 5, 2]);
        for pruning in [false, true] {
            let mut agent = MinimaxAgent::connect_four(4, pruning);
            let action = agent.select_action(&state, false).unwrap();
            assert_eq!(action, 3, "Should block opponent's winning move at col 3");
        }
    }

    #[test]
    fn tictactoe_takes_the_only_win() {
        let x = Some(Mark::X);
        let o = Some(Mark::O);
        // X threatens (0, 1); (1, 2) is O's only winning move
        let board = tictactoe::Board::from_rows([[x, None, x], [o, o, None], [None, x, None]]);
        let plain = minimax(&board, Mark::O, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        let pruned = alpha_beta(&board, Mark::O, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        assert_eq!(plain.best_move, (1, 2));
        assert_eq!(plain.score, 1.0);
        assert_eq!(pruned.best_move, (1, 2));
    }

    #[test]
    fn tictactoe_forced_win_ties_with_immediate_win() {
        let x = Some(Mark::X);
        let o = Some(Mark::O);
        // Blocking at (0, 2) leaves O two winning squares, so it also scores
        // 1.0 and comes first in row-major order
        let board = tictactoe::Board::from_rows([[x, x, None], [o, o, None], [None, None, None]]);
        let result = minimax(&board, Mark::O, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        assert_eq!(result.best_move, (0, 2));
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn tictactoe_empty_board_is_a_draw() {
        let board = tictactoe::Board::new();
        let plain = minimax(&board, Mark::X, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        let pruned = alpha_beta(&board, Mark::X, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        assert_eq!(plain.score, 0.0);
        assert_eq!(pruned.score, 0.0);
        assert_eq!(plain.best_move, pruned.best_move);
        assert!(pruned.nodes < plain.nodes);
    }

    #[test]
    fn first_best_move_wins_ties() {
        // Every first move draws; the first square in row-major order is kept
        let board = tictactoe::Board::new();
        let result = minimax(&board, Mark::X, tictactoe::CELLS, &TicTacToeScorer).unwrap();
        assert_eq!(result.best_move, (0, 0));
    }

    #[test]
    fn depth_one_uses_heuristic() {
        let board = Board::new();
        let result = minimax(&board, Player::Red, 1, &ConnectFourHeuristic).unwrap();
        // Center column is tried first and scores highest
        assert_eq!(result.best_move, 3);
        assert_eq!(result.score, 3.0);
        assert_eq!(result.nodes, 1 + COLS as u64);
    }

    #[test]
    fn search_does_not_mutate_board() {
        let state = c4_state(&[3, 3, 2, 4]);
        let before = *state.board();
        let _ = alpha_beta(state.board(), Player::Red, 4, &ConnectFourHeuristic).unwrap();
        let _ = minimax(state.board(), Player::Red, 3, &ConnectFourHeuristic).unwrap();
        assert_eq!(*state.board(), before);
    }

    #[test]
    fn finished_game_is_rejected() {
        let state = c4_state(&[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(state.outcome(), GameOutcome::Winner(Player::Red));
        assert_eq!(
            alpha_beta(state.board(), Player::Yellow, 4, &ConnectFourHeuristic),
            Err(GameError::GameOver)
        );
        let mut agent = MinimaxAgent::connect_four(4, true);
        assert_eq!(agent.select_action(&state, false), Err(GameError::GameOver));
    }

    #[test]
    fn full_game_vs_self_completes() {
        let mut agent1 = MinimaxAgent::connect_four(3, true);
        let mut agent2 = MinimaxAgent::connect_four(3, true);
        let mut state = GameState::<Board>::initial();
        let mut turn = 0;

        while !state.is_terminal() {
            let action = if turn % 2 == 0 {
                agent1.select_action(&state, false).unwrap()
            } else {
                agent2.select_action(&state, false).unwrap()
            };
            state = state.apply_move(action).unwrap();
            turn += 1;
        }

        assert!(turn <= 42);
    }

    #[test]
    fn tictactoe_perfect_play_never_loses_to_random() {
        for seed in 0..10 {
            let mut search = MinimaxAgent::tictactoe(true);
            let mut random = RandomAgent::with_seed(seed);
            let mut state = GameState::<tictactoe::Board>::initial();
            let search_mark = Mark::ALL[(seed % 2) as usize];

            while !state.is_terminal() {
                let action = if state.current_player() == search_mark {
                    search.select_action(&state, false).unwrap()
                } else {
                    random.select_action(&state, false).unwrap()
                };
                state.apply_move_mut(action).unwrap();
            }

            assert_ne!(state.outcome(), GameOutcome::Winner(search_mark.other()));
        }
    }

    #[test]
    fn beats_random_agent() {
        let games = 10;
        let mut wins = 0;
        for seed in 0..games {
            let mut search = MinimaxAgent::connect_four(4, true);
            let mut random = RandomAgent::with_seed(seed);
            let search_side = Player::ALL[(seed % 2) as usize];
            let mut state = GameState::<Board>::initial();

            while !state.is_terminal() {
                let action = if state.current_player() == search_side {
                    search.select_action(&state, false).unwrap()
                } else {
                    random.select_action(&state, false).unwrap()
                };
                state.apply_move_mut(action).unwrap();
            }

            if state.outcome() == GameOutcome::Winner(search_side) {
                wins += 1;
            }
        }
        assert!(wins >= 8, "search should beat random, won {wins}/{games}");
    }

    #[test]
    fn agent_names() {
        assert_eq!(MinimaxAgent::connect_four(4, false).name(), "Minimax");
        assert_eq!(MinimaxAgent::tictactoe(true).name(), "Alpha-Beta");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn pruning_matches_minimax_connect_four(
            choices in prop::collection::vec(0usize..COLS, 0..20),
            depth in 1usize..=4,
        ) {
            let (board, side) = random_c4_board(&choices);
            let plain = minimax(&board, side, depth, &ConnectFourHeuristic).unwrap();
            let pruned = alpha_beta(&board, side, depth, &ConnectFourHeuristic).unwrap();
            prop_assert_eq!(plain.score, pruned.score);
            prop_assert_eq!(plain.best_move, pruned.best_move);
            prop_assert!(pruned.nodes <= plain.nodes);
        }

        #[test]
        fn pruning_matches_minimax_tictactoe(
            choices in prop::collection::vec(0usize..9, 1..7),
        ) {
            let (board, side) = random_ttt_board(&choices);
            let plain = minimax(&board, side, tictactoe::CELLS, &TicTacToeScorer).unwrap();
            let pruned = alpha_beta(&board, side, tictactoe::CELLS, &TicTacToeScorer).unwrap();
            prop_assert_eq!(plain.score, pruned.score);
            prop_assert_eq!(plain.best_move, pruned.best_move);
        }
    }
}
