//! Turn driver: one call to [`Match::advance`] plays one move for whichever
//! side is to move and reports the resulting outcome.

use tracing::debug;

use crate::ai::Agent;
use crate::error::GameError;
use crate::game::{GameOutcome, GameState, Rules, Side};

/// Who plays a side.
pub enum Seat<B: Rules> {
    /// Moves come from the input source through [`Match::advance`].
    Human,
    Computer(Box<dyn Agent<B>>),
}

impl<B: Rules> Seat<B> {
    pub fn computer(agent: impl Agent<B> + 'static) -> Self {
        Seat::Computer(Box::new(agent))
    }

    pub fn label(&self) -> &str {
        match self {
            Seat::Human => "Human",
            Seat::Computer(agent) => agent.name(),
        }
    }
}

/// A single game between two seats.
pub struct Match<B: Rules> {
    state: GameState<B>,
    seats: [Seat<B>; 2],
    history: Vec<B::Move>,
    training: bool,
}

impl<B: Rules + Default> Match<B> {
    /// `seats` is indexed by [`Side::index`].
    pub fn new(first: B::Side, seats: [Seat<B>; 2]) -> Self {
        Match {
            state: GameState::starting_with(first),
            seats,
            history: Vec::new(),
            training: false,
        }
    }

    /// Clear the board and start again with `first` to move.
    pub fn restart(&mut self, first: B::Side) {
        self.state = GameState::starting_with(first);
        self.history.clear();
    }
}

impl<B: Rules> Match<B> {
    /// Let learning agents explore and update during play.
    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }

    pub fn state(&self) -> &GameState<B> {
        &self.state
    }

    pub fn seat(&self, side: B::Side) -> &Seat<B> {
        &self.seats[side.index()]
    }

    pub fn history(&self) -> &[B::Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<B::Move> {
        self.history.last().copied()
    }

    pub fn is_human_turn(&self) -> bool {
        matches!(self.seat(self.state.current_player()), Seat::Human)
    }

    /// Play one move. Human seats take `input`; computer seats ignore it and
    /// ask their agent. A rejected move leaves the game unchanged.
    pub fn advance(&mut self, input: Option<B::Move>) -> Result<GameOutcome<B::Side>, GameError> {
        if self.state.is_terminal() {
            return Err(GameError::GameOver);
        }

        let side = self.state.current_player();
        let mv = match &mut self.seats[side.index()] {
            Seat::Human => input.ok_or_else(|| GameError::MissingInput {
                side: side.to_string(),
            })?,
            Seat::Computer(agent) => agent.select_action(&self.state, self.training)?,
        };

        let outcome = self.state.apply_move_mut(mv)?;
        self.history.push(mv);
        debug!(%side, ?mv, ?outcome, "move played");

        if outcome.is_terminal() {
            for seat_side in B::Side::ALL {
                if let Seat::Computer(agent) = &mut self.seats[seat_side.index()] {
                    agent.observe_outcome(outcome, seat_side, self.training);
                }
            }
        }

        Ok(outcome)
    }

    /// Advance until the game ends. Fails on the first human turn.
    pub fn play_out(&mut self) -> Result<GameOutcome<B::Side>, GameError> {
        loop {
            let outcome = self.advance(None)?;
            if outcome.is_terminal() {
                return Ok(outcome);
            }
        }
    }
}
