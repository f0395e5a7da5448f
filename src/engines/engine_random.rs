//! Random-move engine.
//!
//! Selects uniformly from legal moves. Used as a sparring partner in tests and
//! for smoke-testing a server connection.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{check_move, Engine, EngineOutput, MoveRequest};
use crate::errors::EngineError;
use crate::game_state::game_types::{GameState, Move};
use crate::move_generation::legal_move_apply::make_move_in_place;
use crate::move_generation::legal_move_generator::generate_legal_moves;

pub struct RandomEngine {
    rng: StdRng,
    game_state: Option<GameState>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            game_state: None,
        }
    }

    /// Reproducible move sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            game_state: None,
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Ostsee Random"
    }

    fn new_game(&mut self, game_state: GameState) {
        self.game_state = Some(game_state);
    }

    fn game_state(&self) -> Option<&GameState> {
        self.game_state.as_ref()
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        check_move(self.game_state.as_ref(), mv)?;
        if let Some(game_state) = self.game_state.as_mut() {
            make_move_in_place(game_state, mv);
        }
        Ok(())
    }

    fn choose_move(&mut self, _request: &MoveRequest) -> Result<EngineOutput, EngineError> {
        let game_state = self.game_state.as_ref().ok_or(EngineError::NoGame)?;
        if game_state.is_over() {
            return Err(EngineError::GameOver);
        }

        let legal_moves = generate_legal_moves(game_state);
        let best_move = *legal_moves
            .choose(&mut self.rng)
            .ok_or(EngineError::NoLegalMoves)?;

        Ok(EngineOutput {
            best_move,
            search: None,
            info_lines: vec![format!("random pick among {} moves", legal_moves.len())],
        })
    }
}
