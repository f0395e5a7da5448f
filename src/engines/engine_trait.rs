//! Engine abstraction layer used by the game client.
//!
//! An engine follows one game: it receives the starting position, every move
//! played afterwards (its own included, in the order the server reports them)
//! and move requests stamped with the instant they arrived.

use std::time::Instant;

use crate::errors::EngineError;
use crate::game_state::game_types::{GameState, Move};
use crate::move_generation::legal_move_generator::is_legal_move;
use crate::search::iterative_deepening::SearchResult;

#[derive(Debug, Clone, Copy)]
pub struct MoveRequest {
    /// Time budgets are measured from here, not from when the engine starts.
    pub received_at: Instant,
}

impl MoveRequest {
    pub fn now() -> Self {
        Self {
            received_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub best_move: Move,
    pub search: Option<SearchResult>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    /// Start following a new game from `game_state`.
    fn new_game(&mut self, game_state: GameState);

    /// Current position, `None` before the first game.
    fn game_state(&self) -> Option<&GameState>;

    /// Play `mv` on the followed position.
    fn apply_move(&mut self, mv: Move) -> Result<(), EngineError>;

    /// Pick a move for the side to move. The position is not changed.
    fn choose_move(&mut self, request: &MoveRequest) -> Result<EngineOutput, EngineError>;
}

/// Shared precondition check for `Engine::apply_move`.
pub fn check_move(game_state: Option<&GameState>, mv: Move) -> Result<(), EngineError> {
    let game_state = game_state.ok_or(EngineError::NoGame)?;
    if game_state.is_over() {
        return Err(EngineError::GameOver);
    }
    if !is_legal_move(game_state, mv) {
        return Err(EngineError::IllegalMove(mv.to_string()));
    }
    Ok(())
}
