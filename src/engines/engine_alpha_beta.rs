//! Iterative-deepening alpha-beta engine.
//!
//! Holds one search session per game so the transposition and history tables
//! carry over from move to move.

use log::info;

use crate::engines::engine_trait::{check_move, Engine, EngineOutput, MoveRequest};
use crate::errors::EngineError;
use crate::game_state::game_types::{GameState, Move};
use crate::search::board_scoring::PieceSquareScorer;
use crate::search::iterative_deepening::{SearchConfig, SearchSession};

pub struct AlphaBetaEngine {
    config: SearchConfig,
    session: Option<SearchSession<PieceSquareScorer>>,
}

impl AlphaBetaEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Engine for AlphaBetaEngine {
    fn name(&self) -> &str {
        "Ostsee AlphaBeta"
    }

    fn new_game(&mut self, game_state: GameState) {
        self.session = Some(SearchSession::new(game_state, PieceSquareScorer, self.config));
    }

    fn game_state(&self) -> Option<&GameState> {
        self.session.as_ref().map(SearchSession::game_state)
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        check_move(self.game_state(), mv)?;
        if let Some(session) = self.session.as_mut() {
            session.apply_move(mv);
        }
        Ok(())
    }

    fn choose_move(&mut self, request: &MoveRequest) -> Result<EngineOutput, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoGame)?;
        if session.game_state().is_over() {
            return Err(EngineError::GameOver);
        }

        let result = session.iterative_deepening(request.received_at);
        let best_move = result.best_move.ok_or(EngineError::NoLegalMoves)?;

        let summary = format!(
            "move {best_move} depth {} score {} nodes {} time {}ms tt {}/{}",
            result.reached_depth,
            result.best_score,
            result.nodes,
            result.elapsed_ms,
            result.tt_stats.hits,
            result.tt_stats.probes,
        );
        info!("turn {}: {summary}", session.game_state().turn);

        Ok(EngineOutput {
            best_move,
            search: Some(result),
            info_lines: vec![summary],
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::AlphaBetaEngine;
    use crate::engines::engine_random::RandomEngine;
    use crate::engines::engine_trait::{Engine, MoveRequest};
    use crate::errors::EngineError;
    use crate::game_state::game_types::*;
    use crate::game_state::test_positions::sample_position;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::iterative_deepening::SearchConfig;

    fn quick_engine() -> AlphaBetaEngine {
        AlphaBetaEngine::new(SearchConfig {
            max_depth: 2,
            time_budget: Duration::from_secs(30),
        })
    }

    #[test]
    fn requests_before_a_game_fail() {
        let mut engine = quick_engine();
        assert!(matches!(
            engine.choose_move(&MoveRequest::now()),
            Err(EngineError::NoGame)
        ));
    }

    #[test]
    fn choosing_does_not_play_the_move() {
        let mut engine = quick_engine();
        engine.new_game(sample_position());

        let output = engine.choose_move(&MoveRequest::now()).expect("move");
        assert!(generate_legal_moves(&sample_position()).contains(&output.best_move));
        assert_eq!(engine.game_state(), Some(&sample_position()));

        engine.apply_move(output.best_move).expect("legal");
        assert_eq!(engine.game_state().map(|s| s.turn), Some(1));
    }

    #[test]
    fn self_play_against_random_reaches_the_end() {
        let mut one = quick_engine();
        let mut two = RandomEngine::seeded(7);
        one.new_game(sample_position());
        two.new_game(sample_position());

        let mut plies = 0;
        loop {
            let Some(side) = one
                .game_state()
                .filter(|s| !s.is_over())
                .map(GameState::side_to_move)
            else {
                break;
            };
            let request = MoveRequest::now();
            let output = match side {
                Team::One => one.choose_move(&request),
                Team::Two => two.choose_move(&request),
            };
            let best = match output {
                Ok(output) => output.best_move,
                Err(EngineError::NoLegalMoves) => break,
                Err(err) => panic!("engine failed: {err}"),
            };
            one.apply_move(best).expect("legal for one");
            two.apply_move(best).expect("legal for two");
            assert_eq!(one.game_state(), two.game_state());
            plies += 1;
        }

        assert!(plies > 0);
        assert!(plies <= 60);
    }
}
