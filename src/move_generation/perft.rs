//! Perft node counting over make/unmake, used to validate and benchmark
//! move generation. Finished games are leaves regardless of remaining depth.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{
    make_move_in_place, move_points, unmake_move_in_place,
};
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub scoring_moves: u64,
    pub finished_games: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.scoring_moves += rhs.scoring_moves;
        self.finished_games += rhs.finished_games;
    }
}

/// Count positions reachable in exactly `depth` moves, plus finished games
/// reached earlier.
pub fn perft(game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 || game_state.is_over() {
        return PerftCounts {
            nodes: 1,
            finished_games: u64::from(game_state.is_over()),
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generate_legal_moves(game_state) {
        if depth == 1 {
            total.captures += u64::from(game_state.field(mv.to).is_occupied());
            total.scoring_moves += u64::from(move_points(game_state, mv) > 0);
        }

        let undo = make_move_in_place(game_state, mv);
        total.merge(perft(game_state, depth - 1));
        unmake_move_in_place(game_state, mv, &undo);
    }

    total
}
