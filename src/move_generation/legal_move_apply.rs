//! In-place move application and reversal.
//!
//! A move either lands (capturing whatever stood on the destination) or, if
//! it earns points, converts the moving piece into points and removes it from
//! the board. The Zobrist key is updated fact by fact; unmake restores the
//! saved snapshot verbatim.

use crate::game_state::game_rules::scores_on_baseline;
use crate::game_state::game_types::*;
use crate::search::zobrist::{piece_key, score_key, stacked_key, turn_key};

/// Points a move earns: one for disturbing a stack, one for reaching the
/// opponent baseline with a scoring piece.
pub fn move_points(game_state: &GameState, mv: Move) -> u8 {
    let Some(mover) = game_state.field(mv.from).piece else {
        return 0;
    };
    let target = *game_state.field(mv.to);

    let stack_point = target.is_occupied() && (mover.stacked || target.is_stacked());
    let baseline_point =
        mv.to.x() == mover.team.opponent_baseline() && scores_on_baseline(mover.kind);

    u8::from(stack_point) + u8::from(baseline_point)
}

/// Apply `mv` to `game_state` and return what is needed to undo it.
///
/// Panics (in debug builds) when the move does not belong to the side to move
/// or targets one of its own pieces.
pub fn make_move_in_place(game_state: &mut GameState, mv: Move) -> UndoState {
    debug_assert_ne!(mv.from, mv.to, "null move");

    let team = game_state.side_to_move();
    let from_field = *game_state.field(mv.from);
    let to_field = *game_state.field(mv.to);

    let mover = match from_field.piece {
        Some(piece) if piece.team == team => piece,
        other => panic!("move {mv:?} does not start on a piece of {team:?}: {other:?}"),
    };
    debug_assert!(!to_field.is_owned_by(team), "move {mv:?} captures own piece");

    let undo = UndoState {
        from: from_field,
        to: to_field,
        prev_score: game_state.score[team.index()],
        prev_zobrist_key: game_state.zobrist_key,
    };

    let points = move_points(game_state, mv);
    let mut key = game_state.zobrist_key;

    if let Some(captured) = to_field.piece {
        key ^= piece_key(mv.to, captured.team, captured.kind);
        if captured.stacked {
            key ^= stacked_key(mv.to);
        }
    }

    if points > 0 {
        let old_score = game_state.score[team.index()];
        let new_score = old_score + points;
        key ^= score_key(team, old_score) ^ score_key(team, new_score);
        game_state.score[team.index()] = new_score;
        game_state.board[mv.to.index()] = Field::EMPTY;
    } else {
        let stacked = to_field.is_occupied() || mover.stacked;
        key ^= piece_key(mv.to, team, mover.kind);
        if stacked {
            key ^= stacked_key(mv.to);
        }
        game_state.board[mv.to.index()] = Field::occupied_by(team, mover.kind, stacked);
    }

    key ^= piece_key(mv.from, team, mover.kind);
    if mover.stacked {
        key ^= stacked_key(mv.from);
    }
    game_state.board[mv.from.index()] = Field::EMPTY;

    key ^= turn_key(game_state.turn);
    game_state.turn += 1;
    key ^= turn_key(game_state.turn);

    debug_assert_ne!(key, undo.prev_zobrist_key, "hash unchanged by {mv:?}");
    game_state.zobrist_key = key;
    undo
}

/// Revert `mv`, which must be the last move applied to `game_state`.
pub fn unmake_move_in_place(game_state: &mut GameState, mv: Move, undo: &UndoState) {
    debug_assert_ne!(mv.from, mv.to, "null move");
    debug_assert_ne!(game_state.zobrist_key, undo.prev_zobrist_key, "unmake without make");
    debug_assert!(game_state.turn > 0, "unmake at turn zero");

    game_state.turn -= 1;
    let team = game_state.side_to_move();
    debug_assert!(undo.from.is_owned_by(team), "undo record belongs to the other team");

    game_state.board[mv.from.index()] = undo.from;
    game_state.board[mv.to.index()] = undo.to;
    game_state.score[team.index()] = undo.prev_score;
    game_state.zobrist_key = undo.prev_zobrist_key;
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::test_positions::{place, sample_position};
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::zobrist::compute_zobrist_key;

    fn mv(from: (u8, u8), to: (u8, u8)) -> Move {
        Move::new(
            Position::from_coords(from.0, from.1),
            Position::from_coords(to.0, to.1),
        )
    }

    #[test]
    fn quiet_move_lands_and_advances_turn() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        let before = state.clone();

        let undo = make_move_in_place(&mut state, mv((2, 2), (3, 2)));
        assert_eq!(state.turn, 1);
        assert!(!state.field(Position::from_coords(2, 2)).is_occupied());
        assert_eq!(
            *state.field(Position::from_coords(3, 2)),
            Field::occupied_by(Team::One, PieceKind::Gull, false)
        );
        assert_eq!(state.zobrist_key, compute_zobrist_key(&state));

        unmake_move_in_place(&mut state, mv((2, 2), (3, 2)), &undo);
        assert_eq!(state, before);
    }

    #[test]
    fn capture_of_single_piece_creates_stack() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        place(&mut state, 3, 2, Team::Two, PieceKind::Shell, false);

        assert_eq!(move_points(&state, mv((2, 2), (3, 2))), 0);
        make_move_in_place(&mut state, mv((2, 2), (3, 2)));
        assert_eq!(
            *state.field(Position::from_coords(3, 2)),
            Field::occupied_by(Team::One, PieceKind::Gull, true)
        );
        assert_eq!(state.score, [0, 0]);
        assert_eq!(state.zobrist_key, compute_zobrist_key(&state));
    }

    #[test]
    fn capturing_a_stack_scores_and_removes_the_mover() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        place(&mut state, 3, 2, Team::Two, PieceKind::Shell, true);
        let before = state.clone();

        assert_eq!(move_points(&state, mv((2, 2), (3, 2))), 1);
        let undo = make_move_in_place(&mut state, mv((2, 2), (3, 2)));
        assert_eq!(state.score, [1, 0]);
        assert!(!state.field(Position::from_coords(3, 2)).is_occupied());
        assert!(!state.field(Position::from_coords(2, 2)).is_occupied());
        assert_eq!(state.zobrist_key, compute_zobrist_key(&state));

        unmake_move_in_place(&mut state, mv((2, 2), (3, 2)), &undo);
        assert_eq!(state, before);
    }

    #[test]
    fn stacked_mover_scores_on_capture() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, true);
        place(&mut state, 2, 3, Team::Two, PieceKind::Gull, false);
        assert_eq!(move_points(&state, mv((2, 2), (2, 3))), 1);
    }

    #[test]
    fn stack_moves_with_the_piece_onto_empty_squares() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Star, true);
        make_move_in_place(&mut state, mv((2, 2), (3, 2)));
        assert!(state.field(Position::from_coords(3, 2)).is_stacked());
        assert_eq!(state.zobrist_key, compute_zobrist_key(&state));
    }

    #[test]
    fn reaching_opponent_baseline_scores() {
        let mut state = GameState::empty();
        place(&mut state, 6, 3, Team::One, PieceKind::Shell, false);
        assert_eq!(move_points(&state, mv((6, 3), (7, 4))), 1);

        make_move_in_place(&mut state, mv((6, 3), (7, 4)));
        assert_eq!(state.score, [1, 0]);
        assert!(!state.field(Position::from_coords(7, 4)).is_occupied());
    }

    #[test]
    fn own_baseline_never_scores() {
        let mut state = GameState::empty();
        place(&mut state, 1, 3, Team::One, PieceKind::Gull, false);
        assert_eq!(move_points(&state, mv((1, 3), (0, 3))), 0);

        let mut two = GameState::empty();
        place(&mut two, 1, 3, Team::Two, PieceKind::Gull, false);
        two.turn = 1;
        assert_eq!(move_points(&two, mv((1, 3), (0, 3))), 1);
    }

    #[test]
    fn crab_on_baseline_does_not_score() {
        let mut state = GameState::empty();
        place(&mut state, 5, 3, Team::One, PieceKind::Crab, false);
        assert_eq!(move_points(&state, mv((5, 3), (7, 4))), 0);
    }

    #[test]
    fn stack_capture_on_baseline_earns_two_points() {
        let mut state = GameState::empty();
        place(&mut state, 6, 3, Team::One, PieceKind::Star, false);
        place(&mut state, 7, 3, Team::Two, PieceKind::Gull, true);
        assert_eq!(move_points(&state, mv((6, 3), (7, 3))), 2);

        make_move_in_place(&mut state, mv((6, 3), (7, 3)));
        assert_eq!(state.score, [2, 0]);
        assert_eq!(state.zobrist_key, compute_zobrist_key(&state));
    }

    #[test]
    fn random_playouts_keep_hash_and_undo_exact() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..50 {
            let mut state = sample_position();
            let mut history = Vec::new();

            while !state.is_over() {
                let moves = generate_legal_moves(&state);
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                let snapshot = state.clone();
                let undo = make_move_in_place(&mut state, mv);
                assert_eq!(state.zobrist_key, compute_zobrist_key(&state));

                // every sibling must round-trip too
                for &other in &moves {
                    let mut probe = snapshot.clone();
                    let other_undo = make_move_in_place(&mut probe, other);
                    unmake_move_in_place(&mut probe, other, &other_undo);
                    assert_eq!(probe, snapshot);
                }

                history.push((mv, undo, snapshot));
            }

            while let Some((mv, undo, snapshot)) = history.pop() {
                unmake_move_in_place(&mut state, mv, &undo);
                assert_eq!(state, snapshot);
            }
            assert_eq!(state, sample_position());
        }
    }

    #[test]
    #[should_panic]
    fn moving_the_opponents_piece_panics() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::Two, PieceKind::Gull, false);
        make_move_in_place(&mut state, mv((2, 2), (3, 2)));
    }
}
