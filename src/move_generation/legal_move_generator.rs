//! Legal move generation.
//!
//! Moves come out in board-scan order with no sorting; ordering is the
//! search's job. A destination is legal unless the mover's own team holds it.

use crate::game_state::game_types::*;

/// Direction offsets on the raw square index.
const DOWN: i8 = 1;
const UP: i8 = -1;
const RIGHT: i8 = 8;
const LEFT: i8 = -8;

/// All legal moves for the side to move.
pub fn generate_legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    generate_legal_moves_into(game_state, &mut moves);
    moves
}

/// Append all legal moves for the side to move to `out`.
pub fn generate_legal_moves_into(game_state: &GameState, out: &mut Vec<Move>) {
    let team = game_state.side_to_move();

    for (from, piece) in game_state.pieces() {
        if piece.team != team {
            continue;
        }
        match piece.kind {
            PieceKind::Shell => generate_shell_moves(game_state, team, from, out),
            PieceKind::Gull => generate_gull_moves(game_state, team, from, out),
            PieceKind::Star => generate_star_moves(game_state, team, from, out),
            PieceKind::Crab => generate_crab_moves(game_state, team, from, out),
        }
    }
}

/// Whether `mv` is a move of the side to move onto a square it does not hold.
/// Cheap shape check for moves coming from outside move generation.
pub fn is_legal_move(game_state: &GameState, mv: Move) -> bool {
    if mv.from == mv.to || !game_state.field(mv.from).is_owned_by(game_state.side_to_move()) {
        return false;
    }
    generate_legal_moves(game_state).contains(&mv)
}

#[inline]
fn push_if_free(
    game_state: &GameState,
    team: Team,
    from: Position,
    delta: i8,
    out: &mut Vec<Move>,
) {
    let to = from.offset(delta);
    if !game_state.field(to).is_owned_by(team) {
        out.push(Move::new(from, to));
    }
}

fn generate_shell_moves(game_state: &GameState, team: Team, from: Position, out: &mut Vec<Move>) {
    debug_assert_ne!(from.x(), team.opponent_baseline(), "shell on opponent baseline");
    let forward = team.forward();
    if from.y() < 7 {
        push_if_free(game_state, team, from, forward + DOWN, out);
    }
    if from.y() > 0 {
        push_if_free(game_state, team, from, forward + UP, out);
    }
}

fn generate_gull_moves(game_state: &GameState, team: Team, from: Position, out: &mut Vec<Move>) {
    if from.x() < 7 {
        push_if_free(game_state, team, from, RIGHT, out);
    }
    if from.x() > 0 {
        push_if_free(game_state, team, from, LEFT, out);
    }
    if from.y() < 7 {
        push_if_free(game_state, team, from, DOWN, out);
    }
    if from.y() > 0 {
        push_if_free(game_state, team, from, UP, out);
    }
}

fn generate_star_moves(game_state: &GameState, team: Team, from: Position, out: &mut Vec<Move>) {
    debug_assert_ne!(from.x(), team.opponent_baseline(), "star on opponent baseline");
    push_if_free(game_state, team, from, team.forward(), out);
    if from.x() < 7 {
        if from.y() < 7 {
            push_if_free(game_state, team, from, RIGHT + DOWN, out);
        }
        if from.y() > 0 {
            push_if_free(game_state, team, from, RIGHT + UP, out);
        }
    }
    if from.x() > 0 {
        if from.y() < 7 {
            push_if_free(game_state, team, from, LEFT + DOWN, out);
        }
        if from.y() > 0 {
            push_if_free(game_state, team, from, LEFT + UP, out);
        }
    }
}

fn generate_crab_moves(game_state: &GameState, team: Team, from: Position, out: &mut Vec<Move>) {
    let (x, y) = (from.x(), from.y());
    if x < 6 {
        if y < 7 {
            push_if_free(game_state, team, from, 2 * RIGHT + DOWN, out);
        }
        if y > 0 {
            push_if_free(game_state, team, from, 2 * RIGHT + UP, out);
        }
    }
    if x > 1 {
        if y < 7 {
            push_if_free(game_state, team, from, 2 * LEFT + DOWN, out);
        }
        if y > 0 {
            push_if_free(game_state, team, from, 2 * LEFT + UP, out);
        }
    }
    if x < 7 {
        if y < 6 {
            push_if_free(game_state, team, from, RIGHT + 2 * DOWN, out);
        }
        if y > 1 {
            push_if_free(game_state, team, from, RIGHT + 2 * UP, out);
        }
    }
    if x > 0 {
        if y < 6 {
            push_if_free(game_state, team, from, LEFT + 2 * DOWN, out);
        }
        if y > 1 {
            push_if_free(game_state, team, from, LEFT + 2 * UP, out);
        }
    }
}
