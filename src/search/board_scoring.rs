//! Pluggable board evaluation interfaces and the baseline implementation.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::game_rules::forward_distance;
use crate::game_state::game_types::*;

/// Score of a won game before material and positional terms.
pub const WINNING_SCORE: i32 = 10_000;

/// Weight of one point of score difference; dominates positional terms.
pub const SCORE_WEIGHT: i32 = 2_000;

/// Bonus for a stacked piece.
pub const STACKED_BONUS: i32 = 1;

pub trait BoardScorer {
    /// Score from the perspective of the side to move. `is_over` adds the
    /// win/loss term for finished games.
    fn score(&self, game_state: &GameState, is_over: bool) -> i32;
}

/// Piece-square values from team One's point of view, one row of eight per
/// column, column 7 being the opponent baseline.
#[rustfmt::skip]
const PIECE_SQUARE_TABLE: [[i32; FIELD_COUNT]; 4] = [
    // shell
    [ 0,  1,  3,  1,  1,  3,  1,  0,
     -2,  1,  1,  1,  1,  1,  1, -2,
      1,  2,  2,  2,  2,  2,  2,  1,
      4,  5,  7,  5,  5,  7,  5,  4,
      9,  5,  9,  6,  6,  9,  5,  9,
     16, 12,  8, 10, 10,  8, 12, 16,
     14, 21, 27, 33, 33, 27, 21, 14,
      0,  0,  0,  0,  0,  0,  0,  0],
    // gull
    [-1,  1,  0,  0,  0,  0,  1, -1,
      0,  3,  3,  2,  2,  3,  3,  0,
      2,  3,  4,  3,  3,  4,  3,  2,
      4,  5,  8,  5,  5,  8,  5,  4,
      8,  8,  5,  9,  9,  5,  8,  8,
     11,  9, 12,  4,  4, 12,  9, 11,
     12, 27, 26, 13, 13, 26, 27, 12,
      0,  0,  0,  0,  0,  0,  0,  0],
    // star
    [ 0,  0,  1,  0,  0,  1,  0,  0,
      0,  3,  1,  2,  2,  1,  3,  0,
      4,  5,  5,  5,  5,  5,  5,  4,
      5,  8,  8,  8,  8,  8,  8,  5,
      9, 11, 11, 11, 11, 11, 11,  9,
     14, 14, 13, 13, 13, 13, 14, 14,
     24, 23, 23, 21, 21, 23, 23, 24,
      0,  0,  0,  0,  0,  0,  0,  0],
    // crab
    [ 2,  4,  4,  4,  4,  4,  4,  2,
      2,  3,  3,  3,  3,  3,  3,  2,
      3,  4,  8,  6,  6,  8,  4,  3,
      5,  5,  6,  7,  7,  6,  5,  5,
      5,  7,  7,  7,  7,  7,  7,  5,
      5, 10,  8, 10, 10,  8, 10,  5,
      7,  6,  9,  8,  8,  9,  6,  7,
      4,  5,  5,  7,  7,  5,  5,  4],
];

/// Score difference, forward race and piece-square tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    /// Table value of a piece, signed for team One.
    #[inline]
    pub fn piece_square_value(position: Position, piece: Piece) -> i32 {
        match piece.team {
            Team::One => PIECE_SQUARE_TABLE[piece.kind.index()][position.index()],
            Team::Two => {
                let mirrored = Position::from_coords(7 - position.x(), position.y());
                -PIECE_SQUARE_TABLE[piece.kind.index()][mirrored.index()]
            }
        }
    }

    /// Difference between both teams' most advanced non-crab piece.
    pub fn race_value(game_state: &GameState) -> i32 {
        let mut max_distance = [0i32; 2];
        for (position, piece) in game_state.pieces() {
            if piece.kind == PieceKind::Crab {
                continue;
            }
            let distance = i32::from(forward_distance(piece.team, position));
            let slot = &mut max_distance[piece.team.index()];
            *slot = (*slot).max(distance);
        }
        max_distance[0] - max_distance[1]
    }

    fn winner_value(game_state: &GameState) -> i32 {
        match game_state.calc_winner() {
            Some(Team::One) => WINNING_SCORE,
            Some(Team::Two) => -WINNING_SCORE,
            None => 0,
        }
    }

    /// Full evaluation from team One's point of view.
    pub fn team_one_score(game_state: &GameState, is_over: bool) -> i32 {
        let mut value = 0;

        if is_over {
            value += Self::winner_value(game_state);
        }

        value += (i32::from(game_state.score_of(Team::One))
            - i32::from(game_state.score_of(Team::Two)))
            * SCORE_WEIGHT;
        value += Self::race_value(game_state);

        for (position, piece) in game_state.pieces() {
            value += Self::piece_square_value(position, piece);
            if piece.stacked {
                value += match piece.team {
                    Team::One => STACKED_BONUS,
                    Team::Two => -STACKED_BONUS,
                };
            }
        }

        value
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, game_state: &GameState, is_over: bool) -> i32 {
        let value = Self::team_one_score(game_state, is_over);
        match game_state.side_to_move() {
            Team::One => value,
            Team::Two => -value,
        }
    }
}
