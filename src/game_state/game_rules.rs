//! Rule constants of the game and small rule helpers.
//!
//! A game ends after `TURN_LIMIT` turns or once a team holds `MAX_SCORE`
//! points; both are only checked when team One is about to move.

use crate::game_state::game_types::{PieceKind, Position, Team};

/// Points that end the game.
pub const MAX_SCORE: u8 = 2;

/// Turns that end the game.
pub const TURN_LIMIT: u8 = 60;

/// Highest score a team can hold. A single move earns at most two points and
/// the game is only checked for being over before team One moves, so team Two
/// may overshoot the cap by one.
pub const SCORE_CEILING: u8 = MAX_SCORE + 1;

/// Distance a piece has travelled towards the opponent baseline, in columns.
#[inline]
pub const fn forward_distance(team: Team, position: Position) -> u8 {
    match team {
        Team::One => position.x(),
        Team::Two => 7 - position.x(),
    }
}

/// Whether reaching the opponent baseline with this kind earns a point.
#[inline]
pub const fn scores_on_baseline(kind: PieceKind) -> bool {
    !matches!(kind, PieceKind::Crab)
}
