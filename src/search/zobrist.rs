//! Zobrist hashing support for fast position identity.
//!
//! The keys come from a fixed linear-congruential sequence so hashes are
//! identical across runs and machines. The position key is the XOR of the
//! keys of every fact that currently holds; `make_move_in_place` keeps it
//! up to date incrementally and `compute_zobrist_key` exists to verify that.

use std::sync::OnceLock;

use crate::game_state::game_rules::{SCORE_CEILING, TURN_LIMIT};
use crate::game_state::game_types::{PieceKind, Position, Team, FIELD_COUNT};
use crate::game_state::game_state::GameState;

const LCG_MULTIPLIER: u64 = 1_103_515_495;
const LCG_INCREMENT: u64 = 12_345;
const LCG_SEED: u64 = 1;

const SCORE_LEVELS: usize = SCORE_CEILING as usize;
const TURN_KEYS: usize = TURN_LIMIT as usize + 1;

#[derive(Debug)]
struct ZobristTables {
    piece: [[[u64; 4]; 2]; FIELD_COUNT],
    stacked: [u64; FIELD_COUNT],
    /// `score[team][level - 1]`; a score of zero contributes nothing.
    score: [[u64; SCORE_LEVELS]; 2],
    turn: [u64; TURN_KEYS],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut state = LCG_SEED;

    let mut piece = [[[0u64; 4]; 2]; FIELD_COUNT];
    for square in &mut piece {
        for team in square {
            for key in team {
                *key = next_random_u64(&mut state);
            }
        }
    }

    let mut stacked = [0u64; FIELD_COUNT];
    for key in &mut stacked {
        *key = next_random_u64(&mut state);
    }

    let mut score = [[0u64; SCORE_LEVELS]; 2];
    for team in &mut score {
        for key in team {
            *key = next_random_u64(&mut state);
        }
    }

    let mut turn = [0u64; TURN_KEYS];
    for key in &mut turn {
        *key = next_random_u64(&mut state);
    }

    ZobristTables {
        piece,
        stacked,
        score,
        turn,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT);
    *state
}

/// Key for a `(square, team, kind)` occupancy fact.
#[inline]
pub fn piece_key(position: Position, team: Team, kind: PieceKind) -> u64 {
    tables().piece[position.index()][team.index()][kind.index()]
}

/// Key for "the piece on this square is stacked".
#[inline]
pub fn stacked_key(position: Position) -> u64 {
    tables().stacked[position.index()]
}

/// Key for "this team holds exactly `score` points". Zero points has no key.
#[inline]
pub fn score_key(team: Team, score: u8) -> u64 {
    debug_assert!(score <= SCORE_CEILING, "score {score} out of range");
    match score {
        0 => 0,
        level => tables().score[team.index()][usize::from(level) - 1],
    }
}

/// Key for "it is turn `turn`".
#[inline]
pub fn turn_key(turn: u8) -> u64 {
    tables().turn[usize::from(turn)]
}

/// Compute the full position key from scratch.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for (square, field) in game_state.board.iter().enumerate() {
        let Some(piece) = field.piece else {
            continue;
        };
        let position = Position::new(square as u8);
        key ^= piece_key(position, piece.team, piece.kind);
        if piece.stacked {
            key ^= stacked_key(position);
        }
    }

    for team in Team::ALL {
        key ^= score_key(team, game_state.score[team.index()]);
    }

    key ^ turn_key(game_state.turn)
}
