//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine: a flat array of 64
//! fields, the turn counter, both teams' scores and the incremental Zobrist
//! key. Search mutates one instance in place through make/unmake pairs.

use crate::errors::GameStateError;
use crate::game_state::game_rules::{
    forward_distance, scores_on_baseline, MAX_SCORE, SCORE_CEILING, TURN_LIMIT,
};
use crate::game_state::game_types::*;
use crate::search::zobrist::{compute_zobrist_key, piece_key, stacked_key};

/// Scoring pieces never rest on the baseline they score on; move generation
/// relies on it.
fn check_square(position: Position, piece: Piece) -> Result<(), GameStateError> {
    if scores_on_baseline(piece.kind) && position.x() == piece.team.opponent_baseline() {
        return Err(GameStateError::PieceOnScoringBaseline {
            team: piece.team,
            kind: piece.kind,
            square: position.square(),
        });
    }
    Ok(())
}

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: [Field; FIELD_COUNT],
    pub turn: u8,
    /// Indexed by `Team::index`.
    pub score: [u8; 2],
    pub zobrist_key: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::empty()
    }
}

impl GameState {
    /// Empty board, turn zero, no points.
    pub fn empty() -> Self {
        let mut state = Self {
            board: [Field::EMPTY; FIELD_COUNT],
            turn: 0,
            score: [0; 2],
            zobrist_key: 0,
        };
        state.zobrist_key = compute_zobrist_key(&state);
        state
    }

    /// Build a state from externally supplied data, validating ranges.
    pub fn from_parts(
        board: [Field; FIELD_COUNT],
        turn: u8,
        score: [u8; 2],
    ) -> Result<Self, GameStateError> {
        if turn > TURN_LIMIT {
            return Err(GameStateError::TurnOutOfRange(turn));
        }
        for team in Team::ALL {
            if score[team.index()] > SCORE_CEILING {
                return Err(GameStateError::ScoreOutOfRange {
                    team,
                    score: score[team.index()],
                });
            }
        }

        for (square, field) in board.iter().enumerate() {
            if let Some(piece) = field.piece {
                check_square(Position::new(square as u8), piece)?;
            }
        }

        let mut state = Self {
            board,
            turn,
            score,
            zobrist_key: 0,
        };
        state.zobrist_key = compute_zobrist_key(&state);
        Ok(state)
    }

    /// Put a piece on an empty square, keeping the key in sync.
    pub fn place_piece(&mut self, position: Position, field: Field) -> Result<(), GameStateError> {
        let Some(piece) = field.piece else {
            return Ok(());
        };
        if self.board[position.index()].is_occupied() {
            return Err(GameStateError::SquareOccupied(position.square()));
        }
        check_square(position, piece)?;

        self.board[position.index()] = field;
        self.zobrist_key ^= piece_key(position, piece.team, piece.kind);
        if piece.stacked {
            self.zobrist_key ^= stacked_key(position);
        }
        Ok(())
    }

    #[inline]
    pub fn side_to_move(&self) -> Team {
        Team::for_turn(self.turn)
    }

    #[inline]
    pub fn field(&self, position: Position) -> &Field {
        &self.board[position.index()]
    }

    #[inline]
    pub fn score_of(&self, team: Team) -> u8 {
        self.score[team.index()]
    }

    /// The game can only end right before team One moves.
    pub fn is_over(&self) -> bool {
        if self.turn % 2 == 1 {
            return false;
        }
        if self.turn >= TURN_LIMIT {
            return true;
        }
        self.score.iter().any(|&points| points >= MAX_SCORE)
    }

    /// Winner of a finished game, `None` on a draw.
    ///
    /// Ties on points go to the team whose pieces have advanced further,
    /// compared piece by piece from the most advanced one.
    pub fn calc_winner(&self) -> Option<Team> {
        debug_assert!(self.is_over(), "winner requested for a running game");

        let (one, two) = (self.score_of(Team::One), self.score_of(Team::Two));
        if one != two {
            return Some(if one > two { Team::One } else { Team::Two });
        }

        let mut distances = [self.forward_distances(Team::One), self.forward_distances(Team::Two)];
        for list in &mut distances {
            list.sort_unstable_by(|a, b| b.cmp(a));
        }

        distances[0]
            .iter()
            .zip(&distances[1])
            .find(|(a, b)| a != b)
            .map(|(a, b)| if a > b { Team::One } else { Team::Two })
    }

    /// Forward distances of all non-crab pieces of a team, in board order.
    pub fn forward_distances(&self, team: Team) -> Vec<u8> {
        self.pieces()
            .filter(|(_, piece)| piece.team == team && piece.kind != PieceKind::Crab)
            .map(|(position, _)| forward_distance(team, position))
            .collect()
    }

    /// Occupied squares in board order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(square, field)| field.piece.map(|p| (Position::new(square as u8), p)))
    }
}
