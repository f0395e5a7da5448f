//! Recoverable errors of the engine.
//!
//! Only the edges of the crate can fail in a recoverable way: building a
//! state from external data, speaking the room protocol, and driving an
//! engine in the wrong order. Inconsistencies inside search (mismatched
//! make/unmake, moving the wrong team) are bugs and panic instead.

use thiserror::Error;

use crate::game_state::game_types::{PieceKind, Team};

/// Invalid data while constructing a `GameState`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameStateError {
    /// Two pieces were placed on the same square.
    #[error("square {0} is already occupied")]
    SquareOccupied(u8),
    /// The turn counter is past the turn limit.
    #[error("turn {0} is past the turn limit")]
    TurnOutOfRange(u8),
    /// A team holds more points than the game allows.
    #[error("team {team:?} cannot hold {score} points")]
    ScoreOutOfRange { team: Team, score: u8 },
    /// A scoring piece already stands on the baseline it scores on. Such a
    /// piece would have left the board when it arrived.
    #[error("{kind:?} of team {team:?} on its scoring baseline at square {square}")]
    PieceOnScoringBaseline { team: Team, kind: PieceKind, square: u8 },
}

/// Failure to read, interpret or deliver a protocol message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),
    /// The server closed the connection while a message was expected.
    #[error("connection closed while waiting for {0:?}")]
    ConnectionClosed(String),
    #[error("malformed xml: {0}")]
    Xml(#[from] roxmltree::Error),
    /// Well-formed XML that lacks an expected element or attribute.
    #[error("missing {0}")]
    Missing(String),
    /// An attribute carried a value outside its domain.
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: String, value: String },
    #[error("invalid game state: {0}")]
    GameState(#[from] GameStateError),
    /// The server refused to seat the client.
    #[error("server did not confirm the join")]
    NotJoined,
}

/// Engine used out of order or on a position without moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `choose_move` or `apply_move` before `new_game`.
    #[error("no game in progress")]
    NoGame,
    /// The move is not legal in the current position.
    #[error("illegal move {0}")]
    IllegalMove(String),
    /// The side to move has no legal move.
    #[error("no legal moves in the current position")]
    NoLegalMoves,
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
}

/// Failure while playing a game over a connection.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
