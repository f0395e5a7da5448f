//! Core value types shared by the board, move generation and search.
//!
//! Everything here is a small `Copy` record; the board is a flat array of
//! [`Field`]s and squares are plain indices into it.

use std::fmt;

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Number of squares on the board.
pub const FIELD_COUNT: usize = 64;

/// Side of the board. `One` moves on even turns, `Two` on odd turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::One, Team::Two];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }

    /// Team whose turn it is at the given turn number.
    #[inline]
    pub const fn for_turn(turn: u8) -> Self {
        if turn % 2 == 0 {
            Team::One
        } else {
            Team::Two
        }
    }

    /// Column step that moves a piece of this team forward.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Team::One => 8,
            Team::Two => -8,
        }
    }

    /// Column of the opponent's baseline, i.e. the scoring edge for this team.
    #[inline]
    pub const fn opponent_baseline(self) -> u8 {
        match self {
            Team::One => 7,
            Team::Two => 0,
        }
    }
}

/// Piece kinds. The crab is the only kind that neither scores on the opponent
/// baseline nor counts for forward progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Herzmuschel: one step diagonally forward.
    Shell,
    /// Moewe: one orthogonal step.
    Gull,
    /// Seestern: straight forward or any diagonal.
    Star,
    /// Robbe: knight jumps.
    Crab,
}

impl PieceKind {
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Shell,
        PieceKind::Gull,
        PieceKind::Star,
        PieceKind::Crab,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Shell => 0,
            PieceKind::Gull => 1,
            PieceKind::Star => 2,
            PieceKind::Crab => 3,
        }
    }
}

/// Board index in `0..64`: `column * 8 + row`.
///
/// The column is the forward axis (team One advances towards column 7), the
/// row is the lateral axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position(u8);

impl Position {
    #[inline]
    pub const fn new(square: u8) -> Self {
        debug_assert!(square < FIELD_COUNT as u8);
        Self(square)
    }

    #[inline]
    pub const fn from_coords(x: u8, y: u8) -> Self {
        debug_assert!(x < 8 && y < 8);
        Self(x << 3 | y)
    }

    #[inline]
    pub const fn square(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column, the forward axis.
    #[inline]
    pub const fn x(self) -> u8 {
        self.0 >> 3
    }

    /// Row, the lateral axis.
    #[inline]
    pub const fn y(self) -> u8 {
        self.0 & 7
    }

    /// Square reached by adding a raw index offset. Callers bound-check with
    /// coordinates first.
    #[inline]
    pub const fn offset(self, delta: i8) -> Self {
        Self::new((self.0 as i8 + delta) as u8)
    }
}

/// A move between two squares. Two moves are equal iff their endpoints are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    #[inline]
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One board cell. An empty field carries no team, kind or stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Field {
    pub piece: Option<Piece>,
}

/// The occupant of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub team: Team,
    pub kind: PieceKind,
    /// Two pieces merged here; the field is worth a point when next disturbed.
    pub stacked: bool,
}

impl Field {
    pub const EMPTY: Field = Field { piece: None };

    #[inline]
    pub const fn occupied_by(team: Team, kind: PieceKind, stacked: bool) -> Self {
        Self {
            piece: Some(Piece {
                team,
                kind,
                stacked,
            }),
        }
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.piece.is_some()
    }

    #[inline]
    pub fn is_owned_by(&self, team: Team) -> bool {
        matches!(self.piece, Some(piece) if piece.team == team)
    }

    #[inline]
    pub fn is_stacked(&self) -> bool {
        matches!(self.piece, Some(piece) if piece.stacked)
    }
}
