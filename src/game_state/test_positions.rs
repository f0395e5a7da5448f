//! Shared board fixtures for unit tests.

use crate::game_state::game_types::*;

pub fn place(state: &mut GameState, x: u8, y: u8, team: Team, kind: PieceKind, stacked: bool) {
    state
        .place_piece(Position::from_coords(x, y), Field::occupied_by(team, kind, stacked))
        .expect("square should be free");
}

/// Both baselines fully occupied, mirrored, every kind twice per team.
pub fn sample_position() -> GameState {
    let mut state = GameState::empty();
    let kinds = [
        PieceKind::Shell,
        PieceKind::Gull,
        PieceKind::Star,
        PieceKind::Crab,
        PieceKind::Crab,
        PieceKind::Star,
        PieceKind::Gull,
        PieceKind::Shell,
    ];
    for (y, kind) in kinds.into_iter().enumerate() {
        place(&mut state, 0, y as u8, Team::One, kind, false);
        place(&mut state, 7, 7 - y as u8, Team::Two, kind, false);
    }
    state
}
