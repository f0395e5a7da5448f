use crate::game_state::game_types::Field;

/// Single undo record for `make_move_in_place` / `unmake_move_in_place`.
///
/// Holds everything a move can overwrite, so restoring it is a plain copy
/// whichever branch the move took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub from: Field,
    pub to: Field,
    pub prev_score: u8,
    pub prev_zobrist_key: u64,
}
