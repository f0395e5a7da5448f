//! Crate root module declarations for the Ostsee engine project.
//!
//! This file exposes all top-level subsystems (game state, move generation,
//! search, engines and the server protocol) so the client binary, tests and
//! benchmarks can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod game_rules;
    pub mod game_state;
    pub mod game_types;
    #[cfg(test)]
    pub mod test_positions;
    pub mod undo_state;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_alpha_beta;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod protocol {
    pub mod connection;
    pub mod game_client;
    pub mod room_message;
    #[cfg(test)]
    pub mod scripted_stream;
    pub mod xml;
}
