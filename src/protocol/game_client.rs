//! Plays one game over a joined connection.
//!
//! The first memento sets up the engine's position. After that every memento
//! reports one move, ours included, and the engine follows along; move
//! requests are answered from the engine's current position.

use std::io::{Read, Write};

use log::{error, info, warn};

use crate::engines::engine_trait::{Engine, MoveRequest};
use crate::errors::ClientError;
use crate::game_state::game_types::Team;
use crate::protocol::connection::Connection;
use crate::protocol::room_message::RoomMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEnd {
    /// The server announced the result; `None` is a draw.
    Result { winner: Option<Team> },
    /// The server reported an error and ended the game.
    Error { message: String },
}

pub fn play_game<S: Read + Write>(
    connection: &mut Connection<S>,
    engine: &mut dyn Engine,
) -> Result<GameEnd, ClientError> {
    info!("{} playing in room {}", engine.name(), connection.room_id());

    loop {
        let packet = connection.receive_room_packet()?;
        match packet.message {
            RoomMessage::Memento(memento) => {
                engine.new_game(memento.game_state);
                break;
            }
            other => {
                if let Some(end) = handle_common(other) {
                    return Ok(end);
                }
            }
        }
    }

    loop {
        let packet = connection.receive_room_packet()?;
        match packet.message {
            RoomMessage::MoveRequest => {
                let request = MoveRequest {
                    received_at: packet.received_at,
                };
                let output = engine.choose_move(&request)?;
                connection.send_move(output.best_move)?;
                info!(
                    "sent {} after {}ms",
                    output.best_move,
                    packet.received_at.elapsed().as_millis()
                );
            }
            RoomMessage::Memento(memento) => match memento.last_move {
                Some(mv) => engine.apply_move(mv)?,
                None => {
                    warn!("memento without a last move, restarting from it");
                    engine.new_game(memento.game_state);
                }
            },
            other => {
                if let Some(end) = handle_common(other) {
                    return Ok(end);
                }
            }
        }
    }
}

/// Messages that mean the same in every phase. Returns the end of the game
/// when the message ends it.
fn handle_common(message: RoomMessage) -> Option<GameEnd> {
    match message {
        RoomMessage::Welcome { team } => {
            info!("playing as team {team:?}");
            None
        }
        RoomMessage::Result { winner } => {
            match winner {
                Some(team) => info!("winner: team {team:?}"),
                None => info!("the game is a draw"),
            }
            Some(GameEnd::Result { winner })
        }
        RoomMessage::Error { message } => {
            error!("server error: {message}");
            Some(GameEnd::Error { message })
        }
        RoomMessage::Other { class } => {
            warn!("ignoring room message {class:?}");
            None
        }
        RoomMessage::MoveRequest => {
            warn!("move request before the starting position");
            None
        }
        RoomMessage::Memento(_) => None,
    }
}
