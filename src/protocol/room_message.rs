//! Room messages exchanged with the game server.
//!
//! Incoming packets look like `<room roomId=".."><data class="..">..</data></room>`;
//! the data class selects the message kind. Only the parts the client acts on
//! are decoded.

use roxmltree::Node;

use crate::errors::ProtocolError;
use crate::game_state::game_types::*;
use crate::protocol::xml::{child, parse_document, require_attribute, require_child, text};

/// Game type requested when joining without a reservation.
pub const GAME_TYPE: &str = "swc_2022_ostseeschach";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memento {
    pub game_state: GameState,
    /// Absent in the memento describing the starting position.
    pub last_move: Option<Move>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomMessage {
    Welcome { team: Team },
    Memento(Box<Memento>),
    MoveRequest,
    /// `winner` is `None` on a draw.
    Result { winner: Option<Team> },
    Error { message: String },
    Other { class: String },
}

pub fn parse_room_message(xml: &str) -> Result<RoomMessage, ProtocolError> {
    let doc = parse_document(xml)?;
    let room = doc.root_element();
    if !room.has_tag_name("room") {
        return Err(invalid("root element", room.tag_name().name()));
    }

    let data = require_child(room, "data")?;
    let class = require_attribute(data, "class")?;

    Ok(match class {
        "welcomeMessage" => RoomMessage::Welcome {
            team: parse_team(require_attribute(data, "color")?)?,
        },
        "memento" => {
            let state = require_child(data, "state")?;
            RoomMessage::Memento(Box::new(Memento {
                game_state: parse_game_state(state)?,
                last_move: child(state, "lastMove").map(parse_move).transpose()?,
            }))
        }
        "moveRequest" => RoomMessage::MoveRequest,
        "result" => RoomMessage::Result {
            winner: child(data, "winner")
                .and_then(|winner| winner.attribute("team"))
                .map(parse_team)
                .transpose()?,
        },
        "error" => RoomMessage::Error {
            message: data.attribute("message").unwrap_or_default().to_owned(),
        },
        other => RoomMessage::Other {
            class: other.to_owned(),
        },
    })
}

/// Decode a `<state>` element. Points come from `ambers` when present.
pub fn parse_game_state(state: Node<'_, '_>) -> Result<GameState, ProtocolError> {
    let turn = match state.attribute("turn") {
        Some(raw) => parse_number::<u8>("turn", raw)?,
        None => 0,
    };

    let mut score = [0u8; 2];
    if let Some(ambers) = child(state, "ambers") {
        for entry in ambers.children().filter(|node| node.has_tag_name("entry")) {
            let team = parse_team(text(require_child(entry, "team")?))?;
            score[team.index()] = parse_number("ambers", text(require_child(entry, "int")?))?;
        }
    }

    let mut game_state = GameState::from_parts([Field::EMPTY; FIELD_COUNT], turn, score)?;

    let pieces = require_child(require_child(state, "board")?, "pieces")?;
    for entry in pieces.children().filter(|node| node.has_tag_name("entry")) {
        let position = parse_position(require_child(entry, "coordinates")?)?;
        let piece = require_child(entry, "piece")?;
        let team = parse_team(require_attribute(piece, "team")?)?;
        let kind = parse_piece_kind(require_attribute(piece, "type")?)?;
        let count = match piece.attribute("count") {
            Some(raw) => parse_number::<u8>("count", raw)?,
            None => 1,
        };
        game_state.place_piece(position, Field::occupied_by(team, kind, count > 1))?;
    }

    Ok(game_state)
}

/// Decode a move element holding `<from x y/>` and `<to x y/>`.
pub fn parse_move(element: Node<'_, '_>) -> Result<Move, ProtocolError> {
    let from = parse_position(require_child(element, "from")?)?;
    let to = parse_position(require_child(element, "to")?)?;
    if from == to {
        return Err(invalid(element.tag_name().name(), &format!("null move at {from}")));
    }
    Ok(Move::new(from, to))
}

pub fn encode_move(mv: Move) -> String {
    format!(
        r#"<data class="move"><from x="{}" y="{}"/><to x="{}" y="{}"/></data>"#,
        mv.from.x(),
        mv.from.y(),
        mv.to.x(),
        mv.to.y()
    )
}

pub fn parse_team(raw: &str) -> Result<Team, ProtocolError> {
    match raw {
        "ONE" => Ok(Team::One),
        "TWO" => Ok(Team::Two),
        other => Err(invalid("team", other)),
    }
}

fn parse_piece_kind(raw: &str) -> Result<PieceKind, ProtocolError> {
    match raw {
        "Herzmuschel" => Ok(PieceKind::Shell),
        "Moewe" => Ok(PieceKind::Gull),
        "Seestern" => Ok(PieceKind::Star),
        "Robbe" => Ok(PieceKind::Crab),
        other => Err(invalid("piece type", other)),
    }
}

fn parse_position(element: Node<'_, '_>) -> Result<Position, ProtocolError> {
    let x = parse_coord(require_attribute(element, "x")?)?;
    let y = parse_coord(require_attribute(element, "y")?)?;
    Ok(Position::from_coords(x, y))
}

fn parse_coord(raw: &str) -> Result<u8, ProtocolError> {
    match parse_number::<u8>("coordinate", raw)? {
        coord @ 0..=7 => Ok(coord),
        _ => Err(invalid("coordinate", raw)),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ProtocolError> {
    raw.trim().parse().map_err(|_| invalid(name, raw))
}

fn invalid(name: &str, value: &str) -> ProtocolError {
    ProtocolError::InvalidValue {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}
