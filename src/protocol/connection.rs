//! TCP transport for the room protocol.
//!
//! The stream is one endless `<protocol>` document, so messages are framed by
//! their closing tokens rather than parsed as a whole.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Instant;

use log::{debug, trace};

use crate::errors::ProtocolError;
use crate::game_state::game_types::Move;
use crate::protocol::room_message::{encode_move, parse_room_message, RoomMessage, GAME_TYPE};
use crate::protocol::xml::{escape, parse_document, require_attribute};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 13050;

const READ_CHUNK: usize = 4096;

#[derive(Debug, Clone)]
pub struct RoomPacket {
    /// When the packet finished arriving; move budgets start here.
    pub received_at: Instant,
    pub message: RoomMessage,
}

pub struct Connection<S: Read + Write = TcpStream> {
    stream: S,
    buffer: Vec<u8>,
    room_id: String,
}

impl Connection<TcpStream> {
    /// Connect and join a room, by reservation code when one is given.
    pub fn connect(host: &str, port: u16, reservation: Option<&str>) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        debug!("connected to {host}:{port}");
        Self::join(stream, reservation)
    }
}

impl<S: Read + Write> Connection<S> {
    pub fn join(stream: S, reservation: Option<&str>) -> Result<Self, ProtocolError> {
        let mut connection = Self {
            stream,
            buffer: Vec::new(),
            room_id: String::new(),
        };

        connection.send("<protocol>")?;
        match reservation {
            Some(code) => connection.send(&format!(
                r#"<joinPrepared reservationCode="{}" />"#,
                escape(code)
            ))?,
            None => connection.send(&format!(r#"<join gameType="{GAME_TYPE}"/>"#))?,
        }

        connection.receive_until("<protocol>")?;
        let frame = connection.receive_until("/>")?;
        let doc = parse_document(&frame)?;
        let joined = doc.root_element();
        if !joined.has_tag_name("joined") {
            return Err(ProtocolError::NotJoined);
        }
        connection.room_id = require_attribute(joined, "roomId")?.to_owned();
        debug!("joined room {}", connection.room_id);

        Ok(connection)
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn send(&mut self, data: &str) -> Result<(), ProtocolError> {
        trace!("send {data}");
        self.stream.write_all(data.as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    pub fn send_room_packet(&mut self, data: &str) -> Result<(), ProtocolError> {
        let packet = format!(r#"<room roomId="{}">{data}</room>"#, escape(&self.room_id));
        self.send(&packet)
    }

    pub fn send_move(&mut self, mv: Move) -> Result<(), ProtocolError> {
        self.send_room_packet(&encode_move(mv))
    }

    pub fn receive_room_packet(&mut self) -> Result<RoomPacket, ProtocolError> {
        let data = self.receive_until("</room>")?;
        let received_at = Instant::now();
        Ok(RoomPacket {
            received_at,
            message: parse_room_message(&data)?,
        })
    }

    /// Read until `delimiter` has arrived and return everything up to and
    /// including it. Bytes after the delimiter stay buffered.
    pub fn receive_until(&mut self, delimiter: &str) -> Result<String, ProtocolError> {
        let needle = delimiter.as_bytes();
        let mut searched = 0;

        loop {
            if let Some(found) = find(&self.buffer[searched..], needle) {
                let end = searched + found + needle.len();
                let frame: Vec<u8> = self.buffer.drain(..end).collect();
                let text = String::from_utf8_lossy(&frame).into_owned();
                trace!("received {text}");
                return Ok(text);
            }
            searched = self.buffer.len().saturating_sub(needle.len() - 1);

            let mut chunk = [0u8; READ_CHUNK];
            let read = self.stream.read(&mut chunk)?;
            if read == 0 {
                return Err(ProtocolError::ConnectionClosed(delimiter.to_owned()));
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    /// Leave the room: wait for the server's `<left>`, request the close and
    /// drain whatever the server still sends. A server that hangs up first is
    /// not an error.
    pub fn close(&mut self) -> Result<(), ProtocolError> {
        loop {
            match self.receive_until("/>") {
                Ok(fragment) if fragment.contains("<left") => break,
                Ok(fragment) => debug!("before close: {}", fragment.trim()),
                Err(ProtocolError::ConnectionClosed(_)) => return Ok(()),
                Err(err) => return Err(err),
            }
        }

        self.send("<sc.protocol.CloseConnection/>")?;

        match self.receive_until("</protocol>") {
            Ok(rest) => {
                debug!("protocol end: {}", rest.trim());
                self.send("</protocol>")?;
            }
            Err(ProtocolError::ConnectionClosed(_)) => debug!("protocol end empty"),
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
