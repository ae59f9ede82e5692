//! Room registry
//!
//! Owns the live set of rooms and the connection→room index. The registry
//! is a plain value handed to the relay hub (no globals, no locks), so
//! tests can drive it without a transport.

use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use shared::Color;

/// Identifier for one connected client.
pub type ConnId = Uuid;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

/// A game room with up to two players and their seat colors.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    pub players: Vec<ConnId>,
    pub colors: HashMap<ConnId, Color>,
}

impl Room {
    /// The member that is not `conn`, if both seats are filled.
    pub fn other_member(&self, conn: ConnId) -> Option<ConnId> {
        self.players.iter().copied().find(|&p| p != conn)
    }
}

/// Reasons a join can be refused. Surfaced to the offending client as a
/// plain error message string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("Room not found")]
    NotFound,
    #[error("Room is full")]
    Full,
}

/// All live rooms plus a reverse index from connection to room code.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    conn_to_room: HashMap<ConnId, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a room with a fresh unique code and seat the creator with
    /// their preferred color (default white).
    pub fn create_room(&mut self, conn: ConnId, preferred: Option<Color>) -> (String, Color) {
        let code = self.generate_code();
        let color = preferred.unwrap_or(Color::White);

        let mut colors = HashMap::new();
        colors.insert(conn, color);
        self.rooms.insert(
            code.clone(),
            Room {
                code: code.clone(),
                players: vec![conn],
                colors,
            },
        );
        self.conn_to_room.insert(conn, code.clone());
        (code, color)
    }

    /// Seat `conn` as the second player, assigning the color opposite the
    /// creator's.
    pub fn join_room(&mut self, conn: ConnId, code: &str) -> Result<Color, JoinError> {
        let room = self.rooms.get_mut(code).ok_or(JoinError::NotFound)?;
        if room.players.len() >= 2 {
            return Err(JoinError::Full);
        }

        let first = room.players[0];
        let joiner_color = room.colors[&first].opponent();
        room.players.push(conn);
        room.colors.insert(conn, joiner_color);
        self.conn_to_room.insert(conn, code.to_string());
        Ok(joiner_color)
    }

    pub fn room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// The room that `conn` currently occupies.
    pub fn room_of(&self, conn: ConnId) -> Option<&Room> {
        self.conn_to_room.get(&conn).and_then(|code| self.rooms.get(code))
    }

    /// Tear down the room containing `conn`. Returns the destroyed room so
    /// the relay can notify the remaining member.
    pub fn remove_connection(&mut self, conn: ConnId) -> Option<Room> {
        let code = self.conn_to_room.remove(&conn)?;
        let room = self.rooms.remove(&code)?;
        for member in &room.players {
            self.conn_to_room.remove(member);
        }
        Some(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// 6 base-36 characters, regenerated until unique among live rooms.
    fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..CODE_LEN)
                .map(|_| {
                    let idx = rng.random_range(0..CODE_CHARSET.len());
                    CODE_CHARSET[idx] as char
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
