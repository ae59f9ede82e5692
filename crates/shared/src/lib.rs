//! Types shared between the NeonMate client and the relay server
//!
//! The wire format is JSON text frames over a WebSocket; messages are
//! internally-tagged enums so each frame carries its event name in a
//! `"type"` field.

pub mod protocol;
pub mod snapshot;

pub use protocol::{ClientMessage, ServerMessage};
pub use snapshot::GameSnapshot;

// Seat colors appear in lobby messages; the relay uses this type alone.
pub use chess_logic::Color;
