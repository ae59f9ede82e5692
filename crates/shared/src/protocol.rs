//! Wire protocol between client and relay server
//!
//! Each variant is one event on the wire, tagged by its snake_case name in
//! the `"type"` field. The relay interprets only the room-management
//! variants; game payloads (`Move`, `Timeout`) are forwarded opaquely.

use serde::{Deserialize, Serialize};

use crate::snapshot::GameSnapshot;
use chess_logic::Color;

/// Client → server messages.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Allocate a room; the creator plays `preferred_color` (default white).
    CreateRoom {
        #[serde(default)]
        preferred_color: Option<Color>,
    },
    /// Join an existing room as the second player.
    JoinRoom { room_id: String },
    /// Relay the full post-move state to the other member.
    Move {
        room_id: String,
        state: GameSnapshot,
    },
    /// Chat, broadcast to both members.
    SendMessage {
        room_id: String,
        text: String,
        sender: Color,
    },
    RequestRematch { room_id: String },
    AcceptRematch { room_id: String },
    RejectRematch { room_id: String },
    /// Opaque timeout report, broadcast to the room unchanged.
    Timeout {
        room_id: String,
        payload: serde_json::Value,
    },
}

/// Server → client messages.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomCreated { room_id: String, color: Color },
    RoomJoined { room_id: String, color: Color },
    /// Both seats are filled; sent to both members.
    GameStart { room_id: String },
    ReceiveMove { state: GameSnapshot },
    ReceiveMessage {
        room_id: String,
        text: String,
        sender: Color,
    },
    RematchRequestReceived,
    /// Rematch accepted; both sides reset to the initial state.
    GameReset,
    RematchRejected,
    ReceiveTimeout { payload: serde_json::Value },
    OpponentDisconnected,
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_join_room_serialization() {
        let msg = ClientMessage::JoinRoom {
            room_id: "AB12CD".to_string(),
        };
        let json = serde_json::to_string(&msg).expect("Should serialize");
        assert!(json.contains("\"type\":\"join_room\""), "tagged by event name");

        let decoded: ClientMessage = serde_json::from_str(&json).expect("Should deserialize");
        match decoded {
            ClientMessage::JoinRoom { room_id } => assert_eq!(room_id, "AB12CD"),
            _ => panic!("Wrong message type after deserialization"),
        }
    }

    #[test]
    fn test_client_message_create_room_default_color() {
        //! A create_room frame without a color field still decodes.
        let decoded: ClientMessage =
            serde_json::from_str(r#"{"type":"create_room"}"#).expect("Should deserialize");
        assert_eq!(
            decoded,
            ClientMessage::CreateRoom {
                preferred_color: None
            }
        );

        let decoded: ClientMessage =
            serde_json::from_str(r#"{"type":"create_room","preferred_color":"black"}"#)
                .expect("Should deserialize");
        assert_eq!(
            decoded,
            ClientMessage::CreateRoom {
                preferred_color: Some(Color::Black)
            }
        );
    }

    #[test]
    fn test_client_message_move_round_trip() {
        let msg = ClientMessage::Move {
            room_id: "ROOM01".to_string(),
            state: GameSnapshot::initial(),
        };
        let json = serde_json::to_string(&msg).expect("Should serialize");
        let decoded: ClientMessage = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_server_message_room_created() {
        let msg = ServerMessage::RoomCreated {
            room_id: "XY99ZZ".to_string(),
            color: Color::Black,
        };
        let json = serde_json::to_string(&msg).expect("Should serialize");
        assert!(json.contains("\"room_created\""));
        assert!(json.contains("\"black\""));

        let decoded: ServerMessage = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_server_message_receive_move_round_trip() {
        let msg = ServerMessage::ReceiveMove {
            state: GameSnapshot::initial(),
        };
        let json = serde_json::to_string(&msg).expect("Should serialize");
        let decoded: ServerMessage = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_timeout_payload_is_opaque() {
        //! Arbitrary JSON survives the trip through the timeout envelope.
        let payload = serde_json::json!({ "loser": "white", "reason": "clock" });
        let msg = ClientMessage::Timeout {
            room_id: "ROOM01".to_string(),
            payload: payload.clone(),
        };
        let json = serde_json::to_string(&msg).expect("Should serialize");
        let decoded: ClientMessage = serde_json::from_str(&json).expect("Should deserialize");
        match decoded {
            ClientMessage::Timeout { payload: p, .. } => assert_eq!(p, payload),
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_snapshot_round_trip_preserves_rules() {
        //! A snapshot that crosses the wire answers validator and generator
        //! queries exactly like the one that was sent.
        use chess_logic::{is_in_check, legal_destinations, Board};

        let snapshot = GameSnapshot::initial();
        let json = serde_json::to_string(&snapshot).expect("Should serialize");
        let restored: GameSnapshot = serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(restored, snapshot);
        for from in Board::positions() {
            let Some(piece) = snapshot.board.piece_at(from) else { continue };
            assert_eq!(
                legal_destinations(
                    &snapshot.board,
                    from,
                    piece.color,
                    snapshot.last_move.as_ref(),
                    &snapshot.castling_rights,
                ),
                legal_destinations(
                    &restored.board,
                    from,
                    piece.color,
                    restored.last_move.as_ref(),
                    &restored.castling_rights,
                ),
                "destinations differ after round trip for {from}"
            );
        }
        assert_eq!(
            is_in_check(&snapshot.board, snapshot.turn),
            is_in_check(&restored.board, restored.turn)
        );
    }
}
