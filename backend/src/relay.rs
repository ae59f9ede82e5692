//! Relay hub
//!
//! One task owns the registry and every connection's outbound sender.
//! Socket tasks only parse frames and push `RelayEvent`s into the hub's
//! queue; each event is handled to completion before the next is dequeued,
//! which is what makes the capacity check in `join_room` race-free.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use shared::{ClientMessage, ServerMessage};

use crate::rooms::{ConnId, RoomRegistry};

/// Everything the hub reacts to.
#[derive(Debug)]
pub enum RelayEvent {
    /// A socket opened; the sender delivers outbound frames to it.
    Connected(ConnId, mpsc::UnboundedSender<ServerMessage>),
    /// A parsed inbound frame.
    Inbound(ConnId, ClientMessage),
    /// The socket closed or errored.
    Disconnected(ConnId),
}

/// The relay state machine. Owns the injected room registry exclusively;
/// nothing else reads or writes it.
pub struct Relay {
    registry: RoomRegistry,
    connections: HashMap<ConnId, mpsc::UnboundedSender<ServerMessage>>,
}

impl Relay {
    pub fn new(registry: RoomRegistry) -> Self {
        Relay {
            registry,
            connections: HashMap::new(),
        }
    }

    /// Consume events until every sender is dropped.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<RelayEvent>) {
        info!("[RELAY] Hub started");
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        info!("[RELAY] Hub stopped");
    }

    pub fn handle_event(&mut self, event: RelayEvent) {
        match event {
            RelayEvent::Connected(conn, sender) => {
                info!("[RELAY] Client connected: {conn}");
                self.connections.insert(conn, sender);
            }
            RelayEvent::Inbound(conn, msg) => {
                let outbound = self.handle_message(conn, msg);
                self.dispatch(outbound);
            }
            RelayEvent::Disconnected(conn) => {
                let outbound = self.handle_disconnect(conn);
                self.dispatch(outbound);
            }
        }
    }

    /// Process one inbound message, returning the frames to deliver.
    /// Exposed so integration tests can drive the hub without sockets.
    pub fn handle_message(
        &mut self,
        conn: ConnId,
        msg: ClientMessage,
    ) -> Vec<(ConnId, ServerMessage)> {
        match msg {
            ClientMessage::CreateRoom { preferred_color } => {
                let (room_id, color) = self.registry.create_room(conn, preferred_color);
                info!("[RELAY] Room created: {room_id} ({color:?} for {conn})");
                vec![(conn, ServerMessage::RoomCreated { room_id, color })]
            }

            ClientMessage::JoinRoom { room_id } => match self.registry.join_room(conn, &room_id) {
                Ok(color) => {
                    info!("[RELAY] {conn} joined room {room_id} as {color:?}");
                    let mut outbound = vec![(
                        conn,
                        ServerMessage::RoomJoined {
                            room_id: room_id.clone(),
                            color,
                        },
                    )];
                    // Both seats are filled now; tell everyone the game is on.
                    outbound.extend(self.to_room(&room_id, |room_id| ServerMessage::GameStart {
                        room_id,
                    }));
                    outbound
                }
                Err(err) => {
                    warn!("[RELAY] {conn} failed to join {room_id}: {err}");
                    vec![(
                        conn,
                        ServerMessage::Error {
                            message: err.to_string(),
                        },
                    )]
                }
            },

            // Game state is forwarded verbatim to the other member only;
            // the relay never re-validates it.
            ClientMessage::Move { state, .. } => {
                debug!("[RELAY] Relaying move from {conn}");
                self.to_peer(conn, ServerMessage::ReceiveMove { state })
            }

            ClientMessage::SendMessage {
                room_id: _,
                text,
                sender,
            } => self.to_own_room(conn, |room_id| ServerMessage::ReceiveMessage {
                room_id,
                text: text.clone(),
                sender,
            }),

            ClientMessage::RequestRematch { .. } => {
                self.to_peer(conn, ServerMessage::RematchRequestReceived)
            }
            ClientMessage::AcceptRematch { .. } => {
                self.to_own_room(conn, |_| ServerMessage::GameReset)
            }
            ClientMessage::RejectRematch { .. } => {
                self.to_peer(conn, ServerMessage::RematchRejected)
            }

            ClientMessage::Timeout { payload, .. } => {
                self.to_own_room(conn, |_| ServerMessage::ReceiveTimeout {
                    payload: payload.clone(),
                })
            }
        }
    }

    /// Tear down the room containing `conn` and notify the remaining member.
    pub fn handle_disconnect(&mut self, conn: ConnId) -> Vec<(ConnId, ServerMessage)> {
        info!("[RELAY] Client disconnected: {conn}");
        self.connections.remove(&conn);

        let Some(room) = self.registry.remove_connection(conn) else {
            return Vec::new();
        };
        info!("[RELAY] Room {} destroyed", room.code);
        room.players
            .into_iter()
            .filter(|&member| member != conn)
            .map(|member| (member, ServerMessage::OpponentDisconnected))
            .collect()
    }

    /// Address the other member of `conn`'s room, if there is one.
    fn to_peer(&self, conn: ConnId, msg: ServerMessage) -> Vec<(ConnId, ServerMessage)> {
        match self.registry.room_of(conn).and_then(|r| r.other_member(conn)) {
            Some(peer) => vec![(peer, msg)],
            None => Vec::new(),
        }
    }

    /// Address both members of `conn`'s room, sender included.
    fn to_own_room(
        &self,
        conn: ConnId,
        make: impl Fn(String) -> ServerMessage,
    ) -> Vec<(ConnId, ServerMessage)> {
        match self.registry.room_of(conn) {
            Some(room) => room
                .players
                .iter()
                .map(|&member| (member, make(room.code.clone())))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Address both members of the room with the given code.
    fn to_room(
        &self,
        code: &str,
        make: impl Fn(String) -> ServerMessage,
    ) -> Vec<(ConnId, ServerMessage)> {
        match self.registry.room(code) {
            Some(room) => room
                .players
                .iter()
                .map(|&member| (member, make(room.code.clone())))
                .collect(),
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, outbound: Vec<(ConnId, ServerMessage)>) {
        for (target, msg) in outbound {
            if let Some(sender) = self.connections.get(&target) {
                if sender.send(msg).is_err() {
                    debug!("[RELAY] Dropping frame for closed connection {target}");
                }
            }
        }
    }
}
