//! NeonMate relay server
//!
//! Forwards authoritative state snapshots and chat between the two members
//! of a room. The relay has no knowledge of chess rules: `move` payloads are
//! rebroadcast verbatim and never re-validated (a deliberate trust/latency
//! trade-off inherited from the protocol design).
//!
//! All connection events funnel into a single queue consumed by one task
//! that exclusively owns the room registry, so check-then-act sequences
//! (capacity check before seating a joiner) cannot interleave.

pub mod api;
pub mod relay;
pub mod rooms;
