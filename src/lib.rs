//! NeonMate client library
//!
//! `session` holds the turn state machine that runs the rules engine on
//! every interaction; `networking` speaks the relay protocol over a
//! WebSocket. The terminal front end in `main.rs` is just a driver for the
//! two.

pub mod networking;
pub mod session;
