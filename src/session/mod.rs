//! Game session module
//!
//! The session controller is the turn state machine: it owns the board,
//! the side to move, captures, castling rights and the last move, and runs
//! the rules engine on every interaction.

pub mod controller;


pub use controller::{GameSession, Selection};
