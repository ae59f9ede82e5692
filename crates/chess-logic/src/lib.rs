//! Chess rules engine - pure game logic without any I/O coupling
//!
//! Implements board representation, move validation and game-end detection
//! using pure functions over cheap-to-clone value types. Every speculative
//! check (self-check filtering, castling safety) operates on an independent
//! copy of the board; the live board is never mutated during validation.
//!
//! # Module Structure
//!
//! - `piece` - Piece kinds and colors (closed enums)
//! - `board` - Board grid, positions, castling rights, capture bookkeeping
//! - `piece_moves` - Movement rules for each piece type
//! - `attacks` - Square attack detection (no self-check filtering)
//! - `check` - King-in-check detection
//! - `movegen` - Legal move enumeration with self-check filtering
//!
//! # Layering
//!
//! `attacks` never calls into `piece_moves` or `movegen`. Attack geometry is
//! deliberately unfiltered: if square safety depended on full move legality,
//! "is this move legal" and "is my king safe afterward" would recurse into
//! each other.

pub mod attacks;
pub mod board;
pub mod check;
pub mod movegen;
pub mod piece;
pub mod piece_moves;


pub use attacks::{can_attack, is_square_attacked};
pub use board::{Board, CapturedPieces, CastlingRights, LastMove, Position, SideRights};
pub use check::is_in_check;
pub use movegen::{has_any_legal_move, is_checkmate, is_stalemate, legal_destinations, simulate_move};
pub use piece::{Color, Piece, PieceKind};
pub use piece_moves::is_legal_move;
