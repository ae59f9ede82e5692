//! Full session state snapshot
//!
//! Every `move` message carries the complete resulting state rather than a
//! delta, so the receiving side adopts it wholesale and needs no replay or
//! reconciliation.

use serde::{Deserialize, Serialize};

use chess_logic::{Board, CapturedPieces, CastlingRights, Color, LastMove};

/// The complete relayed game state: board, side to move, check and
/// game-over flags, winner, capture lists, last move and castling rights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub turn: Color,
    pub in_check: bool,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub captured: CapturedPieces,
    pub last_move: Option<LastMove>,
    pub castling_rights: CastlingRights,
}

impl GameSnapshot {
    /// The state of a freshly started game: initial layout, white to move.
    pub fn initial() -> Self {
        GameSnapshot {
            board: Board::initial(),
            turn: Color::White,
            in_check: false,
            game_over: false,
            winner: None,
            captured: CapturedPieces::default(),
            last_move: None,
            castling_rights: CastlingRights::initial(),
        }
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        GameSnapshot::initial()
    }
}
