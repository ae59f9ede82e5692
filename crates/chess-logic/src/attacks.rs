//! Square attack detection
//!
//! Same per-kind geometry as `piece_moves`, with the asymmetries that make
//! it safe to call from anywhere: pawns attack diagonally whether or not the
//! target is occupied (we are testing square safety, not making a move), en
//! passant and castling are never considered, and nothing here filters for
//! leaving one's own king in check. Keeping this layer independent of move
//! legality is what breaks the would-be recursion between "is this move
//! legal" and "is my king safe afterward".

use crate::board::{Board, Position};
use crate::piece::{Color, PieceKind};
use crate::piece_moves::is_path_clear;

/// Whether the piece on `attacker` attacks `target`. An empty attacker cell
/// attacks nothing.
pub fn can_attack(board: &Board, attacker: Position, target: Position) -> bool {
    if attacker == target {
        return false;
    }
    let Some(piece) = board.piece_at(attacker) else {
        return false;
    };

    let dr = target.row as i8 - attacker.row as i8;
    let dc = target.col as i8 - attacker.col as i8;

    match piece.kind {
        PieceKind::Pawn => {
            let direction: i8 = match piece.color {
                Color::White => -1,
                Color::Black => 1,
            };
            dr == direction && dc.abs() == 1
        }
        PieceKind::Knight => {
            (dr.abs() == 2 && dc.abs() == 1) || (dr.abs() == 1 && dc.abs() == 2)
        }
        PieceKind::Bishop => dr.abs() == dc.abs() && is_path_clear(board, attacker, target),
        PieceKind::Rook => (dr == 0 || dc == 0) && is_path_clear(board, attacker, target),
        PieceKind::Queen => {
            (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && is_path_clear(board, attacker, target)
        }
        PieceKind::King => dr.abs() <= 1 && dc.abs() <= 1,
    }
}

/// Whether any piece of `defender`'s opponent attacks `pos`. Scans all 64
/// cells.
pub fn is_square_attacked(board: &Board, pos: Position, defender: Color) -> bool {
    let attacker_color = defender.opponent();
    Board::positions().any(|cell| {
        board
            .piece_at(cell)
            .is_some_and(|p| p.color == attacker_color)
            && can_attack(board, cell, pos)
    })
}
