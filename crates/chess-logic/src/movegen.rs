//! Legal move enumeration with self-check filtering
//!
//! Takes the geometric candidates from `piece_moves` and keeps only those
//! that do not leave the mover's own king attacked. Every candidate is
//! simulated on an independent copy of the board, including the two special
//! board effects: the en passant victim is removed and the castling rook is
//! relocated.

use crate::board::{Board, CastlingRights, LastMove, Position};
use crate::check::is_in_check;
use crate::piece::{Color, PieceKind};
use crate::piece_moves::is_legal_move;

/// Build the board that results from moving `from` to `to`, on a fresh
/// copy. Applies the en passant capture removal and the castling rook
/// slide; everything else (rights, capture lists, promotion) is session
/// bookkeeping and stays out of the rules layer.
pub fn simulate_move(board: &Board, from: Position, to: Position) -> Board {
    let mut next = board.clone();
    let Some(piece) = next.piece_at(from) else {
        return next;
    };

    // A pawn moving diagonally onto an empty square is capturing en
    // passant: the bypassed pawn sits beside the origin, in the
    // destination's file.
    if piece.kind == PieceKind::Pawn && from.col != to.col && next.is_empty_at(to) {
        next.set(Position::new(from.row, to.col), None);
    }

    // A king moving two files is castling: the rook jumps to the far side.
    if piece.kind == PieceKind::King && (to.col as i8 - from.col as i8).abs() == 2 {
        let row = from.row;
        if to.col > from.col {
            let rook = next.piece_at(Position::new(row, 7));
            next.set(Position::new(row, 5), rook);
            next.set(Position::new(row, 7), None);
        } else {
            let rook = next.piece_at(Position::new(row, 0));
            next.set(Position::new(row, 3), rook);
            next.set(Position::new(row, 0), None);
        }
    }

    next.set(to, Some(piece));
    next.set(from, None);
    next
}

/// Enumerate the destinations the piece on `pos` may legally move to:
/// geometric candidates filtered through a self-check simulation.
pub fn legal_destinations(
    board: &Board,
    pos: Position,
    color: Color,
    last_move: Option<&LastMove>,
    rights: &CastlingRights,
) -> Vec<Position> {
    Board::positions()
        .filter(|&to| {
            is_legal_move(board, pos, to, last_move, rights)
                && !is_in_check(&simulate_move(board, pos, to), color)
        })
        .collect()
}

/// Whether some piece of `color` has at least one legal destination.
pub fn has_any_legal_move(
    board: &Board,
    color: Color,
    last_move: Option<&LastMove>,
    rights: &CastlingRights,
) -> bool {
    Board::positions().any(|from| {
        board.piece_at(from).is_some_and(|p| p.color == color)
            && !legal_destinations(board, from, color, last_move, rights).is_empty()
    })
}

/// Checkmate: in check with no legal move available.
pub fn is_checkmate(
    board: &Board,
    color: Color,
    last_move: Option<&LastMove>,
    rights: &CastlingRights,
) -> bool {
    is_in_check(board, color) && !has_any_legal_move(board, color, last_move, rights)
}

/// Stalemate: no legal move available while not in check. Detected as a
/// distinct condition; the session layer decides what (if anything) to do
/// with it.
pub fn is_stalemate(
    board: &Board,
    color: Color,
    last_move: Option<&LastMove>,
    rights: &CastlingRights,
) -> bool {
    !is_in_check(board, color) && !has_any_legal_move(board, color, last_move, rights)
}
