//! Chess piece movement rules
//!
//! Contains the legality predicate for a single piece move given the board,
//! the last completed move (for en passant) and the castling rights. Pure
//! functions with no side effects - easy to test.
//!
//! Legality here is geometric: self-check filtering happens one layer up in
//! `movegen`, which simulates each candidate and rejects those that leave
//! the mover's own king attacked.

use crate::attacks::is_square_attacked;
use crate::board::{Board, CastlingRights, LastMove, Position};
use crate::check::is_in_check;
use crate::piece::{Color, PieceKind};

/// Check whether a move is legal for the piece on `from`, ignoring
/// self-check. Returns false for an empty source cell or a same-color
/// destination.
pub fn is_legal_move(
    board: &Board,
    from: Position,
    to: Position,
    last_move: Option<&LastMove>,
    rights: &CastlingRights,
) -> bool {
    if from == to {
        return false;
    }
    if to.row > 7 || to.col > 7 {
        return false;
    }

    let Some(piece) = board.piece_at(from) else {
        return false;
    };

    // Can't capture your own pieces
    if let Some(target) = board.piece_at(to) {
        if target.color == piece.color {
            return false;
        }
    }

    match piece.kind {
        PieceKind::Pawn => is_legal_pawn_move(board, piece.color, from, to, last_move),
        PieceKind::Knight => is_legal_knight_move(from, to),
        PieceKind::Bishop => is_legal_bishop_move(board, from, to),
        PieceKind::Rook => is_legal_rook_move(board, from, to),
        PieceKind::Queen => {
            is_legal_rook_move(board, from, to) || is_legal_bishop_move(board, from, to)
        }
        PieceKind::King => is_legal_king_move(board, piece.color, from, to, rights),
    }
}

fn is_legal_pawn_move(
    board: &Board,
    color: Color,
    from: Position,
    to: Position,
    last_move: Option<&LastMove>,
) -> bool {
    let direction: i8 = match color {
        Color::White => -1,
        Color::Black => 1,
    };
    let start_row: u8 = match color {
        Color::White => 6,
        Color::Black => 1,
    };

    let dr = to.row as i8 - from.row as i8;
    let dc = to.col as i8 - from.col as i8;
    let target = board.piece_at(to);

    // Forward one step onto an empty square
    if dc == 0 && dr == direction && target.is_none() {
        return true;
    }

    // Forward two steps from the starting rank, both squares empty
    if dc == 0 && dr == 2 * direction && from.row == start_row && target.is_none() {
        let intermediate = Position::new((from.row as i8 + direction) as u8, from.col);
        return board.is_empty_at(intermediate);
    }

    // Diagonal capture of an enemy occupant
    if dc.abs() == 1 && dr == direction {
        if let Some(target) = target {
            return target.color != color;
        }

        // En passant: the last move was an enemy pawn's two-square advance
        // landing beside us, in the destination's file.
        if let Some(last) = last_move {
            return last.piece.kind == PieceKind::Pawn
                && last.piece.color != color
                && (last.from.row as i8 - last.to.row as i8).abs() == 2
                && last.to.row == from.row
                && last.to.col == to.col;
        }
    }

    false
}

fn is_legal_knight_move(from: Position, to: Position) -> bool {
    let dr = (to.row as i8 - from.row as i8).abs();
    let dc = (to.col as i8 - from.col as i8).abs();
    (dr == 2 && dc == 1) || (dr == 1 && dc == 2)
}

fn is_legal_bishop_move(board: &Board, from: Position, to: Position) -> bool {
    let dr = (to.row as i8 - from.row as i8).abs();
    let dc = (to.col as i8 - from.col as i8).abs();
    if dr != dc {
        return false;
    }
    is_path_clear(board, from, to)
}

fn is_legal_rook_move(board: &Board, from: Position, to: Position) -> bool {
    if from.row != to.row && from.col != to.col {
        return false;
    }
    is_path_clear(board, from, to)
}

fn is_legal_king_move(
    board: &Board,
    color: Color,
    from: Position,
    to: Position,
    rights: &CastlingRights,
) -> bool {
    let dr = to.row as i8 - from.row as i8;
    let dc = to.col as i8 - from.col as i8;

    if dr.abs() <= 1 && dc.abs() <= 1 {
        return true;
    }

    // Castling: two files sideways from the home square, right still held,
    // not currently in check, interior empty, transit and landing squares
    // unattacked.
    if dr != 0 || dc.abs() != 2 {
        return false;
    }
    let home_row: u8 = match color {
        Color::White => 7,
        Color::Black => 0,
    };
    if from.row != home_row || from.col != 4 {
        return false;
    }
    if is_in_check(board, color) {
        return false;
    }

    let side = rights.side(color);
    if dc == 2 {
        // Kingside: f and g files
        side.king_side
            && board.is_empty_at(Position::new(home_row, 5))
            && board.is_empty_at(Position::new(home_row, 6))
            && !is_square_attacked(board, Position::new(home_row, 5), color)
            && !is_square_attacked(board, Position::new(home_row, 6), color)
    } else {
        // Queenside: b, c and d files empty, king transits d and lands on c
        side.queen_side
            && board.is_empty_at(Position::new(home_row, 1))
            && board.is_empty_at(Position::new(home_row, 2))
            && board.is_empty_at(Position::new(home_row, 3))
            && !is_square_attacked(board, Position::new(home_row, 3), color)
            && !is_square_attacked(board, Position::new(home_row, 2), color)
    }
}

/// Walk unit increments from `from` toward `to`, excluding both endpoints,
/// requiring every intermediate cell empty.
pub(crate) fn is_path_clear(board: &Board, from: Position, to: Position) -> bool {
    let dr = (to.row as i8 - from.row as i8).signum();
    let dc = (to.col as i8 - from.col as i8).signum();

    let mut row = from.row as i8 + dr;
    let mut col = from.col as i8 + dc;

    while (row, col) != (to.row as i8, to.col as i8) {
        if !board.is_empty_at(Position::new(row as u8, col as u8)) {
            return false;
        }
        row += dr;
        col += dc;
    }

    true
}
