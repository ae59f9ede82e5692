//! King-in-check detection

use crate::attacks::is_square_attacked;
use crate::board::Board;
use crate::piece::Color;

/// Whether `color`'s king is attacked. A board with no king of that color
/// violates the game invariant and is a programming error, so this panics
/// rather than guessing.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let king = board
        .find_king(color)
        .unwrap_or_else(|| panic!("no {color:?} king on board"));
    is_square_attacked(board, king, color)
}
