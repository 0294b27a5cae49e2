//! Capture resolution.

use super::get_adjacent_cells;
use crate::board::{Board, copy_board};
use crate::types::{Cell, PlayerColor};

/// Flips every opponent tile orthogonally adjacent to (`row`, `col`).
///
/// Only the immediate neighbours of the placed tile are inspected; flipped
/// tiles do not capture further. Returns the new board and the number of
/// tiles flipped.
pub fn capture_tiles(board: &Board, player: PlayerColor, row: usize, col: usize) -> (Board, u32) {
    let mut next = copy_board(board);
    let opponent = Cell::Owned(player.opponent());
    let mut captured = 0;

    for pos in get_adjacent_cells(row, col) {
        if next.get(pos.row, pos.col) == Some(opponent)
            && next.set(pos.row, pos.col, Cell::Owned(player)).is_ok()
        {
            captured += 1;
        }
    }

    (next, captured)
}
