//! The 6x6 board and its primitive queries.

use crate::action::MoveError;
use crate::types::{Cell, PlayerColor, Position};
use serde::{Deserialize, Serialize};

/// Board side length.
pub const BOARD_SIZE: usize = 6;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Fixed-size 6x6 board, row-major.
///
/// `Board` is a plain value: copying it yields a fully independent grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Gets the cell at the given coordinates, `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Sets the cell at the given coordinates.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), MoveError> {
        if !is_valid_coordinate(row, col) {
            return Err(MoveError::OutOfBounds { row, col });
        }
        self.cells[row][col] = cell;
        Ok(())
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Iterates over every coordinate in row-major order.
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::from("  0 1 2 3 4 5\n");
        for (row, cells) in self.cells.iter().enumerate() {
            result.push_str(&row.to_string());
            for cell in cells {
                result.push(' ');
                result.push(match cell {
                    Cell::Empty => '.',
                    Cell::Owned(PlayerColor::Red) => 'R',
                    Cell::Owned(PlayerColor::Green) => 'G',
                });
            }
            if row + 1 < BOARD_SIZE {
                result.push('\n');
            }
        }
        result
    }
}

/// Creates a 6x6 board with every cell empty.
pub fn initialize_board() -> Board {
    Board::new()
}

/// Returns true iff both coordinates lie in `0..6`.
pub fn is_valid_coordinate(row: usize, col: usize) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

/// True only for an in-bounds, empty cell. Out-of-bounds is never empty.
pub fn is_cell_empty(board: &Board, row: usize, col: usize) -> bool {
    matches!(board.get(row, col), Some(Cell::Empty))
}

/// Returns an independent copy of the board.
pub fn copy_board(board: &Board) -> Board {
    *board
}

/// Counts the cells owned by `player`.
pub fn count_player_tiles(board: &Board, player: PlayerColor) -> usize {
    board
        .cells
        .iter()
        .flatten()
        .filter(|cell| cell.is_owned_by(player))
        .count()
}

/// True when none of the 36 cells is empty.
pub fn is_board_full(board: &Board) -> bool {
    board.cells.iter().flatten().all(|cell| *cell != Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_is_empty() {
        let board = initialize_board();
        assert_eq!(Board::positions().count(), CELL_COUNT);
        for pos in Board::positions() {
            assert!(is_cell_empty(&board, pos.row, pos.col));
        }
        assert_eq!(count_player_tiles(&board, PlayerColor::Red), 0);
        assert_eq!(count_player_tiles(&board, PlayerColor::Green), 0);
        assert!(!is_board_full(&board));
    }

    #[test]
    fn test_valid_coordinates() {
        assert!(is_valid_coordinate(0, 0));
        assert!(is_valid_coordinate(5, 5));
        assert!(!is_valid_coordinate(6, 0));
        assert!(!is_valid_coordinate(0, 6));
        assert!(!is_valid_coordinate(usize::MAX, 2));
    }

    #[test]
    fn test_cell_empty_fails_closed() {
        let mut board = Board::new();
        board.set(1, 1, Cell::Owned(PlayerColor::Red)).unwrap();
        assert!(!is_cell_empty(&board, 1, 1));
        assert!(!is_cell_empty(&board, 6, 1));
        assert!(is_cell_empty(&board, 1, 2));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new();
        let result = board.set(0, 6, Cell::Owned(PlayerColor::Green));
        assert_eq!(result, Err(MoveError::OutOfBounds { row: 0, col: 6 }));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = initialize_board();
        let mut copy = copy_board(&original);
        copy.set(3, 3, Cell::Owned(PlayerColor::Green)).unwrap();
        assert!(is_cell_empty(&original, 3, 3));
        assert!(!is_cell_empty(&copy, 3, 3));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for (i, pos) in Board::positions().enumerate() {
            let player = if i % 2 == 0 {
                PlayerColor::Red
            } else {
                PlayerColor::Green
            };
            board.set(pos.row, pos.col, Cell::Owned(player)).unwrap();
        }
        assert!(is_board_full(&board));
        assert_eq!(count_player_tiles(&board, PlayerColor::Red), 18);
        assert_eq!(count_player_tiles(&board, PlayerColor::Green), 18);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.set(0, 0, Cell::Owned(PlayerColor::Red)).unwrap();
        board.set(5, 5, Cell::Owned(PlayerColor::Green)).unwrap();
        let text = board.display();
        assert!(text.starts_with("  0 1 2 3 4 5\n0 R . . . . ."));
        assert!(text.ends_with("5 . . . . . G"));
    }
}
