//! End-of-game detection.

use super::has_valid_moves;
use crate::board::{Board, count_player_tiles, is_board_full};
use crate::types::{GameState, PlayerColor, Winner};
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Compares tile counts: strictly more tiles wins, equal counts draw.
pub fn tile_majority(board: &Board) -> Winner {
    let red = count_player_tiles(board, PlayerColor::Red);
    let green = count_player_tiles(board, PlayerColor::Green);

    match red.cmp(&green) {
        Ordering::Greater => Winner::Won(PlayerColor::Red),
        Ordering::Less => Winner::Won(PlayerColor::Green),
        Ordering::Equal => Winner::Draw,
    }
}

/// Determines whether the game has ended.
///
/// A full board is decided by tile majority. Otherwise, if the player to
/// move has no legal placement, the game also ends by tile majority; being
/// trapped is not a loss in itself. In every other case the game continues.
#[instrument(skip(state), fields(game_id = %state.id()))]
pub fn detect_winner(state: &GameState) -> Winner {
    let board = state.board();

    if is_board_full(board) {
        let winner = tile_majority(board);
        debug!(%winner, "Board full");
        return winner;
    }

    let to_move = state.current_player();
    if !has_valid_moves(state, to_move) {
        let winner = tile_majority(board);
        debug!(trapped = %to_move, %winner, "Player to move is trapped");
        return winner;
    }

    Winner::Undecided
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, GameMode};

    fn full_board(red_tiles: usize) -> Board {
        let mut board = Board::new();
        for (i, pos) in Board::positions().enumerate() {
            let player = if i < red_tiles {
                PlayerColor::Red
            } else {
                PlayerColor::Green
            };
            board.set(pos.row, pos.col, Cell::Owned(player)).unwrap();
        }
        board
    }

    #[test]
    fn test_full_board_red_majority() {
        let state =
            GameState::from_board("g", GameMode::PvP, full_board(20), PlayerColor::Green);
        assert_eq!(detect_winner(&state), Winner::Won(PlayerColor::Red));
    }

    #[test]
    fn test_full_board_green_majority() {
        let state = GameState::from_board("g", GameMode::PvP, full_board(10), PlayerColor::Red);
        assert_eq!(detect_winner(&state), Winner::Won(PlayerColor::Green));
    }

    #[test]
    fn test_full_board_draw() {
        let state = GameState::from_board("g", GameMode::PvP, full_board(18), PlayerColor::Red);
        assert_eq!(detect_winner(&state), Winner::Draw);
    }

    #[test]
    fn test_trapped_with_tie_is_draw() {
        // Green 2x2 block in the corner walled in by four Red tiles.
        let mut board = Board::new();
        for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            board.set(r, c, Cell::Owned(PlayerColor::Green)).unwrap();
        }
        for (r, c) in [(0, 2), (1, 2), (2, 0), (2, 1)] {
            board.set(r, c, Cell::Owned(PlayerColor::Red)).unwrap();
        }
        let state = GameState::from_board("g", GameMode::PvP, board, PlayerColor::Green);
        assert!(!is_board_full(state.board()));
        assert_eq!(detect_winner(&state), Winner::Draw);
    }

    #[test]
    fn test_trapped_player_does_not_automatically_lose() {
        // Green (to move) is walled in but owns more tiles.
        let mut board = Board::new();
        for col in 0..6 {
            board.set(0, col, Cell::Owned(PlayerColor::Green)).unwrap();
        }
        board.set(1, 0, Cell::Owned(PlayerColor::Green)).unwrap();
        for col in 1..6 {
            board.set(1, col, Cell::Owned(PlayerColor::Red)).unwrap();
        }
        board.set(2, 0, Cell::Owned(PlayerColor::Red)).unwrap();
        // Green 7, Red 6, and every empty cell is below row 1.
        let state = GameState::from_board("g", GameMode::PvP, board, PlayerColor::Green);
        assert_eq!(detect_winner(&state), Winner::Won(PlayerColor::Green));
    }

    #[test]
    fn test_in_progress_is_not_draw() {
        let state = GameState::new("g", GameMode::PvP);
        assert_eq!(detect_winner(&state), Winner::Undecided);
        assert_ne!(detect_winner(&state), Winner::Draw);
    }
}
