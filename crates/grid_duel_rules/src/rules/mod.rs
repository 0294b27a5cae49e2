//! Game rules: legality, move application and end-of-game detection.
//!
//! A game is either in progress or ended; once a winner (or draw) is
//! recorded no further move is accepted.

mod capture;
mod win;

pub use capture::capture_tiles;
pub use win::{detect_winner, tile_majority};

use crate::action::{Move, MoveError};
use crate::board::{Board, copy_board, is_cell_empty, is_valid_coordinate};
use crate::types::{Cell, GameState, PlayerColor, Position};
use tracing::{debug, instrument, warn};

/// Returns the in-bounds orthogonal neighbours of a cell (up, down, left, right).
pub fn get_adjacent_cells(row: usize, col: usize) -> Vec<Position> {
    let candidates = [
        row.checked_sub(1).map(|r| (r, col)),
        row.checked_add(1).map(|r| (r, col)),
        col.checked_sub(1).map(|c| (row, c)),
        col.checked_add(1).map(|c| (row, c)),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter(|&(r, c)| is_valid_coordinate(r, c))
        .map(|(r, c)| Position::new(r, c))
        .collect()
}

/// True if `player` owns at least one tile.
fn has_player_tiles(board: &Board, player: PlayerColor) -> bool {
    board.rows().iter().flatten().any(|cell| cell.is_owned_by(player))
}

/// True if any orthogonal neighbour of the cell is owned by `player`.
fn is_adjacent_to_player_tile(board: &Board, player: PlayerColor, row: usize, col: usize) -> bool {
    get_adjacent_cells(row, col)
        .into_iter()
        .any(|pos| board.get(pos.row, pos.col) == Some(Cell::Owned(player)))
}

/// Checks a placement and reports the first rule it breaks.
///
/// Checks run in this order: bounds, empty target, turn, game not over,
/// then adjacency. A player who owns no tile yet may place anywhere.
#[instrument(level = "trace", skip(state), fields(game_id = %state.id()))]
pub fn check_move(
    state: &GameState,
    player: PlayerColor,
    row: usize,
    col: usize,
) -> Result<(), MoveError> {
    if !is_valid_coordinate(row, col) {
        return Err(MoveError::OutOfBounds { row, col });
    }

    if !is_cell_empty(state.board(), row, col) {
        return Err(MoveError::CellOccupied { row, col });
    }

    if state.current_player() != player {
        return Err(MoveError::NotYourTurn { player });
    }

    if state.is_over() {
        return Err(MoveError::GameOver);
    }

    // First placement of each player may go anywhere.
    if !has_player_tiles(state.board(), player) {
        return Ok(());
    }

    if is_adjacent_to_player_tile(state.board(), player, row, col) {
        Ok(())
    } else {
        Err(MoveError::NotAdjacent { row, col })
    }
}

/// Returns true if `player` may place a tile at (`row`, `col`).
pub fn validate_move(state: &GameState, player: PlayerColor, row: usize, col: usize) -> bool {
    check_move(state, player, row, col).is_ok()
}

/// Applies a placement, timestamped with the current wall clock.
///
/// See [`execute_move_at`].
pub fn execute_move(
    state: &GameState,
    player: PlayerColor,
    row: usize,
    col: usize,
) -> Result<GameState, MoveError> {
    execute_move_at(state, player, row, col, chrono::Utc::now().timestamp_millis())
}

/// Applies a placement and returns the successor state.
///
/// Places the tile, captures adjacent opponent tiles, records the move and
/// passes the turn. The winner is left untouched; run [`detect_winner`]
/// on the result. The recorded timestamp never goes below the previous
/// move's, so history stays ordered even if the clock steps back.
#[instrument(skip(state), fields(game_id = %state.id()))]
pub fn execute_move_at(
    state: &GameState,
    player: PlayerColor,
    row: usize,
    col: usize,
    timestamp: i64,
) -> Result<GameState, MoveError> {
    if let Err(e) = check_move(state, player, row, col) {
        warn!(error = %e, "Rejected move");
        return Err(e);
    }

    let mut board = copy_board(state.board());
    board.set(row, col, Cell::Owned(player))?;
    let (board, captured_count) = capture_tiles(&board, player, row, col);

    let timestamp = state
        .move_history()
        .last()
        .map_or(timestamp, |last| timestamp.max(last.timestamp()));
    let mv = Move::new(player, Position::new(row, col), timestamp, captured_count);

    debug!(%mv, "Move applied");
    Ok(state.advance(board, mv))
}

/// Applies a placement and records the outcome if the game has ended.
///
/// This is the full turn as seen by a client: [`execute_move`] followed by
/// [`detect_winner`].
#[instrument(skip(state), fields(game_id = %state.id()))]
pub fn play_move(
    state: &GameState,
    player: PlayerColor,
    row: usize,
    col: usize,
) -> Result<GameState, MoveError> {
    let next = execute_move(state, player, row, col)?;
    let winner = detect_winner(&next);
    if winner.is_decided() {
        debug!(%winner, "Game ended");
    }
    Ok(next.with_winner(winner))
}

/// True if `player` has at least one legal placement on this board.
///
/// Turn order and game-over are not considered, only placement rules.
pub fn has_valid_moves(state: &GameState, player: PlayerColor) -> bool {
    let board = state.board();
    let first_move = !has_player_tiles(board, player);

    Board::positions().any(|pos| {
        is_cell_empty(board, pos.row, pos.col)
            && (first_move || is_adjacent_to_player_tile(board, player, pos.row, pos.col))
    })
}
