//! Grid Duel rules engine.
//!
//! Pure game logic for a two-player tile-capture game on a 6x6 grid:
//!
//! - **Board**: the grid, bounds checks, occupancy and tile counts
//! - **Rules**: move legality, single-depth capture, turn passing and
//!   end-of-game detection
//! - **AI**: a greedy one-ply opponent with random tie-breaking
//!
//! Every operation takes state by reference and returns a new value; nothing
//! here performs I/O or holds on to a game.
//!
//! # Example
//!
//! ```
//! use grid_duel_rules::{GameMode, GameState, PlayerColor, Winner, play_move};
//!
//! let state = GameState::new("demo", GameMode::PvP);
//! let state = play_move(&state, PlayerColor::Red, 2, 2).unwrap();
//! assert_eq!(state.current_player(), PlayerColor::Green);
//! assert_eq!(state.winner(), Winner::Undecided);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod board;
mod rules;
mod types;

pub use action::{Move, MoveError};
pub use ai::{
    AiError, BLOCK_WEIGHT, CAPTURE_WEIGHT, EXPAND_BONUS, ScoredMove, calculate_ai_move,
    find_legal_moves, score_moves,
};
pub use board::{
    BOARD_SIZE, Board, CELL_COUNT, copy_board, count_player_tiles, initialize_board,
    is_board_full, is_cell_empty, is_valid_coordinate,
};
pub use rules::{
    capture_tiles, check_move, detect_winner, execute_move, execute_move_at, get_adjacent_cells,
    has_valid_moves, play_move, tile_majority, validate_move,
};
pub use types::{Cell, GameId, GameMode, GameState, PlayerColor, Position, Winner};
