//! Move records and move errors.
//!
//! A `Move` is the immutable record of a placement that was accepted by the
//! rules engine. It is appended to the game's history and never changed.

use crate::types::{PlayerColor, Position};
use serde::{Deserialize, Serialize};

/// An applied placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    player: PlayerColor,
    row: usize,
    col: usize,
    /// Milliseconds since the Unix epoch, non-decreasing along a history.
    timestamp: i64,
    /// Opponent tiles flipped by this placement.
    captured_count: u32,
}

impl Move {
    pub(crate) fn new(
        player: PlayerColor,
        position: Position,
        timestamp: i64,
        captured_count: u32,
    ) -> Self {
        Self {
            player,
            row: position.row,
            col: position.col,
            timestamp,
            captured_count,
        }
    }

    /// Returns the player who made this move.
    pub fn player(&self) -> PlayerColor {
        self.player
    }

    /// Returns the row of the placement.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of the placement.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the placement as a position.
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Returns the recorded timestamp (ms since epoch).
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns how many tiles were captured.
    pub fn captured_count(&self) -> u32 {
        self.captured_count
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> ({}, {}) capturing {}",
            self.player, self.row, self.col, self.captured_count
        )
    }
}

/// Reason a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Coordinates outside the 6x6 board.
    #[display("Position ({row}, {col}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already has a tile.
    #[display("Cell ({row}, {col}) is already occupied")]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// It's not this player's turn.
    #[display("It's not {player}'s turn")]
    NotYourTurn {
        /// Player who attempted the move.
        player: PlayerColor,
    },

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,

    /// The target is not next to any of the player's tiles.
    #[display("Cell ({row}, {col}) is not adjacent to any of your tiles")]
    NotAdjacent {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_wire_format() {
        let mv = Move::new(PlayerColor::Green, Position::new(2, 3), 1_700_000_000_000, 2);
        let json = serde_json::to_value(mv).unwrap();
        assert_eq!(json["player"], "G");
        assert_eq!(json["row"], 2);
        assert_eq!(json["col"], 3);
        assert_eq!(json["capturedCount"], 2);
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MoveError::NotYourTurn {
                player: PlayerColor::Green
            }
            .to_string(),
            "It's not G's turn"
        );
        assert!(
            MoveError::NotAdjacent { row: 1, col: 4 }
                .to_string()
                .contains("not adjacent")
        );
    }
}
