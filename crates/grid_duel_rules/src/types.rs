//! Core domain types for Grid Duel.

use crate::action::Move;
use crate::board::Board;
use im::Vector;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique identifier for a game.
pub type GameId = String;

/// Player colour. Red always moves first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum PlayerColor {
    /// Red player (moves first).
    #[serde(rename = "R")]
    #[strum(serialize = "R")]
    Red,
    /// Green player.
    #[serde(rename = "G")]
    #[strum(serialize = "G")]
    Green,
}

impl PlayerColor {
    /// Returns the opposing colour.
    pub fn opponent(self) -> Self {
        match self {
            PlayerColor::Red => PlayerColor::Green,
            PlayerColor::Green => PlayerColor::Red,
        }
    }
}

/// A single cell of the board.
///
/// On the wire an empty cell is the number `0` and an owned cell is the
/// owner's colour code (`"R"` or `"G"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nobody owns this cell.
    #[default]
    Empty,
    /// Cell owned by a player.
    Owned(PlayerColor),
}

impl Cell {
    /// Returns the owner, if any.
    pub fn owner(self) -> Option<PlayerColor> {
        match self {
            Cell::Empty => None,
            Cell::Owned(player) => Some(player),
        }
    }

    /// True if the cell is owned by `player`.
    pub fn is_owned_by(self, player: PlayerColor) -> bool {
        self == Cell::Owned(player)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_u8(0),
            Cell::Owned(player) => player.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Empty(u8),
            Owned(PlayerColor),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Empty(0) => Ok(Cell::Empty),
            Repr::Empty(other) => Err(serde::de::Error::custom(format!(
                "invalid cell value {other}, expected 0, \"R\" or \"G\""
            ))),
            Repr::Owned(player) => Ok(Cell::Owned(player)),
        }
    }
}

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 = top).
    pub row: usize,
    /// Column index (0 = left).
    pub col: usize,
}

impl Position {
    /// Creates a position without checking bounds.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Who occupies the second seat.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GameMode {
    /// Two humans.
    PvP,
    /// Human (Red) against the built-in heuristic opponent.
    PvAI,
}

/// Result of a game.
///
/// Serialized as `null` while undecided, the winner's colour code, or
/// `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Winner {
    /// Game still in progress.
    #[default]
    Undecided,
    /// Game won by a player.
    Won(PlayerColor),
    /// Equal tile counts at the end.
    Draw,
}

impl Winner {
    /// True once the game has ended, either way.
    pub fn is_decided(self) -> bool {
        self != Winner::Undecided
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Undecided => write!(f, "undecided"),
            Winner::Won(player) => write!(f, "{player} wins"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Winner::Undecided => serializer.serialize_none(),
            Winner::Won(player) => player.serialize(serializer),
            Winner::Draw => serializer.serialize_str("draw"),
        }
    }
}

impl<'de> Deserialize<'de> for Winner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None => Ok(Winner::Undecided),
            Some("R") => Ok(Winner::Won(PlayerColor::Red)),
            Some("G") => Ok(Winner::Won(PlayerColor::Green)),
            Some("draw") => Ok(Winner::Draw),
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid winner {other:?}, expected null, \"R\", \"G\" or \"draw\""
            ))),
        }
    }
}

/// Complete game state.
///
/// Values are never mutated in place by the engine: every move produces a
/// new `GameState`. The move history is a persistent vector, so successive
/// states share their common prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Game identifier.
    id: GameId,
    /// The board.
    board: Board,
    /// Colour to move.
    current_player: PlayerColor,
    /// Seat configuration.
    mode: GameMode,
    /// Outcome, undecided until the game ends.
    winner: Winner,
    /// Applied moves in application order.
    move_history: Vector<Move>,
}

impl GameState {
    /// Creates a fresh game: empty board, Red to move, no history.
    pub fn new(id: impl Into<GameId>, mode: GameMode) -> Self {
        Self::from_board(id, mode, Board::new(), PlayerColor::Red)
    }

    /// Creates an undecided game from an arbitrary position with empty history.
    ///
    /// Useful for puzzles and for replaying a known position.
    pub fn from_board(
        id: impl Into<GameId>,
        mode: GameMode,
        board: Board,
        current_player: PlayerColor,
    ) -> Self {
        Self {
            id: id.into(),
            board,
            current_player,
            mode,
            winner: Winner::Undecided,
            move_history: Vector::new(),
        }
    }

    /// Returns the game id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the colour to move.
    pub fn current_player(&self) -> PlayerColor {
        self.current_player
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the recorded outcome.
    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &Vector<Move> {
        &self.move_history
    }

    /// True once a winner or draw has been recorded.
    pub fn is_over(&self) -> bool {
        self.winner.is_decided()
    }

    /// Returns a copy of this state with the outcome set.
    pub fn with_winner(mut self, winner: Winner) -> Self {
        self.winner = winner;
        self
    }

    /// Produces the successor state after a move has been applied to `board`.
    pub(crate) fn advance(&self, board: Board, mv: Move) -> Self {
        let mut move_history = self.move_history.clone();
        move_history.push_back(mv);
        Self {
            id: self.id.clone(),
            board,
            current_player: mv.player().opponent(),
            mode: self.mode,
            winner: self.winner,
            move_history,
        }
    }
}
