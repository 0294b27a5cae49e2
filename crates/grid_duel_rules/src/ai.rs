//! Greedy computer opponent.
//!
//! Every legal placement is scored once, with no look-ahead:
//!
//! ```text
//! score = 10 * capture_count + 5 * block_count + 1
//! ```
//!
//! The `+1` rewards any placement as territorial expansion. Ties among the
//! best scores are broken uniformly at random with a caller-supplied RNG.

use crate::board::Board;
use crate::rules::{get_adjacent_cells, validate_move};
use crate::types::{Cell, GameState, PlayerColor, Position};
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument, warn};

/// Points per tile captured.
pub const CAPTURE_WEIGHT: u32 = 10;
/// Points per opponent expansion blocked.
pub const BLOCK_WEIGHT: u32 = 5;
/// Baseline points for any legal placement.
pub const EXPAND_BONUS: u32 = 1;

/// A candidate placement with its score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct ScoredMove {
    /// Where the tile would go.
    position: Position,
    /// Total score.
    score: u32,
    /// Opponent tiles that would flip.
    capture_count: u32,
    /// Opponent expansion directions denied.
    block_count: u32,
}

/// Error raised by the AI.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AiError {
    /// The side to move has nowhere to play.
    #[display("No legal moves available for {player}")]
    NoLegalMoves {
        /// Player the AI was asked to move for.
        player: PlayerColor,
    },
}

impl std::error::Error for AiError {}

/// Lists every legal placement for the side to move, in row-major order.
pub fn find_legal_moves(state: &GameState) -> Vec<Position> {
    let player = state.current_player();
    Board::positions()
        .filter(|pos| validate_move(state, player, pos.row, pos.col))
        .collect()
}

/// Counts opponent tiles orthogonally adjacent to `position`.
fn opponent_neighbours(state: &GameState, position: Position) -> u32 {
    let opponent = Cell::Owned(state.current_player().opponent());
    get_adjacent_cells(position.row, position.col)
        .into_iter()
        .filter(|pos| state.board().get(pos.row, pos.col) == Some(opponent))
        .count() as u32
}

fn calculate_capture_count(state: &GameState, position: Position) -> u32 {
    opponent_neighbours(state, position)
}

// Same measure as captures: each adjacent opponent tile is one blocked direction.
fn calculate_block_count(state: &GameState, position: Position) -> u32 {
    opponent_neighbours(state, position)
}

/// Scores each candidate placement for the side to move.
pub fn score_moves(state: &GameState, legal_moves: &[Position]) -> Vec<ScoredMove> {
    legal_moves
        .iter()
        .map(|&position| {
            let capture_count = calculate_capture_count(state, position);
            let block_count = calculate_block_count(state, position);
            ScoredMove {
                position,
                score: CAPTURE_WEIGHT * capture_count + BLOCK_WEIGHT * block_count + EXPAND_BONUS,
                capture_count,
                block_count,
            }
        })
        .collect()
}

/// Picks the placement for the side to move.
///
/// Returns the only legal move directly when there is just one; otherwise
/// one of the highest-scoring moves, chosen uniformly with `rng`.
///
/// # Errors
///
/// Returns [`AiError::NoLegalMoves`] if the side to move cannot play.
/// Check [`has_valid_moves`](crate::rules::has_valid_moves) first.
#[instrument(skip(state, rng), fields(game_id = %state.id(), player = %state.current_player()))]
pub fn calculate_ai_move<R: Rng + ?Sized>(
    state: &GameState,
    rng: &mut R,
) -> Result<Position, AiError> {
    let player = state.current_player();
    let legal_moves = find_legal_moves(state);

    match legal_moves.as_slice() {
        [] => {
            warn!("AI asked to move with no legal moves");
            return Err(AiError::NoLegalMoves { player });
        }
        [only] => {
            debug!(position = %only, "Single legal move");
            return Ok(*only);
        }
        _ => {}
    }

    let scored = score_moves(state, &legal_moves);
    let max_score = scored.iter().map(|m| m.score).max().unwrap_or(EXPAND_BONUS);
    let best: Vec<Position> = scored
        .iter()
        .filter(|m| m.score == max_score)
        .map(|m| m.position)
        .collect();

    let chosen = best
        .choose(rng)
        .copied()
        .ok_or(AiError::NoLegalMoves { player })?;

    debug!(
        position = %chosen,
        score = max_score,
        candidates = legal_moves.len(),
        ties = best.len(),
        "AI chose move"
    );
    Ok(chosen)
}
