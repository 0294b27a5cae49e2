//! AI-versus-AI games run entirely in-process.

use grid_duel_rules::{
    AiError, GameMode, GameState, MoveError, PlayerColor, calculate_ai_move, count_player_tiles,
    play_move,
};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Error from a self-play run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum SelfPlayError {
    /// The AI could not produce a move.
    #[display("AI failed: {}", _0)]
    Ai(AiError),
    /// The AI produced a move the engine rejected.
    #[display("Engine rejected AI move: {}", _0)]
    Move(MoveError),
}

impl std::error::Error for SelfPlayError {}

/// Plays one complete game with the AI on both sides.
///
/// `on_move` is called with every intermediate state, including the final one.
#[instrument(skip(rng, on_move))]
pub fn run<R, F>(id: &str, rng: &mut R, mut on_move: F) -> Result<GameState, SelfPlayError>
where
    R: Rng + ?Sized,
    F: FnMut(&GameState),
{
    let mut state = GameState::new(id, GameMode::PvAI);

    while !state.is_over() {
        let player = state.current_player();
        let position = calculate_ai_move(&state, rng)?;
        state = play_move(&state, player, position.row, position.col)?;
        debug!(%player, %position, moves = state.move_history().len(), "Self-play move");
        on_move(&state);
    }

    info!(
        winner = %state.winner(),
        moves = state.move_history().len(),
        red = count_player_tiles(state.board(), PlayerColor::Red),
        green = count_player_tiles(state.board(), PlayerColor::Green),
        "Self-play finished"
    );
    Ok(state)
}
