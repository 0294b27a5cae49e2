//! In-memory game store.

use grid_duel_rules::{GameId, GameState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Error returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoreError {
    /// No game is stored under this id.
    #[display("Game with id {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: GameId,
    },
}

impl std::error::Error for StoreError {}

/// Keyed store of live games, the single authoritative copy of each.
///
/// Cloning a `GameStore` yields another handle to the same map. The store is
/// created by the composition root and handed to whoever needs it.
///
/// `get_game` followed by `update_game` is not atomic; callers that mutate a
/// game must serialize requests for that id themselves.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    games: Arc<Mutex<HashMap<GameId, GameState>>>,
}

impl GameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game store");
        Self::default()
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, GameState>> {
        // A panic while holding the lock cannot leave a half-written GameState.
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new game under its own id and returns that id.
    #[instrument(skip(self, state), fields(game_id = %state.id()))]
    pub fn create_game(&self, state: GameState) -> GameId {
        let id = state.id().to_string();
        if self.games().insert(id.clone(), state).is_some() {
            warn!("Game id collision, previous game replaced");
        }
        info!("Created game");
        id
    }

    /// Gets a game by id.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: &str) -> Option<GameState> {
        let game = self.games().get(id).cloned();
        if game.is_none() {
            debug!(game_id = id, "Game not found");
        }
        game
    }

    /// Replaces the stored state of an existing game.
    #[instrument(skip(self, state))]
    pub fn update_game(&self, id: &str, state: GameState) -> Result<(), StoreError> {
        let mut games = self.games();
        match games.get_mut(id) {
            Some(slot) => {
                *slot = state;
                debug!(game_id = id, "Game updated");
                Ok(())
            }
            None => {
                warn!(game_id = id, "Update for unknown game");
                Err(StoreError::NotFound { id: id.to_string() })
            }
        }
    }

    /// Removes a game. Returns the removed state, if any.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: &str) -> Option<GameState> {
        let removed = self.games().remove(id);
        info!(game_id = id, removed = removed.is_some(), "Deleted game");
        removed
    }

    /// Lists all stored game ids.
    #[instrument(skip(self))]
    pub fn list_ids(&self) -> Vec<GameId> {
        let ids: Vec<_> = self.games().keys().cloned().collect();
        debug!(count = ids.len(), "Listed games");
        ids
    }

    /// Removes every game.
    #[instrument(skip(self))]
    pub fn clear_all(&self) {
        self.games().clear();
        info!("Cleared all games");
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games().len()
    }

    /// True if no games are stored.
    pub fn is_empty(&self) -> bool {
        self.games().is_empty()
    }
}
