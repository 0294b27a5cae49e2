//! Tests for the in-memory game store.

use grid_duel::{GameMode, GameState, GameStore, PlayerColor, StoreError};
use grid_duel_rules::execute_move;

#[test]
fn test_create_and_get() {
    let store = GameStore::new();
    let id = store.create_game(GameState::new("g1", GameMode::PvP));
    assert_eq!(id, "g1");

    let game = store.get_game("g1").expect("Game should exist");
    assert_eq!(game.id(), "g1");
    assert_eq!(game.mode(), GameMode::PvP);
}

#[test]
fn test_get_unknown_returns_none() {
    let store = GameStore::new();
    assert!(store.get_game("nope").is_none());
}

#[test]
fn test_update_replaces_value() {
    let store = GameStore::new();
    let state = GameState::new("g1", GameMode::PvAI);
    store.create_game(state.clone());

    let next = execute_move(&state, PlayerColor::Red, 0, 0).expect("Move failed");
    store.update_game("g1", next.clone()).expect("Update failed");

    let stored = store.get_game("g1").unwrap();
    assert_eq!(stored, next);
    assert_eq!(stored.move_history().len(), 1);
}

#[test]
fn test_update_unknown_leaves_store_unchanged() {
    let store = GameStore::new();
    store.create_game(GameState::new("g1", GameMode::PvP));

    let result = store.update_game("g2", GameState::new("g2", GameMode::PvP));
    assert_eq!(
        result,
        Err(StoreError::NotFound {
            id: "g2".to_string()
        })
    );
    assert_eq!(store.list_ids(), vec!["g1".to_string()]);
    assert!(store.get_game("g2").is_none());
}

#[test]
fn test_stored_value_isolated_from_caller_copy() {
    let store = GameStore::new();
    let state = GameState::new("g1", GameMode::PvP);
    store.create_game(state.clone());

    // Advancing a fetched copy does not touch the stored game.
    let fetched = store.get_game("g1").unwrap();
    let _advanced = execute_move(&fetched, PlayerColor::Red, 3, 3).unwrap();
    assert_eq!(store.get_game("g1").unwrap(), state);
}

#[test]
fn test_delete_list_and_clear() {
    let store = GameStore::new();
    store.create_game(GameState::new("a", GameMode::PvP));
    store.create_game(GameState::new("b", GameMode::PvAI));

    let mut ids = store.list_ids();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

    assert!(store.delete_game("a").is_some());
    assert!(store.delete_game("a").is_none());
    assert_eq!(store.len(), 1);

    store.clear_all();
    assert!(store.is_empty());
}
