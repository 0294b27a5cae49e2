//! Grid Duel server library.
//!
//! Wraps the [`grid_duel_rules`] engine with the pieces needed to play over
//! HTTP.
//!
//! # Architecture
//!
//! - **Store**: in-memory map of live games, owned by the server
//! - **Server**: axum router translating JSON requests into engine calls
//! - **Config**: layered server configuration
//! - **Self-play**: AI-versus-AI games for demos and soak tests
//!
//! # Example
//!
//! ```
//! use grid_duel::{AppState, GameStore, router};
//!
//! let store = GameStore::new();
//! let app = router(AppState::new(store.clone(), Some(42)));
//! # let _ = app;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod server;
mod store;

pub mod selfplay;

pub use config::{ConfigError, ServerConfig};
pub use server::{AiMoveResponse, ApiError, AppState, GameLocks, router};
pub use store::{GameStore, StoreError};

pub use grid_duel_rules::{GameId, GameMode, GameState, PlayerColor, Winner};
