//! HTTP API over the game store and rules engine.
//!
//! Routes:
//!
//! - `GET /health`
//! - `POST /game/start` `{"mode": "PvP" | "PvAI"}`
//! - `GET /game/state/{id}`
//! - `POST /game/move` `{"gameId", "player", "row", "col"}`
//! - `POST /ai/move` `{"gameId"}`
//!
//! Every error response has the body `{"error", "message", "statusCode"}`.
//! Browser clients on other origins are admitted by a CORS layer.

use crate::config::ConfigError;
use crate::store::{GameStore, StoreError};
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use grid_duel_rules::{
    AiError, BOARD_SIZE, GameId, GameMode, GameState, MoveError, PlayerColor, calculate_ai_move,
    play_move,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OwnedMutexGuard;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Shared state
// ─────────────────────────────────────────────────────────────

type GameLock = Arc<tokio::sync::Mutex<()>>;

/// One async lock per game id, so moves on the same game run one at a time.
///
/// Entries live only while a request holds or waits on them; idle entries
/// are pruned whenever a lock is taken, so ids of deleted games do not
/// accumulate.
#[derive(Debug, Clone, Default)]
pub struct GameLocks {
    locks: Arc<Mutex<HashMap<GameId, GameLock>>>,
}

impl GameLocks {
    fn locks(&self) -> MutexGuard<'_, HashMap<GameId, GameLock>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for exclusive access to the given game.
    pub async fn lock(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks();
            retain_busy(&mut locks);
            locks.entry(id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drops entries no request holds or waits on.
    pub fn prune(&self) {
        retain_busy(&mut self.locks());
    }

    /// Number of lock entries currently tracked.
    pub fn len(&self) -> usize {
        self.locks().len()
    }

    /// True when no lock entry is tracked.
    pub fn is_empty(&self) -> bool {
        self.locks().is_empty()
    }
}

// Clones are only made under the map's mutex, so a count of one means idle.
fn retain_busy(locks: &mut HashMap<GameId, GameLock>) {
    locks.retain(|_, lock| Arc::strong_count(lock) > 1);
}

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    store: GameStore,
    locks: GameLocks,
    rng: Arc<Mutex<StdRng>>,
    cors: CorsLayer,
}

impl AppState {
    /// Creates handler state around a store. `ai_seed` fixes the AI's tie-breaks.
    #[instrument(skip(store))]
    pub fn new(store: GameStore, ai_seed: Option<u64>) -> Self {
        let rng = match ai_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(seeded = ai_seed.is_some(), "Creating API state");
        Self {
            store,
            locks: GameLocks::default(),
            rng: Arc::new(Mutex::new(rng)),
            cors: cors_layer(AllowOrigin::any()),
        }
    }

    /// Restricts browser access to `origin`; `*` allows any origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `origin` is not a valid header value.
    #[instrument(skip(self))]
    pub fn with_cors_origin(mut self, origin: &str) -> Result<Self, ConfigError> {
        let allow = if origin == "*" {
            AllowOrigin::any()
        } else {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| ConfigError::new(format!("Invalid CORS origin {:?}: {}", origin, e)))?;
            AllowOrigin::exact(value)
        };
        self.cors = cors_layer(allow);
        debug!(origin, "CORS origin configured");
        Ok(self)
    }

    /// Returns the per-game locks.
    pub fn locks(&self) -> &GameLocks {
        &self.locks
    }

    /// Returns the game store.
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cors_layer(allow: AllowOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// ─────────────────────────────────────────────────────────────
//  Errors
// ─────────────────────────────────────────────────────────────

/// Error response of the API.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{} ({}): {}", error, status, message)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    fn game_not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Game not found",
            format!("Game with id {} does not exist", id),
        )
    }

    fn game_ended() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "Game already ended",
            "Cannot make moves after game has ended",
        )
    }

    fn ai_failure(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI calculation error",
            message,
        )
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::error::Error for ApiError {}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        Self::bad_request("Invalid move", err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::game_not_found(&id),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        Self::ai_failure(err.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    status_code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            message: &self.message,
            status_code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────
//  Request parsing
// ─────────────────────────────────────────────────────────────

/// Validated body of `POST /game/move`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MoveRequest {
    game_id: GameId,
    player: PlayerColor,
    row: usize,
    col: usize,
}

/// Body of a successful `POST /ai/move`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveResponse {
    /// Row the AI played.
    pub row: usize,
    /// Column the AI played.
    pub col: usize,
    /// State after the AI's move.
    pub game_state: GameState,
}

/// Parses a request body leniently; malformed JSON reads as `null`.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Null, false, zero and the empty string count as a missing value.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a Value> {
    body.get(name).filter(|v| is_present(v))
}

// Non-string ids are looked up by their JSON text and simply not found.
fn game_id_field(body: &Value) -> Option<GameId> {
    field(body, "gameId").map(|id| match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    })
}

fn coordinate(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .filter(|&v| v < BOARD_SIZE)
}

fn parse_move_request(body: &Value) -> Result<MoveRequest, ApiError> {
    let game_id = game_id_field(body);
    // Coordinates only need to be given; a null one is rejected below.
    let (Some(game_id), Some(player), Some(row), Some(col)) = (
        game_id,
        field(body, "player"),
        body.get("row"),
        body.get("col"),
    ) else {
        return Err(ApiError::bad_request(
            "Invalid request",
            "Missing required fields: gameId, player, row, col",
        ));
    };

    let player = player
        .as_str()
        .and_then(|p| PlayerColor::from_str(p).ok())
        .ok_or_else(|| {
            ApiError::bad_request("Invalid player", "Player must be either \"R\" or \"G\"")
        })?;

    let (Some(row), Some(col)) = (coordinate(row), coordinate(col)) else {
        return Err(ApiError::bad_request(
            "Invalid coordinates",
            "Row and col must be integers between 0 and 5",
        ));
    };

    Ok(MoveRequest {
        game_id,
        player,
        row,
        col,
    })
}

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Infinity Grid Duel API is running" }))
}

#[instrument(skip(app, body))]
async fn start_game(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<GameState>), ApiError> {
    let body = parse_body(&body);
    let mode = field(&body, "mode")
        .and_then(Value::as_str)
        .and_then(|m| GameMode::from_str(m).ok())
        .ok_or_else(|| {
            ApiError::bad_request("Invalid mode", "Mode must be either \"PvP\" or \"PvAI\"")
        })?;

    let state = GameState::new(uuid::Uuid::new_v4().to_string(), mode);
    app.store.create_game(state.clone());

    info!(game_id = %state.id(), %mode, "Game started");
    Ok((StatusCode::CREATED, Json(state)))
}

#[instrument(skip(app))]
async fn get_state(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    app.store
        .get_game(&id)
        .map(Json)
        .ok_or_else(|| ApiError::game_not_found(&id))
}

/// Loads a game for mutation, holding its lock until the guard is dropped.
async fn checkout(app: &AppState, id: &str) -> Result<(OwnedMutexGuard<()>, GameState), ApiError> {
    // Unknown ids are rejected before a lock is created for them.
    if app.store.get_game(id).is_none() {
        return Err(ApiError::game_not_found(id));
    }
    let guard = app.locks.lock(id).await;
    let state = app
        .store
        .get_game(id)
        .ok_or_else(|| ApiError::game_not_found(id))?;
    if state.is_over() {
        warn!(game_id = id, winner = %state.winner(), "Move on finished game");
        return Err(ApiError::game_ended());
    }
    Ok((guard, state))
}

#[instrument(skip(app, body))]
async fn make_move(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<GameState>, ApiError> {
    let req = parse_move_request(&parse_body(&body))?;
    debug!(?req, "Processing move");

    let (_guard, state) = checkout(&app, &req.game_id).await?;
    let next = play_move(&state, req.player, req.row, req.col)?;
    app.store.update_game(&req.game_id, next.clone())?;

    info!(
        game_id = %req.game_id,
        player = %req.player,
        row = req.row,
        col = req.col,
        winner = %next.winner(),
        "Move completed successfully"
    );
    Ok(Json(next))
}

#[instrument(skip(app, body))]
async fn ai_move(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<AiMoveResponse>, ApiError> {
    let game_id = game_id_field(&parse_body(&body)).ok_or_else(|| {
        ApiError::bad_request("Invalid request", "Missing required field: gameId")
    })?;

    let (_guard, state) = checkout(&app, &game_id).await?;
    let player = state.current_player();
    let position = calculate_ai_move(&state, &mut *app.rng())?;
    let next = play_move(&state, player, position.row, position.col)
        .map_err(|e| ApiError::ai_failure(e.to_string()))?;
    app.store.update_game(&game_id, next.clone())?;

    info!(
        game_id = %game_id,
        %player,
        %position,
        winner = %next.winner(),
        "AI move completed"
    );
    Ok(Json(AiMoveResponse {
        row: position.row,
        col: position.col,
        game_state: next,
    }))
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        "Not found",
        format!("Route {} {} not found", method, uri.path()),
    )
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/game/start", post(start_game))
        .route("/game/state/{id}", get(get_state))
        .route("/game/move", post(make_move))
        .route("/ai/move", post(ai_move))
        .fallback(not_found)
        .layer(tower::ServiceBuilder::new().map_request(log_request))
        .layer(state.cors.clone())
        .with_state(state)
}
