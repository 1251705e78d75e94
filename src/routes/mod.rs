//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::{
  cors::{Any, CorsLayer},
  services::{ServeDir, ServeFile},
  trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (drives the interactive game session)
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
  // Static files with SPA fallback
  let static_service = ServeDir::new("./static")
    .append_index_html_on_directories(true)
    .not_found_service(ServeFile::new("./static/index.html"));

  Router::new()
    // WebSocket
    .route("/ws", get(ws::ws_upgrade))
    // HTTP API
    .route("/api/v1/health", get(http::http_health))
    .route("/api/v1/words", get(http::http_get_words))
    .route("/api/v1/words/:word_id", get(http::http_get_word))
    .route("/api/v1/words/:word_id/progress", post(http::http_post_progress))
    .route("/api/v1/words/:word_id/favorite", post(http::http_post_favorite))
    .route("/api/v1/user", get(http::http_get_user))
    .route("/api/v1/user/xp", post(http::http_post_xp))
    .route("/api/v1/user/stars", post(http::http_post_stars))
    .route("/api/v1/user/profile", post(http::http_post_profile))
    .route("/api/v1/leaderboard", get(http::http_get_leaderboard))
    .route("/api/v1/leaderboard/rank", get(http::http_get_rank))
    .route("/api/v1/leaderboard/gap", get(http::http_get_gap))
    // State + CORS + HTTP tracing
    .with_state(state)
    .layer(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    )
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
    // Frontend fallback
    .fallback_service(static_service)
}
