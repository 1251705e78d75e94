//! WordQuest · Gamified Vocabulary Trainer Backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional Supabase persistence (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   SUPABASE_URL      : enables the hosted store if present
//!   SUPABASE_ANON_KEY : anon key paired with SUPABASE_URL
//!   WORDQUEST_USER_ID : active learner id (default demo user)
//!   GAME_CONFIG_PATH  : path to TOML config (award amounts + flow timings)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod config;
mod domain;
mod logic;
mod progression;
mod protocol;
mod router;
mod routes;
mod seeds;
mod session;
mod spelling;
mod state;
mod store;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (store backend, game config).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "wordquest_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
