//! Shared application state: the store backend, game config and the active
//! learner id.
//!
//! There is no auth in this app; a single configured user plays.
//! Everything mutable lives behind the store.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_game_config_from_env, GameConfig};
use crate::seeds::DEFAULT_USER_ID;
use crate::store::{store_from_env, Store};

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub config: GameConfig,
  pub user_id: String,
}

impl AppState {
  /// Build state from env: game config, store backend, active user id.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let config = load_game_config_from_env();
    let store = store_from_env();
    let user_id =
      std::env::var("WORDQUEST_USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.to_string());
    // The users table keys on UUIDs; a malformed id would just 404 on
    // every fetch, so flag it early.
    if Uuid::parse_str(&user_id).is_err() {
      warn!(target: "wordquest_backend", %user_id, "WORDQUEST_USER_ID is not a valid UUID");
    }
    info!(target: "wordquest_backend", %user_id, xp_per_word = config.awards.xp_per_word, stars_per_word = config.awards.stars_per_word, "Application state ready");
    Self { store, config, user_id }
  }

  /// State over an explicit store, used by tests.
  #[allow(dead_code)]
  pub fn with_store(store: Arc<dyn Store>, config: GameConfig, user_id: &str) -> Self {
    Self {
      store,
      config,
      user_id: user_id.to_string(),
    }
  }
}
