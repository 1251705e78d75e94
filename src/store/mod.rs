//! Data access layer.
//!
//! `Store` is the single interface the application talks to; the core game
//! logic never touches it. Two backends: a Supabase PostgREST client (the
//! hosted store the real app uses) and an in-memory seed store used when no
//! Supabase credentials are configured, and in tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::domain::{UserProfile, Word, WordStatus};
use crate::progression::Progression;

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
  #[error("store api error (status {status}): {body}")]
  Api { status: u16, body: String },
  #[error("not found: {0}")]
  NotFound(String),
}

/// Word source + user progress store, matching what the app reads/writes.
#[async_trait]
pub trait Store: Send + Sync {
  /// All words, ordered by creation, merged with `user_id`'s progress.
  async fn words_with_progress(&self, user_id: &str) -> Result<Vec<Word>, StoreError>;

  /// One word by id, merged with `user_id`'s progress.
  async fn word(&self, user_id: &str, word_id: &str) -> Result<Word, StoreError>;

  /// Upsert one word's learning progress for the user.
  async fn update_progress(
    &self,
    user_id: &str,
    word_id: &str,
    progress: u32,
    status: WordStatus,
  ) -> Result<(), StoreError>;

  /// Flip the favorite flag; returns the new value.
  async fn toggle_favorite(&self, user_id: &str, word_id: &str) -> Result<bool, StoreError>;

  async fn user(&self, user_id: &str) -> Result<UserProfile, StoreError>;

  /// Persist the progression triple after an XP award.
  async fn save_progression(
    &self,
    user_id: &str,
    progression: Progression,
  ) -> Result<UserProfile, StoreError>;

  /// Persist the new star total after a star award.
  async fn save_stars(&self, user_id: &str, stars: u64) -> Result<UserProfile, StoreError>;

  async fn increment_learned_words(&self, user_id: &str) -> Result<UserProfile, StoreError>;

  /// Update display name and/or avatar.
  async fn update_profile(
    &self,
    user_id: &str,
    name: Option<String>,
    avatar: Option<String>,
  ) -> Result<UserProfile, StoreError>;

  /// Users ordered by stars descending; `limit` of `None` returns all.
  async fn users_by_stars(&self, limit: Option<u32>) -> Result<Vec<UserProfile>, StoreError>;
}

/// Pick the backend from the environment: Supabase when credentials are
/// present, otherwise the seeded in-memory store.
pub fn store_from_env() -> Arc<dyn Store> {
  if let Some(supabase) = SupabaseStore::from_env() {
    info!(target: "store", base_url = %supabase.base_url(), "Supabase store enabled.");
    Arc::new(supabase)
  } else {
    info!(target: "store", "Supabase disabled (no SUPABASE_URL/SUPABASE_ANON_KEY). Using seeded in-memory store.");
    Arc::new(MemoryStore::seeded())
  }
}
