//! In-memory store backed by the built-in seeds.
//!
//! Used when no Supabase project is configured, and as the test double for
//! everything above the store boundary. Same visible behavior as the remote
//! store, minus persistence across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{UserProfile, Word, WordStatus};
use crate::progression::Progression;
use crate::seeds;
use crate::store::{Store, StoreError};

#[derive(Clone, Debug, Default)]
struct ProgressEntry {
  progress: u32,
  status: WordStatus,
  is_favorite: bool,
}

pub struct MemoryStore {
  users: RwLock<HashMap<String, UserProfile>>,
  words: RwLock<Vec<Word>>,
  /// Keyed by (user_id, word_id).
  progress: RwLock<HashMap<(String, String), ProgressEntry>>,
}

impl MemoryStore {
  pub fn new(users: Vec<UserProfile>, words: Vec<Word>) -> Self {
    Self {
      users: RwLock::new(users.into_iter().map(|u| (u.id.clone(), u)).collect()),
      words: RwLock::new(words),
      progress: RwLock::new(HashMap::new()),
    }
  }

  /// Demo learner + rivals + built-in word list.
  pub fn seeded() -> Self {
    let mut users = vec![seeds::seed_user()];
    users.extend(seeds::seed_rivals());
    Self::new(users, seeds::seed_words())
  }

  async fn with_user<F>(&self, user_id: &str, f: F) -> Result<UserProfile, StoreError>
  where
    F: FnOnce(&mut UserProfile),
  {
    let mut users = self.users.write().await;
    let user = users
      .get_mut(user_id)
      .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
    f(user);
    Ok(user.clone())
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn words_with_progress(&self, user_id: &str) -> Result<Vec<Word>, StoreError> {
    let words = self.words.read().await;
    let progress = self.progress.read().await;
    Ok(words
      .iter()
      .map(|w| {
        let mut w = w.clone();
        if let Some(p) = progress.get(&(user_id.to_string(), w.id.clone())) {
          w.progress = p.progress;
          w.status = p.status;
          w.is_favorite = p.is_favorite;
        }
        w
      })
      .collect())
  }

  async fn word(&self, user_id: &str, word_id: &str) -> Result<Word, StoreError> {
    let words = self.words.read().await;
    let mut word = words
      .iter()
      .find(|w| w.id == word_id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(format!("word {word_id}")))?;
    if let Some(p) = self
      .progress
      .read()
      .await
      .get(&(user_id.to_string(), word_id.to_string()))
    {
      word.progress = p.progress;
      word.status = p.status;
      word.is_favorite = p.is_favorite;
    }
    Ok(word)
  }

  async fn update_progress(
    &self,
    user_id: &str,
    word_id: &str,
    progress: u32,
    status: WordStatus,
  ) -> Result<(), StoreError> {
    let mut map = self.progress.write().await;
    let entry = map
      .entry((user_id.to_string(), word_id.to_string()))
      .or_default();
    entry.progress = progress;
    entry.status = status;
    Ok(())
  }

  async fn toggle_favorite(&self, user_id: &str, word_id: &str) -> Result<bool, StoreError> {
    let mut map = self.progress.write().await;
    let entry = map
      .entry((user_id.to_string(), word_id.to_string()))
      .or_default();
    entry.is_favorite = !entry.is_favorite;
    Ok(entry.is_favorite)
  }

  async fn user(&self, user_id: &str) -> Result<UserProfile, StoreError> {
    self.users
      .read()
      .await
      .get(user_id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
  }

  async fn save_progression(
    &self,
    user_id: &str,
    progression: Progression,
  ) -> Result<UserProfile, StoreError> {
    self.with_user(user_id, |u| u.apply_progression(progression))
      .await
  }

  async fn save_stars(&self, user_id: &str, stars: u64) -> Result<UserProfile, StoreError> {
    self.with_user(user_id, |u| u.stars = stars).await
  }

  async fn increment_learned_words(&self, user_id: &str) -> Result<UserProfile, StoreError> {
    self.with_user(user_id, |u| u.learned_words += 1).await
  }

  async fn update_profile(
    &self,
    user_id: &str,
    name: Option<String>,
    avatar: Option<String>,
  ) -> Result<UserProfile, StoreError> {
    self.with_user(user_id, |u| {
      if let Some(name) = name {
        u.name = name;
      }
      if let Some(avatar) = avatar {
        u.avatar = avatar;
      }
    })
    .await
  }

  async fn users_by_stars(&self, limit: Option<u32>) -> Result<Vec<UserProfile>, StoreError> {
    let mut users: Vec<UserProfile> = self.users.read().await.values().cloned().collect();
    users.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.id.cmp(&b.id)));
    if let Some(limit) = limit {
      users.truncate(limit as usize);
    }
    Ok(users)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::DEFAULT_USER_ID;

  #[tokio::test]
  async fn progress_starts_new_and_upserts() {
    let store = MemoryStore::seeded();
    let words = store.words_with_progress(DEFAULT_USER_ID).await.expect("words");
    assert!(!words.is_empty());
    assert!(words.iter().all(|w| w.status == WordStatus::New));

    let id = words[0].id.clone();
    store
      .update_progress(DEFAULT_USER_ID, &id, 100, WordStatus::Mastered)
      .await
      .expect("update");
    let words = store.words_with_progress(DEFAULT_USER_ID).await.expect("words");
    let updated = words.iter().find(|w| w.id == id).expect("word");
    assert_eq!(updated.progress, 100);
    assert_eq!(updated.status, WordStatus::Mastered);
  }

  #[tokio::test]
  async fn single_word_lookup_merges_progress() {
    let store = MemoryStore::seeded();
    store
      .update_progress(DEFAULT_USER_ID, "w-cat", 40, WordStatus::Learning)
      .await
      .expect("update");
    let word = store.word(DEFAULT_USER_ID, "w-cat").await.expect("word");
    assert_eq!(word.word, "Cat");
    assert_eq!(word.progress, 40);
    assert_eq!(word.status, WordStatus::Learning);

    let err = store.word(DEFAULT_USER_ID, "w-missing").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
  }

  #[tokio::test]
  async fn toggle_favorite_flips_each_call() {
    let store = MemoryStore::seeded();
    assert!(store.toggle_favorite(DEFAULT_USER_ID, "w-cat").await.expect("toggle"));
    assert!(!store.toggle_favorite(DEFAULT_USER_ID, "w-cat").await.expect("toggle"));
  }

  #[tokio::test]
  async fn unknown_user_is_not_found() {
    let store = MemoryStore::seeded();
    let err = store.user("nobody").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
  }

  #[tokio::test]
  async fn users_by_stars_is_descending() {
    let store = MemoryStore::seeded();
    let users = store.users_by_stars(Some(3)).await.expect("users");
    assert_eq!(users.len(), 3);
    assert!(users.windows(2).all(|w| w[0].stars >= w[1].stars));
    assert_eq!(users[0].name, "冠军玩家");
  }
}
