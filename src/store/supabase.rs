//! Supabase PostgREST client.
//!
//! Tables: `users`, `words`,
//! `user_word_progress` (unique on `user_id,word_id`, upserted with
//! merge-duplicates). Requests carry the anon key; there is no auth flow,
//! the app plays as a single configured user.
//!
//! NOTE: we never log the API key, and error bodies are truncated before
//! logging.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::domain::{UserProfile, Word, WordStatus};
use crate::progression::Progression;
use crate::store::{Store, StoreError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const ERROR_BODY_MAX: usize = 300;

#[derive(Clone)]
pub struct SupabaseStore {
  client: reqwest::Client,
  base_url: String,
}

/// Row of the `users` table.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct UserRow {
  id: String,
  name: String,
  avatar: String,
  level: u32,
  xp: u64,
  xp_max: u64,
  stars: u64,
  achievements: u64,
  learned_words: u64,
}

/// Row of the `words` table (no per-user fields).
#[derive(Clone, Debug, Deserialize)]
struct WordRow {
  id: String,
  word: String,
  #[serde(default)]
  pronunciation: String,
  #[serde(default)]
  meaning: String,
  #[serde(default)]
  grammar: Option<String>,
  #[serde(default)]
  grammar_tags: Option<Vec<String>>,
  #[serde(default)]
  sentence_en: Option<String>,
  #[serde(default)]
  sentence_cn: Option<String>,
  #[serde(default)]
  scene_cn: Option<String>,
  #[serde(default)]
  image_url: Option<String>,
  #[serde(default)]
  mnemonic: Option<String>,
  #[serde(default)]
  level: String,
}

/// Row of the `user_word_progress` table.
#[derive(Clone, Debug, Deserialize)]
struct ProgressRow {
  word_id: String,
  #[serde(default)]
  progress: u32,
  #[serde(default)]
  status: WordStatus,
  #[serde(default)]
  is_favorite: bool,
}

impl From<UserRow> for UserProfile {
  fn from(r: UserRow) -> Self {
    UserProfile {
      id: r.id,
      name: r.name,
      avatar: r.avatar,
      level: r.level,
      xp: r.xp,
      xp_max: r.xp_max,
      stars: r.stars,
      achievements: r.achievements,
      learned_words: r.learned_words,
    }
  }
}

fn merge_word(row: WordRow, progress: Option<&ProgressRow>) -> Word {
  Word {
    id: row.id,
    word: row.word,
    pronunciation: row.pronunciation,
    meaning: row.meaning,
    grammar: row.grammar.unwrap_or_default(),
    grammar_tags: row.grammar_tags.unwrap_or_default(),
    sentence_en: row.sentence_en.unwrap_or_default(),
    sentence_cn: row.sentence_cn.unwrap_or_default(),
    scene_cn: row.scene_cn.unwrap_or_default(),
    image_url: row.image_url.unwrap_or_default(),
    mnemonic: row.mnemonic,
    level: row.level,
    progress: progress.map(|p| p.progress).unwrap_or(0),
    status: progress.map(|p| p.status).unwrap_or_default(),
    is_favorite: progress.map(|p| p.is_favorite).unwrap_or(false),
  }
}

impl SupabaseStore {
  /// Construct the client if SUPABASE_URL and SUPABASE_ANON_KEY are set;
  /// otherwise return None and let the caller fall back.
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("SUPABASE_URL").ok()?;
    let anon_key = std::env::var("SUPABASE_ANON_KEY").ok()?;

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(&anon_key).ok()?);
    let bearer = format!("Bearer {anon_key}");
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&bearer).ok()?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .default_headers(headers)
      .build()
      .ok()?;

    Some(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn table_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{table}", self.base_url)
  }

  async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let mut body = resp.text().await.unwrap_or_default();
    body.truncate(ERROR_BODY_MAX);
    Err(StoreError::Api { status: status.as_u16(), body })
  }

  async fn fetch_user_row(&self, user_id: &str) -> Result<UserRow, StoreError> {
    let resp = self
      .client
      .get(self.table_url("users"))
      .query(&[("id", format!("eq.{user_id}")), ("select", "*".into())])
      .send()
      .await?;
    let rows: Vec<UserRow> = Self::check(resp).await?.json().await?;
    rows.into_iter()
      .next()
      .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
  }

  /// PATCH a partial user row, returning the updated record.
  async fn patch_user(
    &self,
    user_id: &str,
    body: serde_json::Value,
  ) -> Result<UserProfile, StoreError> {
    let resp = self
      .client
      .patch(self.table_url("users"))
      .query(&[("id", format!("eq.{user_id}"))])
      .header("Prefer", "return=representation")
      .json(&body)
      .send()
      .await?;
    let rows: Vec<UserRow> = Self::check(resp).await?.json().await?;
    rows.into_iter()
      .next()
      .map(UserProfile::from)
      .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
  }

  async fn upsert_progress(&self, body: serde_json::Value) -> Result<(), StoreError> {
    let resp = self
      .client
      .post(self.table_url("user_word_progress"))
      .query(&[("on_conflict", "user_id,word_id")])
      .header("Prefer", "resolution=merge-duplicates")
      .json(&body)
      .send()
      .await?;
    Self::check(resp).await?;
    Ok(())
  }
}

#[async_trait]
impl Store for SupabaseStore {
  #[instrument(level = "debug", skip(self))]
  async fn words_with_progress(&self, user_id: &str) -> Result<Vec<Word>, StoreError> {
    let resp = self
      .client
      .get(self.table_url("words"))
      .query(&[("select", "*"), ("order", "created_at.asc")])
      .send()
      .await?;
    let words: Vec<WordRow> = Self::check(resp).await?.json().await?;

    let resp = self
      .client
      .get(self.table_url("user_word_progress"))
      .query(&[("user_id", format!("eq.{user_id}")), ("select", "*".into())])
      .send()
      .await?;
    let progress: Vec<ProgressRow> = Self::check(resp).await?.json().await?;

    let by_word: HashMap<&str, &ProgressRow> =
      progress.iter().map(|p| (p.word_id.as_str(), p)).collect();
    debug!(target: "store", words = words.len(), progress_rows = progress.len(), "Fetched word list");

    Ok(words
      .into_iter()
      .map(|w| {
        let p = by_word.get(w.id.as_str()).copied();
        merge_word(w, p)
      })
      .collect())
  }

  #[instrument(level = "debug", skip(self))]
  async fn word(&self, user_id: &str, word_id: &str) -> Result<Word, StoreError> {
    let resp = self
      .client
      .get(self.table_url("words"))
      .query(&[("id", format!("eq.{word_id}")), ("select", "*".into())])
      .send()
      .await?;
    let rows: Vec<WordRow> = Self::check(resp).await?.json().await?;
    let row = rows
      .into_iter()
      .next()
      .ok_or_else(|| StoreError::NotFound(format!("word {word_id}")))?;

    let resp = self
      .client
      .get(self.table_url("user_word_progress"))
      .query(&[
        ("user_id", format!("eq.{user_id}")),
        ("word_id", format!("eq.{word_id}")),
        ("select", "*".into()),
      ])
      .send()
      .await?;
    let progress: Vec<ProgressRow> = Self::check(resp).await?.json().await?;
    Ok(merge_word(row, progress.first()))
  }

  #[instrument(level = "debug", skip(self))]
  async fn update_progress(
    &self,
    user_id: &str,
    word_id: &str,
    progress: u32,
    status: WordStatus,
  ) -> Result<(), StoreError> {
    self.upsert_progress(json!({
      "user_id": user_id,
      "word_id": word_id,
      "progress": progress,
      "status": status,
      "last_reviewed_at": Utc::now().to_rfc3339(),
    }))
    .await
  }

  #[instrument(level = "debug", skip(self))]
  async fn toggle_favorite(&self, user_id: &str, word_id: &str) -> Result<bool, StoreError> {
    let resp = self
      .client
      .get(self.table_url("user_word_progress"))
      .query(&[
        ("user_id", format!("eq.{user_id}")),
        ("word_id", format!("eq.{word_id}")),
        ("select", "is_favorite,word_id".into()),
      ])
      .send()
      .await?;
    let rows: Vec<ProgressRow> = Self::check(resp).await?.json().await?;
    let new_value = !rows.first().map(|r| r.is_favorite).unwrap_or(false);

    self.upsert_progress(json!({
      "user_id": user_id,
      "word_id": word_id,
      "is_favorite": new_value,
    }))
    .await?;
    Ok(new_value)
  }

  #[instrument(level = "debug", skip(self))]
  async fn user(&self, user_id: &str) -> Result<UserProfile, StoreError> {
    self.fetch_user_row(user_id).await.map(UserProfile::from)
  }

  #[instrument(level = "debug", skip(self))]
  async fn save_progression(
    &self,
    user_id: &str,
    progression: Progression,
  ) -> Result<UserProfile, StoreError> {
    self.patch_user(
      user_id,
      json!({
        "xp": progression.xp,
        "level": progression.level,
        "xp_max": progression.threshold,
      }),
    )
    .await
  }

  #[instrument(level = "debug", skip(self))]
  async fn save_stars(&self, user_id: &str, stars: u64) -> Result<UserProfile, StoreError> {
    self.patch_user(user_id, json!({ "stars": stars })).await
  }

  #[instrument(level = "debug", skip(self))]
  async fn increment_learned_words(&self, user_id: &str) -> Result<UserProfile, StoreError> {
    let current = self.fetch_user_row(user_id).await?;
    self.patch_user(user_id, json!({ "learned_words": current.learned_words + 1 }))
      .await
  }

  #[instrument(level = "debug", skip(self, name, avatar))]
  async fn update_profile(
    &self,
    user_id: &str,
    name: Option<String>,
    avatar: Option<String>,
  ) -> Result<UserProfile, StoreError> {
    let mut body = serde_json::Map::new();
    if let Some(name) = name {
      body.insert("name".into(), json!(name));
    }
    if let Some(avatar) = avatar {
      body.insert("avatar".into(), json!(avatar));
    }
    if body.is_empty() {
      return self.user(user_id).await;
    }
    self.patch_user(user_id, serde_json::Value::Object(body)).await
  }

  #[instrument(level = "debug", skip(self))]
  async fn users_by_stars(&self, limit: Option<u32>) -> Result<Vec<UserProfile>, StoreError> {
    let mut req = self
      .client
      .get(self.table_url("users"))
      .query(&[("select", "*"), ("order", "stars.desc")]);
    if let Some(limit) = limit {
      req = req.query(&[("limit", limit.to_string())]);
    }
    let rows: Vec<UserRow> = Self::check(req.send().await?).await?.json().await?;
    Ok(rows.into_iter().map(UserProfile::from).collect())
  }
}
