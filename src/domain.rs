//! Domain models: words, learning status, user profile, leaderboard entries.

use serde::{Deserialize, Serialize};

use crate::progression::Progression;

/// Learning status of a word for a given user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
  New,
  Learning,
  Mastered,
}

impl Default for WordStatus {
  fn default() -> Self {
    WordStatus::New
  }
}

/// A vocabulary word plus the requesting user's progress on it.
/// Everything beyond `id` and `word` is pass-through display metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Word {
  pub id: String,
  /// Display text, letters A-Z. The spelling engine normalizes case itself.
  pub word: String,
  #[serde(default)]
  pub pronunciation: String,
  #[serde(default)]
  pub meaning: String,
  #[serde(default)]
  pub grammar: String,
  #[serde(default)]
  pub grammar_tags: Vec<String>,
  #[serde(default)]
  pub sentence_en: String,
  #[serde(default)]
  pub sentence_cn: String,
  #[serde(default)]
  pub scene_cn: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(default)]
  pub mnemonic: Option<String>,
  #[serde(default)]
  pub level: String,

  /// Per-user progress, 0..=100.
  #[serde(default)]
  pub progress: u32,
  #[serde(default)]
  pub status: WordStatus,
  #[serde(default)]
  pub is_favorite: bool,
}

/// The user record as the app reads and writes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  pub name: String,
  pub avatar: String,
  pub level: u32,
  pub xp: u64,
  /// Experience needed for the next level-up.
  pub xp_max: u64,
  pub stars: u64,
  pub achievements: u64,
  pub learned_words: u64,
}

impl UserProfile {
  /// The progression triple fed to the calculator.
  pub fn progression(&self) -> Progression {
    Progression {
      xp: self.xp,
      level: self.level,
      threshold: self.xp_max,
    }
  }

  pub fn apply_progression(&mut self, p: Progression) {
    self.xp = p.xp;
    self.level = p.level;
    self.xp_max = p.threshold;
  }
}

/// Leaderboard aggregation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardPeriod {
  Weekly,
  Monthly,
  AllTime,
}

impl Default for LeaderboardPeriod {
  fn default() -> Self {
    LeaderboardPeriod::Weekly
  }
}

/// One row of the rendered leaderboard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub id: String,
  pub name: String,
  pub avatar: String,
  pub stars: u64,
  pub rank: u32,
}
