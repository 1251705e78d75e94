//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{LeaderboardEntry, LeaderboardPeriod, UserProfile, Word, WordStatus};
use crate::router::{NavEvent, View};
use crate::spelling::{ChallengeState, Outcome};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
  Ping,
  Navigate {
    event: NavEvent,
  },
  StartLetterGame,
  PlaceLetter {
    letter: char,
  },
  ClearGuess,
  ConfirmGuess,
  StartMemoryChallenge {
    #[serde(rename = "wordId", default)]
    word_id: Option<String>,
  },
  Remembered,
  Forgot,
  /// Word-detail "next": mark learned, hand out rewards, advance.
  LearnNext,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
  Pong,
  ViewChanged {
    view: View,
    /// True for full-screen game views that hide the bottom nav bar.
    is_game_view: bool,
  },
  LetterChallenge {
    challenge: ChallengeOut,
    word_index: usize,
    total: usize,
  },
  GuessResult {
    outcome: Outcome,
  },
  MemoryCard {
    word: Word,
    index: usize,
    total: usize,
  },
  UserUpdated {
    user: UserProfile,
  },
  Error {
    message: String,
  },
}

/// DTO for one spelling attempt, as rendered by the client.
#[derive(Debug, Serialize)]
pub struct ChallengeOut {
  pub word_id: String,
  /// Upper-cased target; the client shows it on the pronunciation button.
  pub word: String,
  /// `null` marks the blank slot.
  pub revealed: Vec<Option<char>>,
  pub blank_index: usize,
  pub candidates: Vec<char>,
  pub outcome: Outcome,
}

impl ChallengeOut {
  pub fn from_state(word_id: &str, state: &ChallengeState) -> Self {
    Self {
      word_id: word_id.to_string(),
      word: state.target(),
      revealed: state.revealed().to_vec(),
      blank_index: state.blank_index(),
      candidates: state.candidates().to_vec(),
      outcome: state.outcome(),
    }
  }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct AwardIn {
  pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProgressIn {
  pub progress: u32,
  pub status: WordStatus,
}

#[derive(Serialize)]
pub struct FavoriteOut {
  pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProfileIn {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
  #[serde(default)]
  pub period: Option<LeaderboardPeriod>,
  #[serde(default)]
  pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct LeaderboardOut {
  pub entries: Vec<LeaderboardEntry>,
}

#[derive(Serialize)]
pub struct RankOut {
  /// 1-based; `null` when the user is not on the board.
  pub rank: Option<u32>,
}

#[derive(Serialize)]
pub struct GapOut {
  pub gap: u64,
}

#[derive(Serialize)]
pub struct ErrorOut {
  pub message: String,
}
