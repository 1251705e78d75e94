//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Awarding XP/stars through the progression calculator and persisting
//!     the result
//!   - The learn-a-word flow (progress upsert + rewards)
//!   - Leaderboard computation (period scaling, ranking, rank lookup, gap)
//!
//! Remote failures propagate to the caller, which logs them and leaves retry
//! to the user. No retries or transactions here: a failure mid-flow can leave
//! local and remote state briefly inconsistent until the next fetch, which is
//! accepted for this app.

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{LeaderboardEntry, LeaderboardPeriod, UserProfile, WordStatus};
use crate::progression::{award_stars, award_xp, ProgressionError};
use crate::state::AppState;
use crate::store::{Store, StoreError};

pub const LEADERBOARD_DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error(transparent)]
  Progression(#[from] ProgressionError),
}

/// Fetch the user, run the XP calculator, persist the rolled-over triple.
#[instrument(level = "info", skip(state))]
pub async fn award_xp_to_user(state: &AppState, amount: i64) -> Result<UserProfile, AppError> {
  let user = state.store.user(&state.user_id).await?;
  let updated = award_xp(&user.progression(), amount)?;
  let profile = state.store.save_progression(&state.user_id, updated).await?;
  info!(target: "wordquest_backend", amount, level = profile.level, xp = profile.xp, "XP awarded");
  Ok(profile)
}

/// Fetch the user, add stars, persist the new total.
#[instrument(level = "info", skip(state))]
pub async fn award_stars_to_user(state: &AppState, amount: i64) -> Result<UserProfile, AppError> {
  let user = state.store.user(&state.user_id).await?;
  let stars = award_stars(user.stars, amount)?;
  let profile = state.store.save_stars(&state.user_id, stars).await?;
  info!(target: "wordquest_backend", amount, stars = profile.stars, "Stars awarded");
  Ok(profile)
}

/// Mark a word mastered and hand out the configured rewards:
/// progress to 100, then XP, then stars, then the learned-words counter.
#[instrument(level = "info", skip(state), fields(%word_id))]
pub async fn complete_word(state: &AppState, word_id: &str) -> Result<UserProfile, AppError> {
  state
    .store
    .update_progress(&state.user_id, word_id, 100, WordStatus::Mastered)
    .await?;
  award_xp_to_user(state, state.config.awards.xp_per_word).await?;
  award_stars_to_user(state, state.config.awards.stars_per_word).await?;
  let profile = state.store.increment_learned_words(&state.user_id).await?;
  info!(target: "wordquest_backend", %word_id, learned = profile.learned_words, "Word completed");
  Ok(profile)
}

/// Scale a star total down to the selected period. The real data has no
/// per-period history, so shorter windows show a fixed fraction, floored.
pub fn scale_stars(stars: u64, period: LeaderboardPeriod) -> u64 {
  match period {
    LeaderboardPeriod::Weekly => stars * 3 / 10,
    LeaderboardPeriod::Monthly => stars * 4 / 5,
    LeaderboardPeriod::AllTime => stars,
  }
}

/// Scale, re-sort and re-rank a star-ordered user list.
pub fn rank_users(users: &[UserProfile], period: LeaderboardPeriod) -> Vec<LeaderboardEntry> {
  let mut entries: Vec<LeaderboardEntry> = users
    .iter()
    .map(|u| LeaderboardEntry {
      id: u.id.clone(),
      name: u.name.clone(),
      avatar: u.avatar.clone(),
      stars: scale_stars(u.stars, period),
      rank: 0,
    })
    .collect();
  entries.sort_by(|a, b| b.stars.cmp(&a.stars));
  for (i, e) in entries.iter_mut().enumerate() {
    e.rank = i as u32 + 1;
  }
  entries
}

#[instrument(level = "info", skip(state))]
pub async fn leaderboard(
  state: &AppState,
  period: LeaderboardPeriod,
  limit: u32,
) -> Result<Vec<LeaderboardEntry>, AppError> {
  let users = state.store.users_by_stars(Some(limit)).await?;
  Ok(rank_users(&users, period))
}

/// 1-based rank of the user by all-time stars, None if absent.
#[instrument(level = "info", skip(state))]
pub async fn user_rank(state: &AppState) -> Result<Option<u32>, AppError> {
  let users = state.store.users_by_stars(None).await?;
  Ok(users
    .iter()
    .position(|u| u.id == state.user_id)
    .map(|i| i as u32 + 1))
}

/// Stars separating the user from the 10th place, zero when already inside
/// the top 10 or when fewer than 10 users exist.
#[instrument(level = "info", skip(state))]
pub async fn gap_to_top10(state: &AppState) -> Result<u64, AppError> {
  let top = state.store.users_by_stars(Some(10)).await?;
  if top.len() < 10 {
    return Ok(0);
  }
  let user = state.store.user(&state.user_id).await?;
  Ok(top[9].stars.saturating_sub(user.stars))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: &str, stars: u64) -> UserProfile {
    UserProfile {
      id: id.into(),
      name: id.into(),
      avatar: String::new(),
      level: 1,
      xp: 0,
      xp_max: 100,
      stars,
      achievements: 0,
      learned_words: 0,
    }
  }

  #[test]
  fn period_scaling_floors() {
    assert_eq!(scale_stars(2840, LeaderboardPeriod::Weekly), 852);
    assert_eq!(scale_stars(25, LeaderboardPeriod::Weekly), 7);
    assert_eq!(scale_stars(25, LeaderboardPeriod::Monthly), 20);
    assert_eq!(scale_stars(25, LeaderboardPeriod::AllTime), 25);
  }

  #[test]
  fn ranking_restarts_from_one_after_scaling() {
    let users = vec![user("a", 2840), user("b", 2450), user("c", 2120)];
    let entries = rank_users(&users, LeaderboardPeriod::Weekly);
    assert_eq!(
      entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
      vec![1, 2, 3]
    );
    assert!(entries.windows(2).all(|w| w[0].stars >= w[1].stars));
    assert_eq!(entries[0].id, "a");
  }
}
