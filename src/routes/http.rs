//! HTTP endpoint handlers. These are thin wrappers that forward to the store
//! and core logic. Each handler is instrumented; errors map to JSON bodies
//! with a status reflecting who is at fault.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::domain::{UserProfile, Word};
use crate::logic::{self, AppError, LEADERBOARD_DEFAULT_LIMIT};
use crate::protocol::*;
use crate::state::AppState;
use crate::store::{Store, StoreError};

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = match &self {
      AppError::Progression(_) => StatusCode::BAD_REQUEST,
      AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Store(_) => StatusCode::BAD_GATEWAY,
    };
    warn!(target: "wordquest_backend", %status, error = %self, "Request failed");
    (status, Json(ErrorOut { message: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_words(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Word>>, AppError> {
  let words = state.store.words_with_progress(&state.user_id).await?;
  info!(target: "wordquest_backend", count = words.len(), "Word list served");
  Ok(Json(words))
}

#[instrument(level = "info", skip(state), fields(%word_id))]
pub async fn http_get_word(
  State(state): State<Arc<AppState>>,
  Path(word_id): Path<String>,
) -> Result<Json<Word>, AppError> {
  Ok(Json(state.store.word(&state.user_id, &word_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%word_id))]
pub async fn http_post_progress(
  State(state): State<Arc<AppState>>,
  Path(word_id): Path<String>,
  Json(body): Json<ProgressIn>,
) -> Result<StatusCode, AppError> {
  state
    .store
    .update_progress(&state.user_id, &word_id, body.progress, body.status)
    .await?;
  info!(target: "wordquest_backend", %word_id, progress = body.progress, "Progress updated");
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state), fields(%word_id))]
pub async fn http_post_favorite(
  State(state): State<Arc<AppState>>,
  Path(word_id): Path<String>,
) -> Result<Json<FavoriteOut>, AppError> {
  let is_favorite = state.store.toggle_favorite(&state.user_id, &word_id).await?;
  Ok(Json(FavoriteOut { is_favorite }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_user(
  State(state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, AppError> {
  Ok(Json(state.store.user(&state.user_id).await?))
}

#[instrument(level = "info", skip(state), fields(amount = body.amount))]
pub async fn http_post_xp(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AwardIn>,
) -> Result<Json<UserProfile>, AppError> {
  Ok(Json(logic::award_xp_to_user(&state, body.amount).await?))
}

#[instrument(level = "info", skip(state), fields(amount = body.amount))]
pub async fn http_post_stars(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AwardIn>,
) -> Result<Json<UserProfile>, AppError> {
  Ok(Json(logic::award_stars_to_user(&state, body.amount).await?))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_profile(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ProfileIn>,
) -> Result<Json<UserProfile>, AppError> {
  let user = state
    .store
    .update_profile(&state.user_id, body.name, body.avatar)
    .await?;
  Ok(Json(user))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_leaderboard(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardOut>, AppError> {
  let period = q.period.unwrap_or_default();
  let limit = q.limit.unwrap_or(LEADERBOARD_DEFAULT_LIMIT);
  let entries = logic::leaderboard(&state, period, limit).await?;
  info!(target: "wordquest_backend", ?period, count = entries.len(), "Leaderboard served");
  Ok(Json(LeaderboardOut { entries }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_rank(
  State(state): State<Arc<AppState>>,
) -> Result<Json<RankOut>, AppError> {
  Ok(Json(RankOut { rank: logic::user_rank(&state).await? }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_gap(
  State(state): State<Arc<AppState>>,
) -> Result<Json<GapOut>, AppError> {
  Ok(Json(GapOut { gap: logic::gap_to_top10(&state).await? }))
}
