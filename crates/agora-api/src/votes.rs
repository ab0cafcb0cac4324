//! Handler for vote toggling.

use agora_core::{store::DebateStore, vote::VoteOutcome};
use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, debates::ActorBody, error::ApiError};

/// `POST /arguments/:id/vote` — body: `{"user_id":..}`
///
/// Toggles the caller's vote. Returns `{"status":"added"|"removed",
/// "vote_count":N}`.
pub async fn cast<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ActorBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let argument = state
    .store
    .get_argument(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("argument {id} not found")))?;

  // The vote guard reads the stored status; refresh it so a window that
  // just closed rejects the vote.
  state
    .store
    .recompute_status(argument.debate_id, Utc::now())
    .await
    .map_err(ApiError::from_store)?;

  let outcome = state
    .store
    .cast_vote(body.user_id, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(outcome))
}
