//! Handlers for argument submission and deletion.

use agora_core::{
  argument::{NewArgument, Side},
  store::DebateStore,
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, debates::ActorParams, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub author_id: Uuid,
  pub text:      String,
  pub side:      Side,
}

/// `POST /debates/:id/arguments` — body: `{"author_id":..,"text":..,"side":"pro"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(debate_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  if body.text.trim().is_empty() {
    return Err(ApiError::Unprocessable(
      "argument text must not be empty".to_string(),
    ));
  }

  // The submission guard reads the stored status; bring it up to date so a
  // window that just opened accepts arguments without waiting for the
  // sweeper.
  state
    .store
    .recompute_status(debate_id, Utc::now())
    .await
    .map_err(ApiError::from_store)?;

  let input = NewArgument { text: body.text, side: body.side };
  let argument = state
    .store
    .create_argument(body.author_id, debate_id, input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(argument)))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /arguments/:id?user_id=..`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ActorParams>,
) -> Result<StatusCode, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  state
    .store
    .delete_argument(id, params.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
