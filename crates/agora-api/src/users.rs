//! Handlers for `/users` and `/leaderboard`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"username":..,"email":..}` |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/leaderboard` | Optional `?limit=N`, default 20 |

use agora_core::{
  store::DebateStore,
  user::{NewUser, User},
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /users` — body: `{"username":"alice","email":"alice@example.com"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  if body.username.trim().is_empty() || body.email.trim().is_empty() {
    return Err(ApiError::Unprocessable(
      "username and email must not be empty".to_string(),
    ));
  }
  let user = state
    .store
    .create_user(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit: Option<usize>,
}

/// `GET /leaderboard[?limit=N]`
pub async fn leaderboard<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let users = state
    .store
    .leaderboard(params.limit.unwrap_or(20))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(users))
}
