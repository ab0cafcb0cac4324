//! Handlers for `/debates` endpoints.
//!
//! Reads and writes that depend on a debate's status bring it up to date
//! from the clock first, so a window that opened or closed between sweeper
//! ticks is observed immediately.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/debates` | `?category=`, `?search=`, `?limit=`, `?offset=` |
//! | `POST`   | `/debates` | 422 if the window is invalid |
//! | `GET`    | `/debates/:id` | Full detail; recomputes status first |
//! | `DELETE` | `/debates/:id?user_id=` | Author-only; cascades |
//! | `POST`   | `/debates/:id/cancel` | Author-only; 409 once terminal |
//! | `POST`   | `/debates/:id/join` | Idempotent |
//! | `POST`   | `/debates/:id/refresh` | Returns the recomputed debate |

use agora_core::{
  debate::{Debate, DebateDetail, NewDebate},
  store::{DebateQuery, DebateStore},
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Request body identifying the acting user.
#[derive(Debug, Deserialize)]
pub struct ActorBody {
  pub user_id: Uuid,
}

/// Query parameter identifying the acting user (for DELETE requests).
#[derive(Debug, Deserialize)]
pub struct ActorParams {
  pub user_id: Uuid,
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
  pub search:   Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /debates[?category=..&search=..&limit=..&offset=..]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Debate>>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let query = DebateQuery {
    category: params.category,
    search:   params.search,
    limit:    params.limit,
    offset:   params.offset,
  };
  let debates = state
    .store
    .list_debates(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(debates))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub author_id:   Uuid,
  pub title:       String,
  pub description: String,
  #[serde(default)]
  pub category_id: Option<Uuid>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
}

/// `POST /debates`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let input = NewDebate {
    title:       body.title,
    description: body.description,
    category_id: body.category_id,
    start_time:  body.start_time,
    end_time:    body.end_time,
  };
  let debate = state
    .store
    .create_debate(body.author_id, input, Utc::now())
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(debate)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /debates/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DebateDetail>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  state
    .store
    .recompute_status(id, Utc::now())
    .await
    .map_err(ApiError::from_store)?;

  let detail = state
    .store
    .debate_detail(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("debate {id} not found")))?;
  Ok(Json(detail))
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

/// `POST /debates/:id/refresh` — recompute status from the clock now.
pub async fn refresh<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Debate>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  let debate = state
    .store
    .recompute_status(id, Utc::now())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(debate))
}

// ─── Cancel ──────────────────────────────────────────────────────────────────

/// `POST /debates/:id/cancel` — body: `{"user_id":..}`
pub async fn cancel<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ActorBody>,
) -> Result<Json<Debate>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  // Apply any pending clock transition first: a debate whose window has
  // already elapsed is Finished (with rewards paid), not cancelable.
  state
    .store
    .recompute_status(id, Utc::now())
    .await
    .map_err(ApiError::from_store)?;

  let debate = state
    .store
    .cancel_debate(id, body.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(debate))
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// `POST /debates/:id/join` — body: `{"user_id":..}`
pub async fn join<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ActorBody>,
) -> Result<StatusCode, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  state
    .store
    .join_debate(id, body.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /debates/:id?user_id=..`
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
    .delete_debate(id, params.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
