//! Handlers for `/categories`, plus the TTL cache over the category list.

use std::time::{Duration, Instant};

use agora_core::{debate::Category, store::DebateStore};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{AppState, error::ApiError};

// ─── Cache ───────────────────────────────────────────────────────────────────

/// Time-bounded cache of the full category list.
///
/// Categories change rarely, so the list is served from memory until `ttl`
/// elapses or a category write invalidates it.
pub struct CategoryCache {
  ttl:   Duration,
  entry: RwLock<Option<(Instant, Vec<Category>)>>,
}

impl CategoryCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entry: RwLock::new(None) }
  }

  pub async fn get(&self) -> Option<Vec<Category>> {
    let guard = self.entry.read().await;
    match &*guard {
      Some((filled_at, list)) if filled_at.elapsed() < self.ttl => {
        Some(list.clone())
      }
      _ => None,
    }
  }

  pub async fn put(&self, list: Vec<Category>) {
    *self.entry.write().await = Some((Instant::now(), list));
  }

  pub async fn invalidate(&self) {
    *self.entry.write().await = None;
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /categories`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Category>>, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  if let Some(cached) = state.categories.get().await {
    return Ok(Json(cached));
  }

  let fresh = state
    .store
    .list_categories()
    .await
    .map_err(ApiError::from_store)?;
  state.categories.put(fresh.clone()).await;
  Ok(Json(fresh))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /categories` — body: `{"name":"Science"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  S::Error: Into<agora_core::Error>,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::Unprocessable(
      "category name must not be empty".to_string(),
    ));
  }

  let category = state
    .store
    .create_category(body.name)
    .await
    .map_err(ApiError::from_store)?;
  state.categories.invalidate().await;
  Ok((StatusCode::CREATED, Json(category)))
}
