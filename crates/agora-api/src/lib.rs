//! JSON REST API for Agora.
//!
//! Exposes an axum [`Router`] backed by any
//! [`agora_core::store::DebateStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! Status-sensitive endpoints recompute the target debate's lifecycle
//! status from the clock before acting, so clients observe window edges
//! immediately rather than at the next sweeper tick.

pub mod arguments;
pub mod categories;
pub mod debates;
pub mod error;
pub mod users;
pub mod votes;

use std::{path::PathBuf, sync::Arc, time::Duration};

use agora_core::store::DebateStore;
use axum::{
  Router,
  routing::{delete, get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use categories::CategoryCache;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:    String,
  pub port:    u16,
  pub db_path: PathBuf,

  /// How often the background sweeper recomputes debate statuses.
  #[serde(default = "default_sweep_interval_secs")]
  pub sweep_interval_secs: u64,

  /// How long the category list may be served from memory.
  #[serde(default = "default_category_ttl_secs")]
  pub category_ttl_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
  30
}

fn default_category_ttl_secs() -> u64 {
  3600
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub categories: Arc<CategoryCache>,
}

// Manual impl: `Arc` fields clone regardless of whether `S` does.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      categories: self.categories.clone(),
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, category_ttl: Duration) -> Self {
    Self {
      store:      Arc::new(store),
      categories: Arc::new(CategoryCache::new(category_ttl)),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DebateStore + 'static,
  S::Error: Into<agora_core::Error>,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route("/leaderboard", get(users::leaderboard::<S>))
    // Categories
    .route(
      "/categories",
      get(categories::list::<S>).post(categories::create::<S>),
    )
    // Debates
    .route("/debates", get(debates::list::<S>).post(debates::create::<S>))
    .route(
      "/debates/{id}",
      get(debates::get_one::<S>).delete(debates::delete_one::<S>),
    )
    .route("/debates/{id}/cancel", post(debates::cancel::<S>))
    .route("/debates/{id}/join", post(debates::join::<S>))
    .route("/debates/{id}/refresh", post(debates::refresh::<S>))
    .route("/debates/{id}/arguments", post(arguments::create::<S>))
    // Arguments
    .route("/arguments/{id}", delete(arguments::delete_one::<S>))
    .route("/arguments/{id}/vote", post(votes::cast::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use agora_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::Utc;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, Duration::from_secs(60))
  }

  async fn request(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register(state: &AppState<SqliteStore>, name: &str) -> String {
    let (status, body) = request(
      state,
      "POST",
      "/users",
      Some(json!({ "username": name, "email": format!("{name}@example.com") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["user_id"].as_str().unwrap().to_string()
  }

  /// Create a debate whose window opens `start_ms` from now.
  async fn create_debate(
    state: &AppState<SqliteStore>,
    author: &str,
    start_ms: i64,
  ) -> String {
    let now = Utc::now();
    let (status, body) = request(
      state,
      "POST",
      "/debates",
      Some(json!({
        "author_id": author,
        "title": "Tabs vs spaces",
        "description": "Settle it forever",
        "start_time": (now + chrono::Duration::milliseconds(start_ms)).to_rfc3339(),
        "end_time": (now + chrono::Duration::hours(1)).to_rfc3339(),
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create debate: {body}");
    body["debate_id"].as_str().unwrap().to_string()
  }

  // ── Users ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_and_fetch_user() {
    let state = state().await;
    let id = register(&state, "alice").await;

    let (status, body) = request(&state, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["xp"], 0);
    assert_eq!(body["level"], "novice");
  }

  #[tokio::test]
  async fn unknown_user_returns_404() {
    let state = state().await;
    let (status, body) = request(
      &state,
      "GET",
      &format!("/users/{}", uuid::Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn duplicate_username_returns_422() {
    let state = state().await;
    register(&state, "alice").await;

    let (status, _) = request(
      &state,
      "POST",
      "/users",
      Some(json!({ "username": "alice", "email": "other@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn blank_username_returns_422() {
    let state = state().await;
    let (status, _) = request(
      &state,
      "POST",
      "/users",
      Some(json!({ "username": "  ", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  // ── Categories ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn category_create_and_list() {
    let state = state().await;

    let (status, body) = request(
      &state,
      "POST",
      "/categories",
      Some(json!({ "name": "Science & Tech" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["slug"], "science-tech");

    // Listed (and cached) afterwards.
    let (status, body) = request(&state, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, body) = request(&state, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn blank_category_returns_422() {
    let state = state().await;
    let (status, _) =
      request(&state, "POST", "/categories", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn category_cache_sees_new_writes() {
    let state = state().await;

    request(&state, "POST", "/categories", Some(json!({ "name": "One" }))).await;
    let (_, body) = request(&state, "GET", "/categories", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // A write invalidates the cached list.
    request(&state, "POST", "/categories", Some(json!({ "name": "Two" }))).await;
    let (_, body) = request(&state, "GET", "/categories", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  // ── Debates ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn invalid_debate_window_returns_422() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let now = Utc::now();

    let (status, body) = request(
      &state,
      "POST",
      "/debates",
      Some(json!({
        "author_id": author,
        "title": "Too late",
        "description": "Already started",
        "start_time": (now - chrono::Duration::minutes(5)).to_rfc3339(),
        "end_time": (now + chrono::Duration::hours(1)).to_rfc3339(),
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("future"));
  }

  #[tokio::test]
  async fn debate_detail_and_listing() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let id = create_debate(&state, &author, 60_000).await;

    let (status, body) =
      request(&state, "GET", &format!("/debates/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["debate"]["status"], "scheduled");
    assert_eq!(body["author"]["username"], "alice");
    assert_eq!(body["arguments"].as_array().unwrap().len(), 0);

    let (status, body) = request(&state, "GET", "/debates?search=tabs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn cancel_flow_over_http() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let stranger = register(&state, "mallory").await;
    let id = create_debate(&state, &author, 60_000).await;

    let (status, _) = request(
      &state,
      "POST",
      &format!("/debates/{id}/cancel"),
      Some(json!({ "user_id": stranger })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request(
      &state,
      "POST",
      &format!("/debates/{id}/cancel"),
      Some(json!({ "user_id": author })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "canceled");

    // Terminal: a second cancel conflicts.
    let (status, _) = request(
      &state,
      "POST",
      &format!("/debates/{id}/cancel"),
      Some(json!({ "user_id": author })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn cancel_after_window_elapsed_conflicts() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let now = Utc::now();

    let (status, body) = request(
      &state,
      "POST",
      "/debates",
      Some(json!({
        "author_id": author,
        "title": "Blink and you miss it",
        "description": "A very short window",
        "start_time": (now + chrono::Duration::milliseconds(100)).to_rfc3339(),
        "end_time": (now + chrono::Duration::milliseconds(300)).to_rfc3339(),
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create debate: {body}");
    let id = body["debate_id"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // The window has fully elapsed: the debate is Finished, not cancelable,
    // even though no sweep has run yet.
    let (status, _) = request(
      &state,
      "POST",
      &format!("/debates/{id}/cancel"),
      Some(json!({ "user_id": author })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = request(&state, "GET", &format!("/debates/{id}"), None).await;
    assert_eq!(body["debate"]["status"], "finished");
  }

  #[tokio::test]
  async fn delete_debate_is_author_only() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let stranger = register(&state, "mallory").await;
    let id = create_debate(&state, &author, 60_000).await;

    let (status, _) = request(
      &state,
      "DELETE",
      &format!("/debates/{id}?user_id={stranger}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
      &state,
      "DELETE",
      &format!("/debates/{id}?user_id={author}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&state, "GET", &format!("/debates/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Arguments & votes ───────────────────────────────────────────────────

  #[tokio::test]
  async fn argument_and_vote_flow() {
    let state = state().await;
    let author = register(&state, "alice").await;
    let voter = register(&state, "bob").await;
    let id = create_debate(&state, &author, 100).await;

    // Window not open yet.
    let (status, _) = request(
      &state,
      "POST",
      &format!("/debates/{id}/arguments"),
      Some(json!({ "author_id": author, "text": "too early", "side": "pro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    tokio::time::sleep(std::time::Duration::from_millis(250)).await;

    // The handler recomputes status first, so no sweep is needed.
    let (status, body) = request(
      &state,
      "POST",
      &format!("/debates/{id}/arguments"),
      Some(json!({ "author_id": author, "text": "on time", "side": "pro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create argument: {body}");
    let arg_id = body["argument_id"].as_str().unwrap().to_string();

    // Toggle on.
    let (status, body) = request(
      &state,
      "POST",
      &format!("/arguments/{arg_id}/vote"),
      Some(json!({ "user_id": voter })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "added");
    assert_eq!(body["vote_count"], 1);

    let (_, body) = request(&state, "GET", &format!("/users/{author}"), None).await;
    assert_eq!(body["xp"], 2);

    // Toggle off.
    let (status, body) = request(
      &state,
      "POST",
      &format!("/arguments/{arg_id}/vote"),
      Some(json!({ "user_id": voter })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "removed");
    assert_eq!(body["vote_count"], 0);

    let (_, body) = request(&state, "GET", &format!("/users/{author}"), None).await;
    assert_eq!(body["xp"], 0);
  }

  #[tokio::test]
  async fn vote_on_unknown_argument_returns_404() {
    let state = state().await;
    let voter = register(&state, "bob").await;

    let (status, _) = request(
      &state,
      "POST",
      &format!("/arguments/{}/vote", uuid::Uuid::new_v4()),
      Some(json!({ "user_id": voter })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Leaderboard ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn leaderboard_returns_users() {
    let state = state().await;
    register(&state, "alice").await;
    register(&state, "bob").await;

    let (status, body) = request(&state, "GET", "/leaderboard?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = request(&state, "GET", "/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
  }
}
