//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Lift a store error into the HTTP taxonomy via the core error type.
  pub fn from_store<E: Into<agora_core::Error>>(e: E) -> Self {
    Self::from(e.into())
  }
}

impl From<agora_core::Error> for ApiError {
  fn from(e: agora_core::Error) -> Self {
    use agora_core::Error as E;

    let msg = e.to_string();
    match e {
      E::Validation(_) | E::UsernameTaken(_) | E::EmailTaken(_) => {
        ApiError::Unprocessable(msg)
      }
      E::DebateNotFound(_)
      | E::ArgumentNotFound(_)
      | E::UserNotFound(_)
      | E::CategoryNotFound(_) => ApiError::NotFound(msg),
      E::DebateNotOngoing(_) | E::NotCancelable { .. } => ApiError::Conflict(msg),
      E::NotAuthor(_) => ApiError::Forbidden(msg),
      E::Storage(_) => ApiError::Internal(msg),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
