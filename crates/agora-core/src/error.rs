//! Error types for `agora-core`.
//!
//! The taxonomy matters to callers: validation failures are the requester's
//! input being malformed, state-guard failures are actions attempted against
//! the wrong lifecycle phase, and not-found failures are dangling references.
//! None of these is retryable.

use thiserror::Error;
use uuid::Uuid;

use crate::debate::DebateStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or out-of-window input, e.g. a debate window that ends before
  /// it starts.
  #[error("{0}")]
  Validation(String),

  #[error("debate not found: {0}")]
  DebateNotFound(Uuid),

  #[error("argument not found: {0}")]
  ArgumentNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("category not found: {0}")]
  CategoryNotFound(Uuid),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("email {0:?} is already registered")]
  EmailTaken(String),

  /// Argument submission or voting attempted outside the active window.
  #[error("debate {0} is not ongoing")]
  DebateNotOngoing(Uuid),

  #[error("debate {debate_id} cannot be canceled from status {status:?}")]
  NotCancelable {
    debate_id: Uuid,
    status:    DebateStatus,
  },

  /// The acting user does not own the resource they tried to mutate.
  #[error("user {0} is not the author of this resource")]
  NotAuthor(Uuid),

  /// An opaque backend failure surfaced through the store seam.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
