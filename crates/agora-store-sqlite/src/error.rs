//! Error type for `agora-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain-rule violation detected inside a transaction (wrong lifecycle
  /// state, missing row, ownership failure, ...).
  #[error(transparent)]
  Domain(#[from] agora_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Collapse a store error into the core taxonomy so the API layer can map
/// it to a status code without depending on this crate's internals.
impl From<Error> for agora_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Domain(d) => d,
      other => agora_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
