//! User — the account that authors debates, argues, and votes.
//!
//! A user's level is never set directly; it is a pure projection of
//! accumulated XP (see [`crate::rewards::level_for_xp`]) and is recomputed
//! inside every transaction that mutates XP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The rank ladder, lowest to highest.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  #[default]
  Novice,
  Competitor,
  Debater,
  Orator,
  Rhetorician,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub username:   String,
  pub email:      String,
  pub xp:         i64,
  pub wins:       i64,
  /// Always equal to `level_for_xp(xp)`.
  pub level:      Level,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::DebateStore::create_user`]. Everything else
/// (id, timestamps, zeroed counters) is set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub username: String,
  pub email:    String,
}
