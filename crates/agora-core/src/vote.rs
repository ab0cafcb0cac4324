//! Vote toggling — the observable results of a (user, argument) endorsement.
//!
//! At most one vote row exists per (user, argument) pair; casting again
//! removes the row instead of duplicating it. The rows themselves live in
//! the storage backend; callers only ever see the toggle outcome.

use serde::{Deserialize, Serialize};

/// What a vote toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
  Added,
  Removed,
}

/// The observable result of [`crate::store::DebateStore::cast_vote`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
  pub status:     VoteStatus,
  /// The argument's vote count after the toggle.
  pub vote_count: i64,
}
