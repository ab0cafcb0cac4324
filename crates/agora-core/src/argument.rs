//! Argument — a pro or con statement submitted to an ongoing debate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the debate an argument supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Pro,
  Con,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
  pub argument_id: Uuid,
  pub debate_id:   Uuid,
  pub author_id:   Uuid,
  pub text:        String,
  pub side:        Side,
  /// Denormalized cache; always equal to the number of vote rows referencing
  /// this argument. Maintained inside the vote-toggle transaction.
  pub vote_count:  i64,
  /// Set true for at most one argument per debate, only by the finish step.
  pub winner:      bool,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::DebateStore::create_argument`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewArgument {
  pub text: String,
  pub side: Side,
}
