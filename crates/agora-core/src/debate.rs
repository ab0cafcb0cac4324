//! Debate — a timed pro/con contest with a cached lifecycle status.
//!
//! The `status` column is a projection of the time window plus manual
//! overrides (cancel). It is written only by the lifecycle machine in
//! [`crate::lifecycle`]; ordinary mutation paths never touch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, argument::Argument, user::User};

/// The lifecycle phase of a debate. `Finished` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
  Scheduled,
  Ongoing,
  Finished,
  Canceled,
}

impl DebateStatus {
  /// Terminal statuses never transition again, no matter what the clock says.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Finished | Self::Canceled)
  }
}

/// An optional grouping for debates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub category_id: Uuid,
  pub name:        String,
  pub slug:        String,
}

/// Derive a URL-safe slug from a category name.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut last_dash = true;
  for c in name.chars() {
    if c.is_alphanumeric() {
      slug.extend(c.to_lowercase());
      last_dash = false;
    } else if !last_dash {
      slug.push('-');
      last_dash = true;
    }
  }
  while slug.ends_with('-') {
    slug.pop();
  }
  slug
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debate {
  pub debate_id:   Uuid,
  pub title:       String,
  pub description: String,
  pub category_id: Option<Uuid>,
  pub author_id:   Uuid,
  pub created_at:  DateTime<Utc>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub status:      DebateStatus,
}

/// Input to [`crate::store::DebateStore::create_debate`]. The id, author,
/// creation timestamp, and initial `Scheduled` status are set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDebate {
  pub title:       String,
  pub description: String,
  pub category_id: Option<Uuid>,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
}

impl NewDebate {
  /// Creation guard: the window must be non-empty and lie strictly in the
  /// future at creation time.
  pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
    if self.end_time <= self.start_time {
      return Err(Error::Validation(
        "end time must be after start time".to_string(),
      ));
    }
    if self.start_time <= now {
      return Err(Error::Validation(
        "start time must be in the future".to_string(),
      ));
    }
    Ok(())
  }
}

/// The assembled read model for a single debate — never stored, always
/// joined together at query time.
#[derive(Debug, Clone, Serialize)]
pub struct DebateDetail {
  pub debate:       Debate,
  pub author:       User,
  pub category:     Option<Category>,
  pub arguments:    Vec<Argument>,
  pub participants: Vec<Uuid>,
}
