//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings (which order
//! lexicographically). Enums are stored as their lowercase serde tags.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use agora_core::{
  argument::{Argument, Side},
  debate::{Category, Debate, DebateStatus},
  user::{Level, User},
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DebateStatus ────────────────────────────────────────────────────────────

pub fn encode_status(s: DebateStatus) -> &'static str {
  match s {
    DebateStatus::Scheduled => "scheduled",
    DebateStatus::Ongoing => "ongoing",
    DebateStatus::Finished => "finished",
    DebateStatus::Canceled => "canceled",
  }
}

pub fn decode_status(s: &str) -> Result<DebateStatus> {
  match s {
    "scheduled" => Ok(DebateStatus::Scheduled),
    "ongoing" => Ok(DebateStatus::Ongoing),
    "finished" => Ok(DebateStatus::Finished),
    "canceled" => Ok(DebateStatus::Canceled),
    other => Err(Error::DateParse(format!("unknown debate status: {other:?}"))),
  }
}

// ─── Side ────────────────────────────────────────────────────────────────────

pub fn encode_side(s: Side) -> &'static str {
  match s {
    Side::Pro => "pro",
    Side::Con => "con",
  }
}

pub fn decode_side(s: &str) -> Result<Side> {
  match s {
    "pro" => Ok(Side::Pro),
    "con" => Ok(Side::Con),
    other => Err(Error::DateParse(format!("unknown side: {other:?}"))),
  }
}

// ─── Level ───────────────────────────────────────────────────────────────────

pub fn encode_level(l: Level) -> &'static str {
  match l {
    Level::Novice => "novice",
    Level::Competitor => "competitor",
    Level::Debater => "debater",
    Level::Orator => "orator",
    Level::Rhetorician => "rhetorician",
  }
}

pub fn decode_level(s: &str) -> Result<Level> {
  match s {
    "novice" => Ok(Level::Novice),
    "competitor" => Ok(Level::Competitor),
    "debater" => Ok(Level::Debater),
    "orator" => Ok(Level::Orator),
    "rhetorician" => Ok(Level::Rhetorician),
    other => Err(Error::DateParse(format!("unknown level: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub email:      String,
  pub xp:         i64,
  pub wins:       i64,
  pub level:      String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      email:      self.email,
      xp:         self.xp,
      wins:       self.wins,
      level:      decode_level(&self.level)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `debates` row.
pub struct RawDebate {
  pub debate_id:   String,
  pub title:       String,
  pub description: String,
  pub category_id: Option<String>,
  pub author_id:   String,
  pub created_at:  String,
  pub start_time:  String,
  pub end_time:    String,
  pub status:      String,
}

impl RawDebate {
  pub fn into_debate(self) -> Result<Debate> {
    Ok(Debate {
      debate_id:   decode_uuid(&self.debate_id)?,
      title:       self.title,
      description: self.description,
      category_id: self.category_id.as_deref().map(decode_uuid).transpose()?,
      author_id:   decode_uuid(&self.author_id)?,
      created_at:  decode_dt(&self.created_at)?,
      start_time:  decode_dt(&self.start_time)?,
      end_time:    decode_dt(&self.end_time)?,
      status:      decode_status(&self.status)?,
    })
  }
}

/// Raw strings read directly from an `arguments` row.
pub struct RawArgument {
  pub argument_id: String,
  pub debate_id:   String,
  pub author_id:   String,
  pub text:        String,
  pub side:        String,
  pub vote_count:  i64,
  pub winner:      bool,
  pub created_at:  String,
}

impl RawArgument {
  pub fn into_argument(self) -> Result<Argument> {
    Ok(Argument {
      argument_id: decode_uuid(&self.argument_id)?,
      debate_id:   decode_uuid(&self.debate_id)?,
      author_id:   decode_uuid(&self.author_id)?,
      text:        self.text,
      side:        decode_side(&self.side)?,
      vote_count:  self.vote_count,
      winner:      self.winner,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `categories` row.
pub struct RawCategory {
  pub category_id: String,
  pub name:        String,
  pub slug:        String,
}

impl RawCategory {
  pub fn into_category(self) -> Result<Category> {
    Ok(Category {
      category_id: decode_uuid(&self.category_id)?,
      name:        self.name,
      slug:        self.slug,
    })
  }
}
