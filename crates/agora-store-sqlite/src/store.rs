//! [`SqliteStore`] — the SQLite implementation of [`DebateStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use agora_core::{
  argument::{Argument, NewArgument},
  debate::{Category, Debate, DebateDetail, DebateStatus, NewDebate, slugify},
  lifecycle::{plan_transition, select_winner},
  rewards,
  store::{DebateQuery, DebateStore},
  user::{NewUser, User},
  vote::{VoteOutcome, VoteStatus},
};

use crate::{
  Error, Result,
  encode::{
    RawArgument, RawCategory, RawDebate, RawUser, decode_status, encode_dt,
    encode_level, encode_side, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Error plumbing ──────────────────────────────────────────────────────────

/// Smuggle a domain error out of a `conn.call` closure.
fn domain(e: agora_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Smuggle a store error (decode failure) out of a `conn.call` closure.
fn store_err(e: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Recover typed errors smuggled through [`tokio_rusqlite::Error::Other`].
fn from_call(e: tokio_rusqlite::Error) -> Error {
  match e {
    tokio_rusqlite::Error::Other(boxed) => {
      let boxed = match boxed.downcast::<agora_core::Error>() {
        Ok(d) => return Error::Domain(*d),
        Err(b) => b,
      };
      match boxed.downcast::<Error>() {
        Ok(s) => *s,
        Err(b) => Error::Database(tokio_rusqlite::Error::Other(b)),
      }
    }
    other => Error::Database(other),
  }
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    username:   row.get(1)?,
    email:      row.get(2)?,
    xp:         row.get(3)?,
    wins:       row.get(4)?,
    level:      row.get(5)?,
    created_at: row.get(6)?,
  })
}

const USER_COLS: &str = "user_id, username, email, xp, wins, level, created_at";

fn debate_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDebate> {
  Ok(RawDebate {
    debate_id:   row.get(0)?,
    title:       row.get(1)?,
    description: row.get(2)?,
    category_id: row.get(3)?,
    author_id:   row.get(4)?,
    created_at:  row.get(5)?,
    start_time:  row.get(6)?,
    end_time:    row.get(7)?,
    status:      row.get(8)?,
  })
}

const DEBATE_COLS: &str = "debate_id, title, description, category_id, \
                           author_id, created_at, start_time, end_time, status";

fn argument_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawArgument> {
  Ok(RawArgument {
    argument_id: row.get(0)?,
    debate_id:   row.get(1)?,
    author_id:   row.get(2)?,
    text:        row.get(3)?,
    side:        row.get(4)?,
    vote_count:  row.get(5)?,
    winner:      row.get(6)?,
    created_at:  row.get(7)?,
  })
}

const ARGUMENT_COLS: &str =
  "argument_id, debate_id, author_id, text, side, vote_count, winner, created_at";

// ─── Transaction helpers ─────────────────────────────────────────────────────

/// Adjust a user's XP (and optionally wins) and recompute their level, all
/// within the caller's transaction. The level column never diverges from
/// `level_for_xp(xp)` because both updates commit together.
fn apply_xp_delta(
  tx: &rusqlite::Transaction<'_>,
  user_id: &str,
  xp_delta: i64,
  wins_delta: i64,
) -> std::result::Result<(), tokio_rusqlite::Error> {
  tx.execute(
    "UPDATE users SET xp = xp + ?2, wins = wins + ?3 WHERE user_id = ?1",
    rusqlite::params![user_id, xp_delta, wins_delta],
  )?;

  let xp: i64 = tx.query_row(
    "SELECT xp FROM users WHERE user_id = ?1",
    rusqlite::params![user_id],
    |r| r.get(0),
  )?;

  tx.execute(
    "UPDATE users SET level = ?2 WHERE user_id = ?1",
    rusqlite::params![user_id, encode_level(rewards::level_for_xp(xp))],
  )?;

  Ok(())
}

fn user_exists(
  tx: &rusqlite::Transaction<'_>,
  user_id: &str,
) -> std::result::Result<bool, tokio_rusqlite::Error> {
  let exists: bool = tx
    .query_row(
      "SELECT 1 FROM users WHERE user_id = ?1",
      rusqlite::params![user_id],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  Ok(exists)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Agora store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// for one store funnel through one connection, so conflicting transactions
/// serialize instead of racing.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Apply at most one clock-driven transition to a debate, running the
  /// finish side effect inside the same transaction when the
  /// Ongoing→Finished edge fires. Returns the (possibly updated) debate and
  /// whether anything changed.
  ///
  /// Votes committed after this transaction begins are excluded from winner
  /// selection: the candidate read and the reward write share one
  /// transaction on the store's single writer connection.
  async fn apply_clock(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<(Debate, bool)> {
    let id_str = encode_uuid(id);

    let (raw, changed): (RawDebate, bool) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut raw = {
          let sql = format!("SELECT {DEBATE_COLS} FROM debates WHERE debate_id = ?1");
          tx.query_row(&sql, rusqlite::params![id_str], debate_row)
            .optional()?
            .ok_or_else(|| domain(agora_core::Error::DebateNotFound(id)))?
        };

        let current = decode_status(&raw.status).map_err(store_err)?;
        let start =
          crate::encode::decode_dt(&raw.start_time).map_err(store_err)?;
        let end = crate::encode::decode_dt(&raw.end_time).map_err(store_err)?;

        let Some(transition) = plan_transition(current, start, end, now) else {
          return Ok((raw, false));
        };

        tx.execute(
          "UPDATE debates SET status = ?2 WHERE debate_id = ?1",
          rusqlite::params![id_str, encode_status(transition.to)],
        )?;
        raw.status = encode_status(transition.to).to_string();

        if transition.triggers_finish() {
          // Winner selection reads the counts as of this transaction.
          let candidates: Vec<RawArgument> = {
            let sql = format!(
              "SELECT {ARGUMENT_COLS} FROM arguments
               WHERE debate_id = ?1 AND vote_count > 0"
            );
            let mut stmt = tx.prepare(&sql)?;
            stmt
              .query_map(rusqlite::params![id_str], argument_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          };

          let arguments: Vec<Argument> = candidates
            .into_iter()
            .map(RawArgument::into_argument)
            .collect::<Result<_>>()
            .map_err(store_err)?;

          if let Some(winner) = select_winner(&arguments) {
            let winner_id = encode_uuid(winner.argument_id);
            let author_id = encode_uuid(winner.author_id);

            tx.execute(
              "UPDATE arguments SET winner = 1 WHERE argument_id = ?1",
              rusqlite::params![winner_id],
            )?;
            apply_xp_delta(
              &tx,
              &author_id,
              rewards::WIN_XP,
              rewards::wins_delta_for_win(),
            )?;
          }
        }

        tx.commit()?;
        Ok((raw, true))
      })
      .await
      .map_err(from_call)?;

    Ok((raw.into_debate()?, changed))
  }

  async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT category_id, name, slug FROM categories WHERE category_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCategory {
                  category_id: row.get(0)?,
                  name:        row.get(1)?,
                  slug:        row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCategory::into_category).transpose()
  }
}

// ─── DebateStore impl ────────────────────────────────────────────────────────

impl DebateStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      username:   input.username,
      email:      input.email,
      xp:         0,
      wins:       0,
      level:      rewards::level_for_xp(0),
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let email    = user.email.clone();
    let at_str   = encode_dt(user.created_at);
    let level    = encode_level(user.level).to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let username_taken: bool = tx
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if username_taken {
          return Err(domain(agora_core::Error::UsernameTaken(username)));
        }

        let email_taken: bool = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if email_taken {
          return Err(domain(agora_core::Error::EmailTaken(email)));
        }

        tx.execute(
          "INSERT INTO users (user_id, username, email, xp, wins, level, created_at)
           VALUES (?1, ?2, ?3, 0, 0, ?4, ?5)",
          rusqlite::params![id_str, username, email, level, at_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], user_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<User>> {
    let limit_val = limit as i64;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {USER_COLS} FROM users
           ORDER BY xp DESC, wins DESC, username ASC
           LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], user_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn create_category(&self, name: String) -> Result<Category> {
    let category = Category {
      category_id: Uuid::new_v4(),
      slug:        slugify(&name),
      name,
    };

    let id_str = encode_uuid(category.category_id);
    let name   = category.name.clone();
    let slug   = category.slug.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (category_id, name, slug) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, slug],
        )?;
        Ok(())
      })
      .await?;

    Ok(category)
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let raws: Vec<RawCategory> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT category_id, name, slug FROM categories ORDER BY name ASC")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCategory {
              category_id: row.get(0)?,
              name:        row.get(1)?,
              slug:        row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCategory::into_category).collect()
  }

  // ── Debates ───────────────────────────────────────────────────────────────

  async fn create_debate(
    &self,
    author_id: Uuid,
    input: NewDebate,
    now: DateTime<Utc>,
  ) -> Result<Debate> {
    input.validate(now).map_err(Error::Domain)?;

    let debate = Debate {
      debate_id:   Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      category_id: input.category_id,
      author_id,
      created_at:  now,
      start_time:  input.start_time,
      end_time:    input.end_time,
      status:      DebateStatus::Scheduled,
    };

    let id_str       = encode_uuid(debate.debate_id);
    let title        = debate.title.clone();
    let description  = debate.description.clone();
    let category_str = debate.category_id.map(encode_uuid);
    let author_str   = encode_uuid(author_id);
    let created_str  = encode_dt(debate.created_at);
    let start_str    = encode_dt(debate.start_time);
    let end_str      = encode_dt(debate.end_time);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !user_exists(&tx, &author_str)? {
          return Err(domain(agora_core::Error::UserNotFound(author_id)));
        }

        if let Some(cat) = &category_str {
          let cat_exists: bool = tx
            .query_row(
              "SELECT 1 FROM categories WHERE category_id = ?1",
              rusqlite::params![cat],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !cat_exists {
            return Err(domain(agora_core::Error::CategoryNotFound(
              debate.category_id.unwrap_or_default(),
            )));
          }
        }

        tx.execute(
          "INSERT INTO debates (
             debate_id, title, description, category_id, author_id,
             created_at, start_time, end_time, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'scheduled')",
          rusqlite::params![
            id_str,
            title,
            description,
            category_str,
            author_str,
            created_str,
            start_str,
            end_str,
          ],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)?;

    Ok(debate)
  }

  async fn get_debate(&self, id: Uuid) -> Result<Option<Debate>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDebate> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {DEBATE_COLS} FROM debates WHERE debate_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], debate_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDebate::into_debate).transpose()
  }

  async fn debate_detail(&self, id: Uuid) -> Result<Option<DebateDetail>> {
    let debate = match self.get_debate(id).await? {
      Some(d) => d,
      None => return Ok(None),
    };

    let author = self
      .get_user(debate.author_id)
      .await?
      .ok_or(Error::Domain(agora_core::Error::UserNotFound(debate.author_id)))?;

    let category = match debate.category_id {
      Some(cid) => self.get_category(cid).await?,
      None => None,
    };

    let id_str = encode_uuid(id);
    let arg_raws: Vec<RawArgument> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ARGUMENT_COLS} FROM arguments
           WHERE debate_id = ?1
           ORDER BY created_at ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], argument_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let arguments: Vec<Argument> = arg_raws
      .into_iter()
      .map(RawArgument::into_argument)
      .collect::<Result<_>>()?;

    let id_str = encode_uuid(id);
    let participant_strs: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id FROM debate_participants
           WHERE debate_id = ?1
           ORDER BY joined_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    let participants: Vec<Uuid> = participant_strs
      .iter()
      .map(|s| crate::encode::decode_uuid(s))
      .collect::<Result<_>>()?;

    Ok(Some(DebateDetail { debate, author, category, arguments, participants }))
  }

  async fn list_debates(&self, query: &DebateQuery) -> Result<Vec<Debate>> {
    let category_pattern = query.category.as_deref().map(|c| format!("%{c}%"));
    let search_pattern   = query.search.as_deref().map(|s| format!("%{s}%"));
    let limit_val        = query.limit.unwrap_or(100) as i64;
    let offset_val       = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawDebate> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<&'static str> = vec![];
        if category_pattern.is_some() {
          conds.push("c.name LIKE ?1");
        }
        if search_pattern.is_some() {
          conds.push("d.title LIKE ?2");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT d.debate_id, d.title, d.description, d.category_id,
                  d.author_id, d.created_at, d.start_time, d.end_time, d.status
           FROM debates d
           LEFT JOIN categories c ON c.category_id = d.category_id
           {where_clause}
           ORDER BY d.created_at DESC
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              category_pattern.as_deref(),
              search_pattern.as_deref(),
              limit_val,
              offset_val,
            ],
            debate_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDebate::into_debate).collect()
  }

  async fn cancel_debate(&self, id: Uuid, acting_user: Uuid) -> Result<Debate> {
    let id_str     = encode_uuid(id);
    let acting_str = encode_uuid(acting_user);

    let raw: RawDebate = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut raw = {
          let sql = format!("SELECT {DEBATE_COLS} FROM debates WHERE debate_id = ?1");
          tx.query_row(&sql, rusqlite::params![id_str], debate_row)
            .optional()?
            .ok_or_else(|| domain(agora_core::Error::DebateNotFound(id)))?
        };

        if raw.author_id != acting_str {
          return Err(domain(agora_core::Error::NotAuthor(acting_user)));
        }

        let status = decode_status(&raw.status).map_err(store_err)?;
        if status.is_terminal() {
          return Err(domain(agora_core::Error::NotCancelable {
            debate_id: id,
            status,
          }));
        }

        tx.execute(
          "UPDATE debates SET status = 'canceled' WHERE debate_id = ?1",
          rusqlite::params![id_str],
        )?;
        raw.status = "canceled".to_string();

        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(from_call)?;

    raw.into_debate()
  }

  async fn delete_debate(&self, id: Uuid, acting_user: Uuid) -> Result<()> {
    let id_str     = encode_uuid(id);
    let acting_str = encode_uuid(acting_user);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let author: String = tx
          .query_row(
            "SELECT author_id FROM debates WHERE debate_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?
          .ok_or_else(|| domain(agora_core::Error::DebateNotFound(id)))?;

        if author != acting_str {
          return Err(domain(agora_core::Error::NotAuthor(acting_user)));
        }

        // Arguments and votes go with it (ON DELETE CASCADE).
        tx.execute(
          "DELETE FROM debates WHERE debate_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)
  }

  async fn join_debate(&self, id: Uuid, user_id: Uuid) -> Result<()> {
    let id_str   = encode_uuid(id);
    let user_str = encode_uuid(user_id);
    let at_str   = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let debate_exists: bool = tx
          .query_row(
            "SELECT 1 FROM debates WHERE debate_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !debate_exists {
          return Err(domain(agora_core::Error::DebateNotFound(id)));
        }

        if !user_exists(&tx, &user_str)? {
          return Err(domain(agora_core::Error::UserNotFound(user_id)));
        }

        // Set semantics: joining twice is a no-op.
        tx.execute(
          "INSERT OR IGNORE INTO debate_participants (debate_id, user_id, joined_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, user_str, at_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)
  }

  async fn recompute_status(&self, id: Uuid, now: DateTime<Utc>) -> Result<Debate> {
    let (debate, _changed) = self.apply_clock(id, now).await?;
    Ok(debate)
  }

  async fn sweep_statuses(&self, now: DateTime<Utc>) -> Result<usize> {
    let ids: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT debate_id FROM debates WHERE status IN ('scheduled', 'ongoing')",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    let mut transitioned = 0;
    for id_str in ids {
      let id = crate::encode::decode_uuid(&id_str)?;
      let (_, changed) = self.apply_clock(id, now).await?;
      if changed {
        transitioned += 1;
      }
    }

    Ok(transitioned)
  }

  // ── Arguments ─────────────────────────────────────────────────────────────

  async fn create_argument(
    &self,
    author_id: Uuid,
    debate_id: Uuid,
    input: NewArgument,
  ) -> Result<Argument> {
    let argument = Argument {
      argument_id: Uuid::new_v4(),
      debate_id,
      author_id,
      text: input.text,
      side: input.side,
      vote_count: 0,
      winner: false,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(argument.argument_id);
    let debate_str = encode_uuid(debate_id);
    let author_str = encode_uuid(author_id);
    let text       = argument.text.clone();
    let side       = encode_side(argument.side).to_owned();
    let at_str     = encode_dt(argument.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let status_str: String = tx
          .query_row(
            "SELECT status FROM debates WHERE debate_id = ?1",
            rusqlite::params![debate_str],
            |r| r.get(0),
          )
          .optional()?
          .ok_or_else(|| domain(agora_core::Error::DebateNotFound(debate_id)))?;

        let status = decode_status(&status_str).map_err(store_err)?;
        if status != DebateStatus::Ongoing {
          return Err(domain(agora_core::Error::DebateNotOngoing(debate_id)));
        }

        if !user_exists(&tx, &author_str)? {
          return Err(domain(agora_core::Error::UserNotFound(author_id)));
        }

        tx.execute(
          "INSERT INTO arguments (
             argument_id, debate_id, author_id, text, side,
             vote_count, winner, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)",
          rusqlite::params![id_str, debate_str, author_str, text, side, at_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)?;

    Ok(argument)
  }

  async fn get_argument(&self, id: Uuid) -> Result<Option<Argument>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawArgument> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {ARGUMENT_COLS} FROM arguments WHERE argument_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], argument_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArgument::into_argument).transpose()
  }

  async fn delete_argument(&self, id: Uuid, acting_user: Uuid) -> Result<()> {
    let id_str     = encode_uuid(id);
    let acting_str = encode_uuid(acting_user);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let author: String = tx
          .query_row(
            "SELECT author_id FROM arguments WHERE argument_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?
          .ok_or_else(|| domain(agora_core::Error::ArgumentNotFound(id)))?;

        if author != acting_str {
          return Err(domain(agora_core::Error::NotAuthor(acting_user)));
        }

        tx.execute(
          "DELETE FROM arguments WHERE argument_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(from_call)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote(&self, user_id: Uuid, argument_id: Uuid) -> Result<VoteOutcome> {
    let arg_str  = encode_uuid(argument_id);
    let user_str = encode_uuid(user_id);

    let outcome: VoteOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The toggle decision and every counter it implies live in this one
        // transaction; conflicting calls serialize on the connection.
        let (debate_str, author_str, status_str): (String, String, String) = tx
          .query_row(
            "SELECT a.debate_id, a.author_id, d.status
             FROM arguments a
             JOIN debates d ON d.debate_id = a.debate_id
             WHERE a.argument_id = ?1",
            rusqlite::params![arg_str],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
          )
          .optional()?
          .ok_or_else(|| domain(agora_core::Error::ArgumentNotFound(argument_id)))?;

        let status = decode_status(&status_str).map_err(store_err)?;
        if status != DebateStatus::Ongoing {
          let debate_id =
            crate::encode::decode_uuid(&debate_str).map_err(store_err)?;
          return Err(domain(agora_core::Error::DebateNotOngoing(debate_id)));
        }

        if !user_exists(&tx, &user_str)? {
          return Err(domain(agora_core::Error::UserNotFound(user_id)));
        }

        let existing: Option<String> = tx
          .query_row(
            "SELECT vote_id FROM votes WHERE user_id = ?1 AND argument_id = ?2",
            rusqlite::params![user_str, arg_str],
            |r| r.get(0),
          )
          .optional()?;

        let (status, added) = match existing {
          Some(vote_id) => {
            tx.execute(
              "DELETE FROM votes WHERE vote_id = ?1",
              rusqlite::params![vote_id],
            )?;
            tx.execute(
              "UPDATE arguments SET vote_count = vote_count - 1
               WHERE argument_id = ?1",
              rusqlite::params![arg_str],
            )?;
            (VoteStatus::Removed, false)
          }
          None => {
            tx.execute(
              "INSERT INTO votes (vote_id, user_id, argument_id, created_at)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![
                encode_uuid(Uuid::new_v4()),
                user_str,
                arg_str,
                encode_dt(Utc::now()),
              ],
            )?;
            tx.execute(
              "UPDATE arguments SET vote_count = vote_count + 1
               WHERE argument_id = ?1",
              rusqlite::params![arg_str],
            )?;
            (VoteStatus::Added, true)
          }
        };

        apply_xp_delta(&tx, &author_str, rewards::xp_delta_for_vote(added), 0)?;

        let vote_count: i64 = tx.query_row(
          "SELECT vote_count FROM arguments WHERE argument_id = ?1",
          rusqlite::params![arg_str],
          |r| r.get(0),
        )?;

        tx.commit()?;
        Ok(VoteOutcome { status, vote_count })
      })
      .await
      .map_err(from_call)?;

    Ok(outcome)
  }
}
