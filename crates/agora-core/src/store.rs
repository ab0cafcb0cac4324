//! The `DebateStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `agora-store-sqlite`).
//! Higher layers (`agora-api`) depend on this abstraction, not on any
//! concrete backend. Every mutating method is all-or-nothing: a failure
//! mid-operation must leave no partial XP or vote-count state visible.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  argument::{Argument, NewArgument},
  debate::{Category, Debate, DebateDetail, NewDebate},
  user::{NewUser, User},
  vote::VoteOutcome,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`DebateStore::list_debates`].
#[derive(Debug, Clone, Default)]
pub struct DebateQuery {
  /// Case-insensitive substring match on the category name.
  pub category: Option<String>,
  /// Case-insensitive substring match on the debate title.
  pub search:   Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Agora storage backend.
///
/// Status is written only through [`recompute_status`](Self::recompute_status),
/// [`sweep_statuses`](Self::sweep_statuses), and
/// [`cancel_debate`](Self::cancel_debate); no other method touches it.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DebateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. Fails if the username or email is already taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// The top `limit` users ordered by XP descending.
  fn leaderboard(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Categories ────────────────────────────────────────────────────────

  fn create_category(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  // ── Debates ───────────────────────────────────────────────────────────

  /// Create a debate after validating its window against `now`. The debate
  /// starts out `Scheduled`; the creation guard guarantees the window lies
  /// strictly in the future.
  fn create_debate(
    &self,
    author_id: Uuid,
    input: NewDebate,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Debate, Self::Error>> + Send + '_;

  fn get_debate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Debate>, Self::Error>> + Send + '_;

  /// The assembled read model: debate, author, category, arguments, and
  /// participants. Returns `None` if the debate does not exist.
  fn debate_detail(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<DebateDetail>, Self::Error>> + Send + '_;

  fn list_debates<'a>(
    &'a self,
    query: &'a DebateQuery,
  ) -> impl Future<Output = Result<Vec<Debate>, Self::Error>> + Send + 'a;

  /// Cancel a debate. Valid only from {Scheduled, Ongoing}; author-only.
  /// No reward side effects.
  fn cancel_debate(
    &self,
    id: Uuid,
    acting_user: Uuid,
  ) -> impl Future<Output = Result<Debate, Self::Error>> + Send + '_;

  /// Delete a debate and, by cascade, its arguments and their votes.
  /// Author-only.
  fn delete_debate(
    &self,
    id: Uuid,
    acting_user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Add a user to the participant set. Joining twice is a no-op.
  fn join_debate(
    &self,
    id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Recompute one debate's status from the clock, applying at most one
  /// transition and running the finish side effect if the Ongoing→Finished
  /// edge fires. Idempotent: a second call at the same `now` is a no-op.
  fn recompute_status(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Debate, Self::Error>> + Send + '_;

  /// Recompute every non-terminal debate. Returns the number of debates
  /// whose status changed. Safe to invoke re-entrantly; driven by the
  /// server's periodic sweeper.
  fn sweep_statuses(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Arguments ─────────────────────────────────────────────────────────

  /// Submit an argument. Fails unless the parent debate is Ongoing.
  fn create_argument(
    &self,
    author_id: Uuid,
    debate_id: Uuid,
    input: NewArgument,
  ) -> impl Future<Output = Result<Argument, Self::Error>> + Send + '_;

  fn get_argument(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Argument>, Self::Error>> + Send + '_;

  /// Delete an argument and its votes. Author-only.
  fn delete_argument(
    &self,
    id: Uuid,
    acting_user: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Toggle a (user, argument) vote in a single transaction: the existence
  /// check, the vote row, the denormalized count, the author's XP, and the
  /// author's level all move together or not at all. Fails unless the
  /// parent debate is Ongoing.
  fn cast_vote(
    &self,
    user_id: Uuid,
    argument_id: Uuid,
  ) -> impl Future<Output = Result<VoteOutcome, Self::Error>> + Send + '_;
}
