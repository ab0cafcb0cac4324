//! The debate lifecycle state machine.
//!
//! Everything here is a pure function of (window, clock, cached status).
//! The store is the single legitimate writer of `Debate::status`: it calls
//! [`plan_transition`] inside a transaction, applies the returned edge, and
//! runs the finish side effect only when the edge demands it.
//! Making the transition an explicit call (rather than a save hook) keeps it
//! auditable and testable in isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{argument::Argument, debate::DebateStatus};

// ─── Status derivation ───────────────────────────────────────────────────────

/// The time-derived status of a window at `now`, ignoring manual overrides.
///
/// The window is half-open: `now == start_time` is already Ongoing,
/// `now == end_time` is already Finished.
pub fn status_for_window(
  start_time: DateTime<Utc>,
  end_time: DateTime<Utc>,
  now: DateTime<Utc>,
) -> DebateStatus {
  if now < start_time {
    DebateStatus::Scheduled
  } else if now < end_time {
    DebateStatus::Ongoing
  } else {
    DebateStatus::Finished
  }
}

// ─── Transition planning ─────────────────────────────────────────────────────

/// A status edge the store must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
  pub from: DebateStatus,
  pub to:   DebateStatus,
}

impl Transition {
  /// Only the Ongoing→Finished edge carries the finish side effect (winner
  /// selection and reward payout). A debate whose whole window elapsed
  /// between sweeps jumps Scheduled→Finished without reward: no argument can
  /// have been submitted, so there is nothing to pay out.
  pub fn triggers_finish(&self) -> bool {
    self.from == DebateStatus::Ongoing && self.to == DebateStatus::Finished
  }
}

/// Decide what, if anything, the clock demands of a debate.
///
/// Idempotent: recomputing when the cached status already matches yields
/// `None`, so the periodic sweeper can re-enter freely without re-triggering
/// side effects. Terminal statuses (Finished, Canceled) always yield `None`.
pub fn plan_transition(
  current: DebateStatus,
  start_time: DateTime<Utc>,
  end_time: DateTime<Utc>,
  now: DateTime<Utc>,
) -> Option<Transition> {
  if current.is_terminal() {
    return None;
  }

  let computed = status_for_window(start_time, end_time, now);
  if computed == current {
    return None;
  }

  Some(Transition { from: current, to: computed })
}

// ─── Winner selection ────────────────────────────────────────────────────────

/// Select the winning argument when a debate finishes.
///
/// The winner is the argument with the highest vote count, provided that
/// count is strictly positive; a tie at zero (or an empty debate) produces
/// no winner and no reward. Ties among positive counts are broken
/// deterministically: earliest `created_at` first, then lowest
/// `argument_id`, so every backend agrees on the same winner.
pub fn select_winner(arguments: &[Argument]) -> Option<&Argument> {
  arguments
    .iter()
    .filter(|a| a.vote_count > 0)
    .min_by(|a, b| {
      b.vote_count
        .cmp(&a.vote_count)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.argument_id.cmp(&b.argument_id))
    })
}
