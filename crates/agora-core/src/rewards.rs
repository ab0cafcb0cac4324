//! Reward ledger — pure delta calculations for voting and debate wins.
//!
//! These functions never touch storage. The store invokes them inside the
//! transaction that applies the corresponding mutation, so the XP, win
//! counter, and level columns can never drift apart.

use crate::user::Level;

/// XP granted to the winning argument's author when a debate finishes.
pub const WIN_XP: i64 = 150;

/// XP an argument's author gains (or gives back) when a vote is toggled.
pub fn xp_delta_for_vote(added: bool) -> i64 {
  if added { 2 } else { -2 }
}

/// Win-counter increment for a debate victory.
pub fn wins_delta_for_win() -> i64 { 1 }

/// The level a user holds at a given XP total. Thresholds are fixed and
/// checked highest-first.
pub fn level_for_xp(xp: i64) -> Level {
  if xp >= 800 {
    Level::Rhetorician
  } else if xp >= 500 {
    Level::Orator
  } else if xp >= 300 {
    Level::Debater
  } else if xp >= 150 {
    Level::Competitor
  } else {
    Level::Novice
  }
}
