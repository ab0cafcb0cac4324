//! SQLite backend for the Agora debate store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The single connection doubles
//! as the serialization point the core invariants demand: conflicting
//! mutations (vote toggles, the finishing transition) queue up on it and
//! each runs inside its own transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
