//! Core types and trait definitions for the Agora debate platform.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod argument;
pub mod debate;
pub mod error;
pub mod lifecycle;
pub mod rewards;
pub mod store;
pub mod user;
pub mod vote;

pub use error::{Error, Result};
