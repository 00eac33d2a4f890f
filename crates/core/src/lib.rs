//! Domain logic for the ranked leaderboard.
//!
//! This crate has no internal dependencies so it can be shared by the
//! database adapter, the HTTP service and any offline tooling.

pub mod cache_key;
pub mod error;
pub mod leaderboard;
pub mod pagination;
pub mod query;
pub mod ranking;
pub mod store;
pub mod types;
