//! Row types for the score store tables.

pub mod account;
pub mod leaderboard;
