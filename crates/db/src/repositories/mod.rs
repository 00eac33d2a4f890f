//! Repositories for the score store tables.

pub mod account_repo;
pub mod leaderboard_repo;

pub use account_repo::{AccountRepo, CharacterRepo, ScoreRepo};
pub use leaderboard_repo::LeaderboardRepo;
