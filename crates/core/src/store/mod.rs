//! The score store seam.
//!
//! The leaderboard pipeline only needs one read: the ranked rows of a
//! [`QuerySpec`] window plus the filtered row count, taken from the same
//! snapshot. [`ScoreStore`] is implemented by the PostgreSQL adapter in
//! `ladder-db` and by [`memory::InMemoryScoreStore`].

pub mod memory;

use async_trait::async_trait;

use crate::query::QuerySpec;
use crate::ranking::RankedRow;

/// Failure talking to the score store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, connection refused).
    #[error("Score store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but the query failed.
    #[error("Score store query failed: {0}")]
    Query(String),
}

/// One page of ranked rows and the number of rows matching the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWindow {
    pub rows: Vec<RankedRow>,
    pub total: i64,
}

/// Read access to the ranked score table.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Rank the whole population, apply the query's predicates, sort, and
    /// return the requested window with the filtered total.
    async fn fetch_window(&self, spec: &QuerySpec) -> Result<RankedWindow, StoreError>;

    /// Cheap liveness probe.
    async fn health_check(&self) -> Result<(), StoreError>;
}
