//! [`ScoreStore`] implementation over a PostgreSQL pool.

use async_trait::async_trait;
use ladder_core::query::QuerySpec;
use ladder_core::ranking::RankedRow;
use ladder_core::store::{RankedWindow, ScoreStore, StoreError};

use crate::repositories::LeaderboardRepo;
use crate::DbPool;

/// Score store backed by the `accounts`/`characters`/`scores` tables.
#[derive(Clone)]
pub struct PgScoreStore {
    pool: DbPool,
}

impl PgScoreStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    /// Reads the window and the filtered count inside one read-only
    /// `REPEATABLE READ` transaction so both see the same snapshot.
    async fn fetch_window(&self, spec: &QuerySpec) -> Result<RankedWindow, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        let rows = LeaderboardRepo::fetch_ranked(&mut *tx, spec)
            .await
            .map_err(store_error)?;
        let total = LeaderboardRepo::count_ranked(&mut *tx, spec)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(RankedWindow {
            rows: rows.into_iter().map(RankedRow::from).collect(),
            total,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(store_error)
    }
}

/// Classify a sqlx error as connectivity or query failure.
fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}
