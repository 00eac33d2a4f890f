use ladder_core::ranking::RankedRow;
use ladder_core::types::{ClassId, DbId, Score};
use sqlx::FromRow;

/// Row shape of the ranked leaderboard query.
#[derive(Debug, Clone, FromRow)]
pub struct RankedRowRecord {
    pub account_id: DbId,
    pub username: String,
    pub email: String,
    pub class_id: ClassId,
    pub score: Score,
    pub rank: i64,
}

impl From<RankedRowRecord> for RankedRow {
    fn from(r: RankedRowRecord) -> Self {
        RankedRow {
            account_id: r.account_id,
            username: r.username,
            email: r.email,
            class_id: r.class_id,
            score: r.score,
            rank: r.rank,
        }
    }
}
