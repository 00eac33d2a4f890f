//! Account, character and score rows.

use ladder_core::types::{ClassId, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered player account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub acc_id: DbId,
    pub username: String,
    pub email: String,
    pub created_at: Timestamp,
}

/// DTO for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    pub email: String,
}

/// A character of one class owned by an account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub char_id: DbId,
    pub acc_id: DbId,
    pub class_id: i16,
    pub created_at: Timestamp,
}

impl Character {
    pub fn class(&self) -> ClassId {
        ClassId::from(self.class_id)
    }
}

/// One recorded reward score.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScoreEntry {
    pub score_id: DbId,
    pub char_id: DbId,
    pub reward_score: i32,
    pub created_at: Timestamp,
}
