//! Repositories for the `accounts`, `characters` and `scores` tables.
//!
//! Registration and verification live outside this service; these writes
//! exist for seeding and tests.

use ladder_core::types::{ClassId, DbId};
use sqlx::PgPool;

use crate::models::account::{Account, Character, CreateAccount, ScoreEntry};

/// Provides inserts and lookups for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email)
             VALUES ($1, $2)
             RETURNING acc_id, username, email, created_at",
        )
        .bind(&input.username)
        .bind(&input.email)
        .fetch_one(pool)
        .await
    }

    /// Find an account by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            "SELECT acc_id, username, email, created_at FROM accounts WHERE acc_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Total number of accounts.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await
    }
}

/// Provides inserts for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Create a character of `class_id` for an account.
    pub async fn create(
        pool: &PgPool,
        acc_id: DbId,
        class_id: ClassId,
    ) -> Result<Character, sqlx::Error> {
        sqlx::query_as::<_, Character>(
            "INSERT INTO characters (acc_id, class_id)
             VALUES ($1, $2::SMALLINT)
             RETURNING char_id, acc_id, class_id, created_at",
        )
        .bind(acc_id)
        .bind(class_id)
        .fetch_one(pool)
        .await
    }

    /// List the characters of an account ordered by class.
    pub async fn list_by_account(
        pool: &PgPool,
        acc_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        sqlx::query_as::<_, Character>(
            "SELECT char_id, acc_id, class_id, created_at FROM characters
             WHERE acc_id = $1
             ORDER BY class_id ASC",
        )
        .bind(acc_id)
        .fetch_all(pool)
        .await
    }
}

/// Provides inserts for reward scores.
pub struct ScoreRepo;

impl ScoreRepo {
    /// Record a new reward score for a character.
    pub async fn record(
        pool: &PgPool,
        char_id: DbId,
        reward_score: i32,
    ) -> Result<ScoreEntry, sqlx::Error> {
        sqlx::query_as::<_, ScoreEntry>(
            "INSERT INTO scores (char_id, reward_score)
             VALUES ($1, $2)
             RETURNING score_id, char_id, reward_score, created_at",
        )
        .bind(char_id)
        .bind(reward_score)
        .fetch_one(pool)
        .await
    }
}
