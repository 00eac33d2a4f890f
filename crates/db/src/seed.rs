//! Demo data generation.
//!
//! Every generated account gets one character per class with a single
//! random reward score, the same shape a freshly verified account receives.

use ladder_core::leaderboard::CLASS_IDS;
use ladder_core::types::DbId;
use rand::Rng;
use sqlx::PgPool;

use crate::models::account::CreateAccount;
use crate::repositories::{AccountRepo, CharacterRepo, ScoreRepo};

/// Inclusive bounds of a generated reward score.
pub const MIN_GENERATED_SCORE: i32 = 10;
pub const MAX_GENERATED_SCORE: i32 = 1000;

const ADJECTIVES: &[&str] = &[
    "swift", "silent", "crimson", "iron", "lucky", "frost", "shadow", "golden",
];
const NOUNS: &[&str] = &[
    "fox", "blade", "rogue", "knight", "wolf", "mage", "ranger", "drake",
];

/// Create one character per class for an account, each with a random score.
///
/// Returns the number of characters created.
pub async fn generate_scores_for_account(pool: &PgPool, acc_id: DbId) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    for class_id in CLASS_IDS {
        let character = CharacterRepo::create(pool, acc_id, class_id).await?;
        let reward = rand::rng().random_range(MIN_GENERATED_SCORE..=MAX_GENERATED_SCORE);
        ScoreRepo::record(pool, character.char_id, reward).await?;
        created += 1;
    }
    tracing::debug!(acc_id, created, "Generated scores for account");
    Ok(created)
}

/// Generate `count` fake accounts with scores if the accounts table is empty.
///
/// Returns the number of accounts created (0 when data already exists).
pub async fn seed_if_empty(pool: &PgPool, count: usize) -> Result<usize, sqlx::Error> {
    if count == 0 {
        return Ok(0);
    }
    if AccountRepo::count(pool).await? > 0 {
        tracing::info!("Accounts already present, skipping demo data generation");
        return Ok(0);
    }

    tracing::info!(count, "Generating demo accounts");
    for n in 0..count {
        let username = fake_username(n);
        let account = AccountRepo::create(
            pool,
            &CreateAccount {
                email: format!("{username}@example.com"),
                username,
            },
        )
        .await?;
        generate_scores_for_account(pool, account.acc_id).await?;
    }
    tracing::info!(count, "Demo data generation complete");
    Ok(count)
}

/// Unique, readable username for the `n`th generated account.
fn fake_username(n: usize) -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{adjective}_{noun}_{n}")
}
