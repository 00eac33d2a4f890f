//! Process-local [`ScoreStore`] backed by plain collections.
//!
//! Mirrors the relational layout (accounts, characters, score rows) so the
//! ranking engine sees the same shape of data as the SQL adapter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::query::QuerySpec;
use crate::ranking::{evaluate, rank_population, CharacterScores};
use crate::store::{RankedWindow, ScoreStore, StoreError};
use crate::types::{ClassId, DbId, Score};

struct AccountEntry {
    username: String,
    email: String,
}

struct CharacterEntry {
    account_id: DbId,
    class_id: ClassId,
    scores: Vec<Score>,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<DbId, AccountEntry>,
    characters: BTreeMap<DbId, CharacterEntry>,
    next_account_id: DbId,
    next_character_id: DbId,
}

/// In-memory score store.
#[derive(Default)]
pub struct InMemoryScoreStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account and return its id.
    pub fn add_account(&self, username: &str, email: &str) -> DbId {
        let mut tables = self.write();
        tables.next_account_id += 1;
        let id = tables.next_account_id;
        tables.accounts.insert(
            id,
            AccountEntry {
                username: username.to_string(),
                email: email.to_string(),
            },
        );
        id
    }

    /// Insert a character for an existing account and return its id.
    pub fn add_character(&self, account_id: DbId, class_id: ClassId) -> Result<DbId, CoreError> {
        let mut tables = self.write();
        if !tables.accounts.contains_key(&account_id) {
            return Err(CoreError::NotFound {
                entity: "Account",
                id: account_id,
            });
        }
        tables.next_character_id += 1;
        let id = tables.next_character_id;
        tables.characters.insert(
            id,
            CharacterEntry {
                account_id,
                class_id,
                scores: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Append a reward score to a character.
    pub fn record_score(&self, character_id: DbId, score: Score) -> Result<(), CoreError> {
        let mut tables = self.write();
        let character = tables
            .characters
            .get_mut(&character_id)
            .ok_or(CoreError::NotFound {
                entity: "Character",
                id: character_id,
            })?;
        character.scores.push(score);
        Ok(())
    }

    /// Account with a single scored character. Returns the character id.
    pub fn add_player(&self, username: &str, email: &str, class_id: ClassId, score: Score) -> DbId {
        let account_id = self.add_account(username, email);
        let mut tables = self.write();
        tables.next_character_id += 1;
        let id = tables.next_character_id;
        tables.characters.insert(
            id,
            CharacterEntry {
                account_id,
                class_id,
                scores: vec![score],
            },
        );
        id
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store marked unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        // Writers never panic while holding the lock, so recover the data.
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> Result<Vec<CharacterScores>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))?;

        let characters = tables
            .characters
            .values()
            .filter_map(|c| {
                tables.accounts.get(&c.account_id).map(|a| CharacterScores {
                    account_id: c.account_id,
                    username: a.username.clone(),
                    email: a.email.clone(),
                    class_id: c.class_id,
                    scores: c.scores.clone(),
                })
            })
            .collect();
        Ok(characters)
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn fetch_window(&self, spec: &QuerySpec) -> Result<RankedWindow, StoreError> {
        self.check_available()?;
        let population = rank_population(self.snapshot()?);
        Ok(evaluate(&population, spec))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
