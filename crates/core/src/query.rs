//! Typed filter, sort and window clauses for the ranked leaderboard.
//!
//! A [`QuerySpec`] is a list of typed predicate clauses, one sort clause and
//! one window clause. Store adapters translate it into their native query
//! language; the in-memory engine in [`crate::ranking`] evaluates it directly.
//! Predicates always apply to already-ranked rows, never to the population
//! the ranks are computed over.

use serde::Serialize;

use crate::ranking::RankedRow;
use crate::types::Score;

// ---------------------------------------------------------------------------
// Sort clause
// ---------------------------------------------------------------------------

/// Whitelisted ordering keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Rank,
    Username,
    ClassId,
    Score,
}

impl SortKey {
    /// Resolve a raw `sort` value. Anything outside the whitelist falls back
    /// to [`SortKey::Rank`].
    ///
    /// `class_id` is accepted alongside `classId` because it is the column
    /// name older clients send.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("rank") => Self::Rank,
            Some("username") => Self::Username,
            Some("classId") | Some("class_id") => Self::ClassId,
            Some("score") => Self::Score,
            _ => Self::Rank,
        }
    }

    /// Column name in the ranked result set.
    pub fn column(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Username => "username",
            Self::ClassId => "class_id",
            Self::Score => "score",
        }
    }
}

/// Ordering direction. Ascending unless the client sends exactly `desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Resolve a raw `order` value. Case-sensitive: `DESC` is ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// The single sort clause of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortClause {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            order: SortOrder::Asc,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A single typed filter clause. All clauses of a spec are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match on username OR email.
    Search(String),
    /// Exact class id match.
    Class(i64),
    /// `score >= n`.
    MinScore(Score),
    /// `score <= n`.
    MaxScore(Score),
}

impl Predicate {
    /// Evaluate the clause against a ranked row.
    pub fn matches(&self, row: &RankedRow) -> bool {
        match self {
            Self::Search(text) => {
                let needle = text.to_lowercase();
                row.username.to_lowercase().contains(&needle)
                    || row.email.to_lowercase().contains(&needle)
            }
            Self::Class(class_id) => i64::from(row.class_id) == *class_id,
            Self::MinScore(min) => row.score >= *min,
            Self::MaxScore(max) => row.score <= *max,
        }
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// `OFFSET`/`LIMIT` pair selecting one page of the sorted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Query spec
// ---------------------------------------------------------------------------

/// Fully validated query against the ranked population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub predicates: Vec<Predicate>,
    pub sort: SortClause,
    pub window: Window,
}

impl QuerySpec {
    /// Whether `row` satisfies every predicate.
    pub fn matches(&self, row: &RankedRow) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
