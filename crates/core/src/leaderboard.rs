//! Leaderboard request resolution and the ranked-page pipeline.
//!
//! Raw query-string values are turned into a [`LeaderboardQuery`] by
//! [`resolve`]. Only `page` and `limit` can be rejected; every other
//! parameter that cannot be understood is dropped or replaced by its
//! default, and processing continues.

use std::time::Duration;

use serde::Serialize;

use crate::error::CoreError;
use crate::pagination::Pagination;
use crate::query::{Predicate, QuerySpec, SortClause, SortKey, SortOrder};
use crate::ranking::RankedRow;
use crate::store::{ScoreStore, StoreError};
use crate::types::Score;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page returned when `page` is absent.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted `limit`.
pub const MAX_RESULTS_PER_PAGE: i64 = 100;

/// How long a computed page stays servable from the cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// How often expired cache entries are reclaimed.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Character classes a new account receives.
pub const CLASS_IDS: std::ops::RangeInclusive<i32> = 1..=8;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query-string parameters exactly as the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub class: Option<String>,
    pub min_score: Option<String>,
    pub max_score: Option<String>,
}

impl LeaderboardParams {
    /// Collect parameters from decoded query-string pairs.
    ///
    /// A repeated key keeps its first value. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                "order" => &mut params.order,
                "class" => &mut params.class,
                "minScore" => &mut params.min_score,
                "maxScore" => &mut params.max_score,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Resolved query
// ---------------------------------------------------------------------------

/// Validated and normalized leaderboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub pagination: Pagination,
    pub search: Option<String>,
    pub sort: SortClause,
    pub class_filter: Option<i64>,
    pub min_score: Option<Score>,
    pub max_score: Option<Score>,
}

impl LeaderboardQuery {
    /// Translate into the store-facing [`QuerySpec`].
    pub fn to_spec(&self) -> QuerySpec {
        let mut predicates = Vec::new();
        if let Some(search) = &self.search {
            predicates.push(Predicate::Search(search.clone()));
        }
        if let Some(class_id) = self.class_filter {
            predicates.push(Predicate::Class(class_id));
        }
        if let Some(min) = self.min_score {
            predicates.push(Predicate::MinScore(min));
        }
        if let Some(max) = self.max_score {
            predicates.push(Predicate::MaxScore(max));
        }

        QuerySpec {
            predicates,
            sort: self.sort,
            window: self.pagination.window(),
        }
    }
}

/// Validate `page` and `limit`, normalize everything else.
pub fn resolve(params: &LeaderboardParams) -> Result<LeaderboardQuery, CoreError> {
    let (page, limit) = validate_pagination(params.page.as_deref(), params.limit.as_deref())?;

    let search = params
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let sort = SortClause {
        key: SortKey::parse(params.sort.as_deref()),
        order: SortOrder::parse(params.order.as_deref()),
    };

    Ok(LeaderboardQuery {
        pagination: Pagination::new(page, limit),
        search,
        sort,
        class_filter: lenient_int("class", params.class.as_deref()),
        min_score: lenient_int("minScore", params.min_score.as_deref()),
        max_score: lenient_int("maxScore", params.max_score.as_deref()),
    })
}

/// Parse `page` and `limit`, rejecting present-but-invalid values.
pub fn validate_pagination(page: Option<&str>, limit: Option<&str>) -> Result<(i64, i64), CoreError> {
    let page = match page.filter(|s| !s.is_empty()) {
        None => DEFAULT_PAGE,
        Some(raw) => match raw.parse::<i64>() {
            Ok(p) if p >= 1 => p,
            _ => {
                return Err(CoreError::Validation(
                    "invalid 'page' parameter: must be a positive integer".into(),
                ))
            }
        },
    };

    let limit = match limit.filter(|s| !s.is_empty()) {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<i64>() {
            Ok(l) if (1..=MAX_RESULTS_PER_PAGE).contains(&l) => l,
            _ => {
                return Err(CoreError::Validation(format!(
                    "invalid 'limit' parameter: must be between 1 and {MAX_RESULTS_PER_PAGE}"
                )))
            }
        },
    };

    Ok((page, limit))
}

/// Parse an optional integer filter. Malformed values are logged and
/// treated as absent.
fn lenient_int(name: &'static str, raw: Option<&str>) -> Option<i64> {
    let raw = raw.filter(|s| !s.is_empty())?;
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(parameter = name, value = raw, "Ignoring non-numeric filter value");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Page payload
// ---------------------------------------------------------------------------

/// One page of the leaderboard as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub data: Vec<RankedRow>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Run the ranking + filtering + pagination pipeline against a store.
pub async fn fetch_page(
    store: &dyn ScoreStore,
    query: &LeaderboardQuery,
) -> Result<LeaderboardPage, StoreError> {
    let window = store.fetch_window(&query.to_spec()).await?;
    let meta = query.pagination.meta(window.total);

    Ok(LeaderboardPage {
        data: window.rows,
        total: meta.total,
        total_pages: meta.total_pages,
        current_page: meta.current_page,
        has_next_page: meta.has_next_page,
        has_previous_page: meta.has_previous_page,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
