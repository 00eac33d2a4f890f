//! Ranking engine.
//!
//! Turns a snapshot of characters and their score history into
//! [`RankedRow`]s with standard competition ranking (`1 + number of rows
//! with a strictly greater score`) over the whole population. Filters,
//! sorting and windowing are applied afterwards by [`evaluate`], so a
//! filtered row keeps its global rank.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::pagination::slice_window;
use crate::query::{QuerySpec, SortClause, SortKey, SortOrder};
use crate::store::RankedWindow;
use crate::types::{ClassId, DbId, Score};

/// One (account, class) pair with its best score and global rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    pub account_id: DbId,
    pub username: String,
    pub email: String,
    pub class_id: ClassId,
    pub score: Score,
    pub rank: i64,
}

/// A character together with every reward score recorded for it.
#[derive(Debug, Clone)]
pub struct CharacterScores {
    pub account_id: DbId,
    pub username: String,
    pub email: String,
    pub class_id: ClassId,
    pub scores: Vec<Score>,
}

/// Best known score of a character; 0 when nothing was recorded.
pub fn best_score(scores: &[Score]) -> Score {
    scores.iter().copied().max().unwrap_or(0)
}

/// Compute ranked rows for the entire population.
///
/// Characters of the same account and class are merged into one row
/// holding the maximum over all of their scores. The result is ordered by
/// score descending, ties by `(account_id, class_id)`.
pub fn rank_population<I>(characters: I) -> Vec<RankedRow>
where
    I: IntoIterator<Item = CharacterScores>,
{
    let mut best: BTreeMap<(DbId, ClassId), RankedRow> = BTreeMap::new();

    for character in characters {
        let score = best_score(&character.scores);
        best.entry((character.account_id, character.class_id))
            .and_modify(|row| row.score = row.score.max(score))
            .or_insert(RankedRow {
                account_id: character.account_id,
                username: character.username,
                email: character.email,
                class_id: character.class_id,
                score,
                rank: 0,
            });
    }

    let mut rows: Vec<RankedRow> = best.into_values().collect();
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| tie_break(a, b))
    });
    assign_competition_ranks(&mut rows);
    rows
}

/// Assign competition ranks to rows already sorted by score descending.
fn assign_competition_ranks(rows: &mut [RankedRow]) {
    let mut current_rank = 0;
    let mut previous: Option<Score> = None;

    for (idx, row) in rows.iter_mut().enumerate() {
        if previous != Some(row.score) {
            current_rank = idx as i64 + 1;
            previous = Some(row.score);
        }
        row.rank = current_rank;
    }
}

/// Stable secondary ordering so equal sort keys page deterministically.
fn tie_break(a: &RankedRow, b: &RankedRow) -> Ordering {
    a.account_id
        .cmp(&b.account_id)
        .then_with(|| a.class_id.cmp(&b.class_id))
}

/// Compare two rows under a sort clause. The tie-breaker is always ascending.
pub fn compare_rows(a: &RankedRow, b: &RankedRow, sort: &SortClause) -> Ordering {
    let primary = match sort.key {
        SortKey::Rank => a.rank.cmp(&b.rank),
        SortKey::Username => a.username.cmp(&b.username),
        SortKey::ClassId => a.class_id.cmp(&b.class_id),
        SortKey::Score => a.score.cmp(&b.score),
    };
    let primary = match sort.order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| tie_break(a, b))
}

/// Apply a query spec to an already-ranked population.
///
/// `total` counts every row that matches the predicates, independent of the
/// window.
pub fn evaluate(population: &[RankedRow], spec: &QuerySpec) -> RankedWindow {
    let mut matching: Vec<&RankedRow> = population.iter().filter(|r| spec.matches(r)).collect();
    matching.sort_by(|a, b| compare_rows(a, b, &spec.sort));

    let total = matching.len() as i64;
    let rows = slice_window(&matching, &spec.window)
        .into_iter()
        .cloned()
        .collect();

    RankedWindow { rows, total }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
