//! Ranked leaderboard queries.
//!
//! Ranks are computed with `RANK() OVER (ORDER BY score DESC)` inside a CTE
//! over every (account, class) pair. Predicates from the [`QuerySpec`] are
//! only applied in the outer query, so filtered rows keep their global rank.

use ladder_core::query::{Predicate, QuerySpec};
use sqlx::PgConnection;

use crate::models::leaderboard::RankedRowRecord;

/// Ranked population. Characters without a score rank with 0.
const RANKED_CTE: &str = "\
    WITH ranked_accounts AS ( \
        SELECT \
            a.acc_id AS account_id, \
            a.username, \
            a.email, \
            c.class_id::INT4 AS class_id, \
            COALESCE(MAX(s.reward_score), 0)::INT8 AS score, \
            RANK() OVER (ORDER BY COALESCE(MAX(s.reward_score), 0) DESC) AS rank \
        FROM accounts a \
        JOIN characters c ON c.acc_id = a.acc_id \
        LEFT JOIN scores s ON s.char_id = c.char_id \
        GROUP BY a.acc_id, a.username, a.email, c.class_id \
    )";

/// Typed bind value for dynamically-built leaderboard queries.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Build a WHERE clause and bind values from the query's predicates.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no predicates are present, or starts
/// with `WHERE `.
fn build_filter(spec: &QuerySpec) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();
    let mut bind_idx = 1u32;

    for predicate in &spec.predicates {
        match predicate {
            Predicate::Search(text) => {
                conditions.push(format!(
                    "(username ILIKE ${bind_idx} ESCAPE '\\' OR email ILIKE ${bind_idx} ESCAPE '\\')"
                ));
                bind_values.push(BindValue::Text(format!("%{}%", escape_like(text))));
            }
            Predicate::Class(class_id) => {
                conditions.push(format!("class_id = ${bind_idx}"));
                bind_values.push(BindValue::BigInt(*class_id));
            }
            Predicate::MinScore(min) => {
                conditions.push(format!("score >= ${bind_idx}"));
                bind_values.push(BindValue::BigInt(*min));
            }
            Predicate::MaxScore(max) => {
                conditions.push(format!("score <= ${bind_idx}"));
                bind_values.push(BindValue::BigInt(*max));
            }
        }
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Escape `ILIKE` wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build the full page query and its binds.
fn build_page_query(spec: &QuerySpec) -> (String, Vec<BindValue>) {
    let (where_clause, mut bind_values, bind_idx) = build_filter(spec);

    // Sort column and direction come from closed enums, never from input.
    let query = format!(
        "{RANKED_CTE} \
         SELECT account_id, username, email, class_id, score, rank \
         FROM ranked_accounts \
         {where_clause} \
         ORDER BY {column} {direction}, account_id ASC, class_id ASC \
         LIMIT ${bind_idx} OFFSET ${next_idx}",
        column = spec.sort.key.column(),
        direction = spec.sort.order.as_sql(),
        next_idx = bind_idx + 1,
    );

    bind_values.push(BindValue::BigInt(spec.window.limit));
    bind_values.push(BindValue::BigInt(spec.window.offset));
    (query, bind_values)
}

/// Build the filtered count query and its binds.
fn build_count_query(spec: &QuerySpec) -> (String, Vec<BindValue>) {
    let (where_clause, bind_values, _) = build_filter(spec);
    let query = format!("{RANKED_CTE} SELECT COUNT(*) FROM ranked_accounts {where_clause}");
    (query, bind_values)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Read access to the ranked leaderboard.
pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Fetch one sorted window of ranked rows matching the query.
    pub async fn fetch_ranked(
        conn: &mut PgConnection,
        spec: &QuerySpec,
    ) -> Result<Vec<RankedRowRecord>, sqlx::Error> {
        let (query, bind_values) = build_page_query(spec);
        let q = sqlx::query_as::<_, RankedRowRecord>(&query);
        bind_values_as(q, &bind_values).fetch_all(conn).await
    }

    /// Count every ranked row matching the query's predicates.
    pub async fn count_ranked(conn: &mut PgConnection, spec: &QuerySpec) -> Result<i64, sqlx::Error> {
        let (query, bind_values) = build_count_query(spec);
        let q = sqlx::query_scalar::<_, i64>(&query);
        bind_values_scalar(q, &bind_values).fetch_one(conn).await
    }
}

#[cfg(test)]
mod tests {
    use ladder_core::query::{SortClause, SortKey, SortOrder, Window};

    use super::*;

    fn spec(predicates: Vec<Predicate>) -> QuerySpec {
        QuerySpec {
            predicates,
            sort: SortClause::default(),
            window: Window {
                offset: 20,
                limit: 10,
            },
        }
    }

    #[test]
    fn no_predicates_means_no_where_clause() {
        let (where_clause, binds, next) = build_filter(&spec(vec![]));
        assert!(where_clause.is_empty());
        assert!(binds.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn bind_indexes_follow_predicates() {
        let (where_clause, binds, next) = build_filter(&spec(vec![
            Predicate::Search("ann".into()),
            Predicate::Class(3),
            Predicate::MaxScore(500),
        ]));
        assert!(where_clause.contains("username ILIKE $1"));
        assert!(where_clause.contains("email ILIKE $1"));
        assert!(where_clause.contains("class_id = $2"));
        assert!(where_clause.contains("score <= $3"));
        assert_eq!(
            binds,
            vec![
                BindValue::Text("%ann%".into()),
                BindValue::BigInt(3),
                BindValue::BigInt(500),
            ]
        );
        assert_eq!(next, 4);
    }

    #[test]
    fn window_binds_come_last() {
        let (query, binds) = build_page_query(&spec(vec![Predicate::MinScore(5)]));
        assert!(query.contains("LIMIT $2 OFFSET $3"));
        assert_eq!(binds[1..], [BindValue::BigInt(10), BindValue::BigInt(20)]);
    }

    #[test]
    fn sort_clause_renders_with_tie_breakers() {
        let mut s = spec(vec![]);
        s.sort = SortClause {
            key: SortKey::Score,
            order: SortOrder::Desc,
        };
        let (query, _) = build_page_query(&s);
        assert!(query.contains("ORDER BY score DESC, account_id ASC, class_id ASC"));
    }

    #[test]
    fn filters_apply_after_ranking() {
        let (query, _) = build_page_query(&spec(vec![Predicate::Class(1)]));
        let rank_pos = query.find("RANK() OVER").unwrap();
        let where_pos = query.find("WHERE class_id").unwrap();
        assert!(rank_pos < where_pos);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn count_query_has_no_window() {
        let (query, binds) = build_count_query(&spec(vec![Predicate::Class(2)]));
        assert!(!query.contains("LIMIT"));
        assert_eq!(binds, vec![BindValue::BigInt(2)]);
    }
}
