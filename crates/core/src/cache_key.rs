//! Cache key derivation for leaderboard pages.
//!
//! The key covers the resolved `page`/`limit` and the *raw* text of every
//! other parameter, so a request with an unrecognized `sort` value gets its
//! own entry even though it runs the same query as `sort=rank`. Each field is
//! length-prefixed before hashing, which keeps a search string containing a
//! separator from colliding with a different parameter split.

use sha2::{Digest, Sha256};

use crate::leaderboard::{LeaderboardParams, LeaderboardQuery};

/// Derive the cache key for a request.
///
/// An absent string parameter and an empty one produce the same key.
pub fn derive(params: &LeaderboardParams, query: &LeaderboardQuery) -> String {
    let page = query.pagination.page.to_string();
    let limit = query.pagination.limit.to_string();

    let fields: [(&str, &str); 8] = [
        ("page", page.as_str()),
        ("limit", limit.as_str()),
        ("search", raw(&params.search)),
        ("sort", raw(&params.sort)),
        ("order", raw(&params.order)),
        ("class", raw(&params.class)),
        ("minScore", raw(&params.min_score)),
        ("maxScore", raw(&params.max_score)),
    ];

    let mut material = String::new();
    for (name, value) in fields {
        material.push_str(&format!("{name}:{}:{value};", value.len()));
    }
    format!("{:x}", Sha256::digest(material.as_bytes()))
}

fn raw(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::resolve;

    fn key(params: &LeaderboardParams) -> String {
        derive(params, &resolve(params).unwrap())
    }

    fn base() -> LeaderboardParams {
        LeaderboardParams {
            page: Some("2".into()),
            limit: Some("20".into()),
            search: Some("ali".into()),
            sort: Some("score".into()),
            order: Some("desc".into()),
            class: Some("3".into()),
            min_score: Some("10".into()),
            max_score: Some("900".into()),
        }
    }

    #[test]
    fn identical_parameters_give_identical_keys() {
        assert_eq!(key(&base()), key(&base()));
        let k = key(&base());
        assert_eq!(k.len(), 64);
        assert!(k.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn every_parameter_changes_the_key() {
        let original = key(&base());
        let variants = [
            LeaderboardParams { page: Some("3".into()), ..base() },
            LeaderboardParams { limit: Some("21".into()), ..base() },
            LeaderboardParams { search: Some("bob".into()), ..base() },
            LeaderboardParams { sort: Some("username".into()), ..base() },
            LeaderboardParams { order: Some("asc".into()), ..base() },
            LeaderboardParams { class: Some("4".into()), ..base() },
            LeaderboardParams { min_score: Some("11".into()), ..base() },
            LeaderboardParams { max_score: Some("901".into()), ..base() },
        ];
        for v in variants {
            assert_ne!(key(&v), original, "{v:?}");
        }
    }

    #[test]
    fn unrecognized_sort_still_changes_the_key() {
        let rank = LeaderboardParams { sort: Some("rank".into()), ..base() };
        let bogus = LeaderboardParams { sort: Some("bogus".into()), ..base() };
        assert_eq!(resolve(&rank).unwrap().sort, resolve(&bogus).unwrap().sort);
        assert_ne!(key(&rank), key(&bogus));
    }

    #[test]
    fn non_numeric_min_score_differs_from_omitted() {
        let omitted = LeaderboardParams { min_score: None, ..base() };
        let garbage = LeaderboardParams { min_score: Some("abc".into()), ..base() };
        assert_ne!(key(&omitted), key(&garbage));
    }

    #[test]
    fn default_page_matches_explicit_first_page() {
        let implicit = LeaderboardParams { page: None, ..base() };
        let explicit = LeaderboardParams { page: Some("1".into()), ..base() };
        assert_eq!(key(&implicit), key(&explicit));
    }

    #[test]
    fn separators_in_search_do_not_collide() {
        let a = LeaderboardParams {
            search: Some("x;sort:0:".into()),
            sort: None,
            ..base()
        };
        let b = LeaderboardParams {
            search: Some("x".into()),
            sort: Some(";sort:0:".into()),
            ..base()
        };
        assert_ne!(key(&a), key(&b));
    }
}
