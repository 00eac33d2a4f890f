//! Integration tests for the PostgreSQL score store.
//!
//! Need a live database: `DATABASE_URL=... cargo test -p ladder-db -- --ignored`.

use ladder_core::query::{Predicate, QuerySpec, SortClause, SortKey, SortOrder, Window};
use ladder_core::store::ScoreStore;
use ladder_db::models::account::CreateAccount;
use ladder_db::repositories::{AccountRepo, CharacterRepo, ScoreRepo};
use ladder_db::PgScoreStore;
use sqlx::PgPool;

async fn player(pool: &PgPool, name: &str, class_id: i32, scores: &[i32]) -> i64 {
    let account = AccountRepo::create(
        pool,
        &CreateAccount {
            username: name.to_string(),
            email: format!("{name}@example.com"),
        },
    )
    .await
    .unwrap();
    let character = CharacterRepo::create(pool, account.acc_id, class_id)
        .await
        .unwrap();
    for score in scores {
        ScoreRepo::record(pool, character.char_id, *score).await.unwrap();
    }
    account.acc_id
}

fn spec(predicates: Vec<Predicate>, offset: i64, limit: i64) -> QuerySpec {
    QuerySpec {
        predicates,
        sort: SortClause::default(),
        window: Window { offset, limit },
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_check_passes(pool: PgPool) {
    ladder_db::health_check(&pool).await.unwrap();
    PgScoreStore::new(pool).health_check().await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn competition_ranks_with_ties(pool: PgPool) {
    player(&pool, "alpha", 3, &[40, 100]).await;
    player(&pool, "bravo", 3, &[100]).await;
    player(&pool, "charlie", 3, &[90]).await;
    player(&pool, "delta", 1, &[10]).await;

    let window = PgScoreStore::new(pool)
        .fetch_window(&spec(vec![], 0, 10))
        .await
        .unwrap();

    let ranks: Vec<(String, i64, i64)> = window
        .rows
        .iter()
        .map(|r| (r.username.clone(), r.score, r.rank))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("alpha".to_string(), 100, 1),
            ("bravo".to_string(), 100, 1),
            ("charlie".to_string(), 90, 3),
            ("delta".to_string(), 10, 4),
        ]
    );
    assert_eq!(window.total, 4);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn filtered_rows_keep_global_rank(pool: PgPool) {
    player(&pool, "top", 1, &[900]).await;
    player(&pool, "second", 2, &[800]).await;
    player(&pool, "third", 1, &[700]).await;

    let window = PgScoreStore::new(pool)
        .fetch_window(&spec(vec![Predicate::Class(1)], 0, 10))
        .await
        .unwrap();

    let ranks: Vec<i64> = window.rows.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 3]);
    assert_eq!(window.total, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unscored_character_ranks_with_zero(pool: PgPool) {
    let account = AccountRepo::create(
        &pool,
        &CreateAccount {
            username: "fresh".into(),
            email: "fresh@example.com".into(),
        },
    )
    .await
    .unwrap();
    let character = CharacterRepo::create(&pool, account.acc_id, 4).await.unwrap();
    assert_eq!(character.class(), 4);

    let window = PgScoreStore::new(pool)
        .fetch_window(&spec(vec![], 0, 10))
        .await
        .unwrap();
    assert_eq!(window.rows.len(), 1);
    assert_eq!(window.rows[0].score, 0);
    assert_eq!(window.rows[0].rank, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn search_is_literal_and_case_insensitive(pool: PgPool) {
    player(&pool, "Sale_50", 1, &[1]).await;
    player(&pool, "Sale050", 1, &[2]).await;

    let store = PgScoreStore::new(pool);
    let window = store
        .fetch_window(&spec(vec![Predicate::Search("sale_".into())], 0, 10))
        .await
        .unwrap();
    assert_eq!(window.total, 1);
    assert_eq!(window.rows[0].username, "Sale_50");

    let by_email = store
        .fetch_window(&spec(vec![Predicate::Search("EXAMPLE.COM".into())], 0, 10))
        .await
        .unwrap();
    assert_eq!(by_email.total, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn window_past_end_keeps_total(pool: PgPool) {
    for i in 0..12 {
        player(&pool, &format!("p{i}"), 2, &[i * 10]).await;
    }

    let window = PgScoreStore::new(pool)
        .fetch_window(&spec(vec![Predicate::MinScore(0)], 40, 10))
        .await
        .unwrap();
    assert!(window.rows.is_empty());
    assert_eq!(window.total, 12);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sort_by_username_descending(pool: PgPool) {
    player(&pool, "amy", 1, &[3]).await;
    player(&pool, "cat", 1, &[2]).await;
    player(&pool, "bob", 1, &[1]).await;

    let mut s = spec(vec![], 0, 10);
    s.sort = SortClause {
        key: SortKey::Username,
        order: SortOrder::Desc,
    };
    let window = PgScoreStore::new(pool).fetch_window(&s).await.unwrap();
    let names: Vec<&str> = window.rows.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, vec!["cat", "bob", "amy"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seeding_creates_one_character_per_class(pool: PgPool) {
    let created = ladder_db::seed::seed_if_empty(&pool, 3).await.unwrap();
    assert_eq!(created, 3);
    assert_eq!(AccountRepo::count(&pool).await.unwrap(), 3);

    let account = AccountRepo::find_by_id(&pool, 1).await.unwrap().unwrap();
    let classes: Vec<i32> = CharacterRepo::list_by_account(&pool, account.acc_id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.class())
        .collect();
    assert_eq!(classes, (1..=8).collect::<Vec<_>>());
    assert!(AccountRepo::find_by_id(&pool, 999).await.unwrap().is_none());

    // Second run sees existing data and does nothing.
    assert_eq!(ladder_db::seed::seed_if_empty(&pool, 3).await.unwrap(), 0);

    let window = PgScoreStore::new(pool)
        .fetch_window(&spec(vec![], 0, 100))
        .await
        .unwrap();
    assert_eq!(window.total, 24);
    assert!(window
        .rows
        .iter()
        .all(|r| (10..=1000).contains(&r.score)));
}
