//! Integration tests for the prefix counter using in-memory SurrealDB.

use std::collections::HashSet;

use rhub_core::repository::PrefixCounterStore;
use rhub_db::repository::SurrealPrefixCounter;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rhub_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn first_increment_starts_at_one() {
    let db = setup().await;
    let counter = SurrealPrefixCounter::new(db);

    assert_eq!(counter.increment("SSE").await.unwrap(), 1);
    assert_eq!(counter.increment("SSE").await.unwrap(), 2);
    assert_eq!(counter.increment("SSE").await.unwrap(), 3);
}

#[tokio::test]
async fn prefixes_count_independently() {
    let db = setup().await;
    let counter = SurrealPrefixCounter::new(db);

    assert_eq!(counter.increment("SSE").await.unwrap(), 1);
    assert_eq!(counter.increment("QAE").await.unwrap(), 1);
    assert_eq!(counter.increment("SSE").await.unwrap(), 2);
    assert_eq!(counter.increment("QAE").await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_increments_yield_distinct_values() {
    let db = setup().await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let counter = SurrealPrefixCounter::new(db.clone());
        handles.push(tokio::spawn(
            async move { counter.increment("SSE").await },
        ));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert!(seen.insert(value), "counter value {value} issued twice");
    }

    assert_eq!(seen.len(), 20);
    assert_eq!(*seen.iter().min().unwrap(), 1);
    assert_eq!(*seen.iter().max().unwrap(), 20);
}
