//! SurrealDB implementation of [`PrefixCounterStore`].
//!
//! The counter record's id is the prefix itself, so the whole
//! increment is a single UPSERT statement and SurrealDB's
//! per-statement atomicity guarantees distinct values under
//! concurrent calls.

use rhub_core::error::RhubResult;
use rhub_core::repository::PrefixCounterStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CounterRow {
    count: u64,
}

#[derive(Clone)]
pub struct SurrealPrefixCounter<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPrefixCounter<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PrefixCounterStore for SurrealPrefixCounter<C> {
    async fn increment(&self, prefix: &str) -> RhubResult<u64> {
        let mut result = self
            .db
            .query("UPSERT type::record('prefix_counter', $prefix) SET count += 1")
            .bind(("prefix", prefix.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CounterRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Prefix counter".into(),
            id: prefix.to_string(),
        })?;

        Ok(row.count)
    }
}
