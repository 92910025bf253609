//! Notifying stores.
//!
//! [`SetupStore`] and [`HistoryStore`] are the only write paths into the
//! database. Each write goes through the matching repository and, once
//! committed, publishes a [`StoreEvent`] so live views can reload. Cloning
//! a store is cheap: the pool and the bus are both shared handles.

use std::collections::HashSet;
use std::sync::Arc;

use pitlane_core::query::QueryShape;
use pitlane_core::types::Timestamp;
use pitlane_core::{HistoryRecord, SetupQuery, SetupRecord};
use pitlane_events::{EventBus, StoreEvent, Watch};

use crate::error::StoreError;
use crate::repositories::{HistoryRepo, SetupRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// SetupStore
// ---------------------------------------------------------------------------

/// Durable keyed storage of setup records.
#[derive(Clone)]
pub struct SetupStore {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl SetupStore {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Insert or replace each record keyed by its source URL.
    ///
    /// Every record is validated first, then the batch is applied in one
    /// transaction; a failure leaves no record of the batch written. One
    /// change event is published per distinct query shape touched, counting
    /// both the shape a replaced row moved away from and the one it now has.
    pub async fn upsert_many(&self, records: &[SetupRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        for record in records {
            record.validate()?;
        }

        let previous = SetupRepo::upsert_many(&self.pool, records).await?;
        tracing::debug!(count = records.len(), "Setups upserted");

        let shapes: HashSet<QueryShape> = records
            .iter()
            .map(QueryShape::of)
            .chain(previous)
            .collect();
        for shape in shapes {
            self.bus.publish(StoreEvent::SetupsChanged(shape));
        }
        Ok(())
    }

    /// Single-record form of [`upsert_many`](Self::upsert_many).
    pub async fn upsert_one(&self, record: &SetupRecord) -> Result<(), StoreError> {
        self.upsert_many(std::slice::from_ref(record)).await
    }

    /// Records matching `query`, ordered by score then recency.
    pub async fn query_page(
        &self,
        query: &SetupQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SetupRecord>, StoreError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(SetupRepo::find_page(&self.pool, query, offset, limit).await?)
    }

    /// Number of records matching `query`.
    pub async fn count(&self, query: &SetupQuery) -> Result<u64, StoreError> {
        let count = SetupRepo::count(&self.pool, query).await?;
        Ok(count.max(0) as u64)
    }

    /// Point lookup; a miss is `Ok(None)`.
    pub async fn get_by_key(&self, source_url: &str) -> Result<Option<SetupRecord>, StoreError> {
        Ok(SetupRepo::find_by_source_url(&self.pool, source_url).await?)
    }

    /// Maintenance: remove every setup for `circuit`.
    pub async fn delete_by_circuit(&self, circuit: &str) -> Result<u64, StoreError> {
        let deleted = SetupRepo::delete_by_circuit(&self.pool, circuit).await?;
        tracing::info!(circuit, deleted, "Cleared cached setups for circuit");
        self.bus.publish(StoreEvent::SetupsCleared {
            circuit: Some(circuit.to_string()),
        });
        Ok(deleted)
    }

    /// Maintenance: remove every setup.
    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        let deleted = SetupRepo::delete_all(&self.pool).await?;
        tracing::info!(deleted, "Cleared all cached setups");
        self.bus.publish(StoreEvent::SetupsCleared { circuit: None });
        Ok(deleted)
    }

    /// Subscribe to changes affecting `query`.
    pub fn watch(&self, query: &SetupQuery) -> Watch {
        self.bus.watch_setups(query.shape())
    }
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// Append/query storage of the user's setup history.
#[derive(Clone)]
pub struct HistoryStore {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl HistoryStore {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Insert an entry, replacing one with the same timestamp.
    pub async fn insert(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        HistoryRepo::insert(&self.pool, record).await?;
        self.bus.publish(StoreEvent::HistoryChanged);
        Ok(())
    }

    /// Every entry, newest first.
    pub async fn list_all(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(HistoryRepo::list_all(&self.pool).await?)
    }

    pub async fn get_by_timestamp(
        &self,
        timestamp: Timestamp,
    ) -> Result<Option<HistoryRecord>, StoreError> {
        Ok(HistoryRepo::find_by_timestamp(&self.pool, timestamp).await?)
    }

    /// Delete one entry. Returns `true` if it existed.
    pub async fn delete_one(&self, timestamp: Timestamp) -> Result<bool, StoreError> {
        let deleted = HistoryRepo::delete(&self.pool, timestamp).await?;
        if deleted {
            self.bus.publish(StoreEvent::HistoryChanged);
        }
        Ok(deleted)
    }

    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        let deleted = HistoryRepo::delete_all(&self.pool).await?;
        self.bus.publish(StoreEvent::HistoryChanged);
        Ok(deleted)
    }

    /// Subscribe to history changes.
    pub fn watch(&self) -> Watch {
        self.bus.watch_history()
    }
}
