//! Table read cache.
//!
//! Each entry keeps the loaded sheet together with the instant it was inserted.
//! Entries expire after a fixed TTL and are dropped explicitly whenever a write
//! goes to the same table, so a reload right after a write sees that write.

use super::{CellValue, Sheet, Table, TableStore};
use crate::errors::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Debug)]
struct CacheEntry {
    value: Arc<Sheet>,
    inserted_at: Instant,
}

/// Per-table TTL cache of loaded sheets.
///
/// Every invalidation bumps the table's generation. A sheet read before an
/// invalidation carries the old generation and is refused on insert.
#[derive(Debug)]
pub struct TableCache {
    ttl: Duration,
    state: RwLock<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Table, CacheEntry>,
    generations: HashMap<Table, u64>,
}

impl TableCache {
    /// Creates an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached sheet for `table` unless it is missing or expired.
    pub async fn get(&self, table: Table) -> Option<Arc<Sheet>> {
        let state = self.state.read().await;
        let entry = state.entries.get(&table)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            trace!("Cache entry for '{}' expired", table);
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    /// Current generation of `table`; take it before reading from the store.
    pub async fn generation(&self, table: Table) -> u64 {
        let state = self.state.read().await;
        state.generations.get(&table).copied().unwrap_or_default()
    }

    /// Stores `sheet` for `table` if no invalidation happened since `generation`.
    ///
    /// Returns whether the sheet was stored.
    pub async fn insert(&self, table: Table, sheet: Arc<Sheet>, generation: u64) -> bool {
        let mut state = self.state.write().await;
        let current = state.generations.get(&table).copied().unwrap_or_default();
        if current != generation {
            debug!(
                "Discarded read of '{}' from generation {} (now {})",
                table, generation, current
            );
            return false;
        }
        state.entries.insert(
            table,
            CacheEntry {
                value: sheet,
                inserted_at: Instant::now(),
            },
        );
        true
    }

    /// Drops the entry for `table`. Returns whether one was present.
    pub async fn invalidate(&self, table: Table) -> bool {
        let mut state = self.state.write().await;
        let removed = state.entries.remove(&table).is_some();
        *state.generations.entry(table).or_default() += 1;
        debug!("Invalidated cache for '{}' (was cached: {})", table, removed);
        removed
    }
}

/// A `TableStore` fronted by a `TableCache`.
///
/// Reads go through the cache; every write invalidates the written table
/// afterwards, whether or not the write succeeded.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    cache: TableCache,
}

impl<S: TableStore> CachedStore<S> {
    /// Wraps `inner` with `cache`.
    #[must_use]
    pub const fn new(inner: S, cache: TableCache) -> Self {
        Self { inner, cache }
    }

    /// The uncached store.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    #[cfg(test)]
    pub(crate) const fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Loads `table`, serving from the cache while the entry is fresh.
    pub async fn load(&self, table: Table) -> Result<Arc<Sheet>> {
        if let Some(sheet) = self.cache.get(table).await {
            trace!("Cache hit for '{}'", table);
            return Ok(sheet);
        }
        self.load_fresh(table).await
    }

    /// Loads `table` from the store, bypassing and then refreshing the cache.
    ///
    /// The result is not cached when a write invalidated the table while the
    /// read was in flight.
    pub async fn load_fresh(&self, table: Table) -> Result<Arc<Sheet>> {
        let generation = self.cache.generation(table).await;
        let sheet = Arc::new(self.inner.load(table).await?);
        self.cache
            .insert(table, Arc::clone(&sheet), generation)
            .await;
        Ok(sheet)
    }

    /// Appends a row and invalidates the table's cache entry.
    pub async fn append(&self, table: Table, values: Vec<CellValue>) -> Result<u32> {
        let result = self.inner.append(table, values).await;
        self.cache.invalidate(table).await;
        result
    }

    /// Overwrites one cell and invalidates the table's cache entry.
    pub async fn write_cell(
        &self,
        table: Table,
        row: u32,
        column: &str,
        value: CellValue,
    ) -> Result<()> {
        let result = self.inner.write_cell(table, row, column, value).await;
        self.cache.invalidate(table).await;
        result
    }
}
