//! Paginated, reactive view over cached setups.
//!
//! A [`SetupPager`] hands out consecutive pages of one [`SetupQuery`]. It
//! holds a store watch for the query's shape, opened before the first
//! read, so a write that lands between two pages is never missed: the next
//! page after such a write restarts from the top and covers everything the
//! consumer has loaded so far. Rows may then be delivered twice, never
//! skipped.

use pitlane_core::{SetupQuery, SetupRecord};
use pitlane_db::{SetupStore, StoreError};
use pitlane_events::{Watch, WatchClosed};

/// One batch of rows from a [`SetupPager`].
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<SetupRecord>,
    /// Position of the first record in the ordered result.
    pub offset: u64,
    /// Incremented every time the pager restarts after a store change.
    pub generation: u64,
    /// `true` when this page replaces everything delivered before it.
    pub refreshed: bool,
    /// `true` when the store had no more rows at read time.
    pub is_last: bool,
}

/// Incrementally loads the rows matching one query.
pub struct SetupPager {
    store: SetupStore,
    query: SetupQuery,
    page_size: u64,
    watch: Watch,
    loaded: u64,
    generation: u64,
    delivered_any: bool,
    stale: bool,
}

impl SetupPager {
    /// Open a pager. The store watch is taken here, before any read.
    pub fn new(store: SetupStore, query: SetupQuery, page_size: u64) -> Self {
        let watch = store.watch(&query);
        Self {
            store,
            query,
            page_size: page_size.max(1),
            watch,
            loaded: 0,
            generation: 0,
            delivered_any: false,
            stale: false,
        }
    }

    pub fn query(&self) -> &SetupQuery {
        &self.query
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows delivered in the current generation.
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load the next page, or a refreshed first page if the store changed.
    pub async fn next_page(&mut self) -> Result<Page, StoreError> {
        // Drain before reading: a change published after this point stays
        // queued for the next call.
        let invalidated = self.watch.take_pending() | std::mem::take(&mut self.stale);

        if invalidated && self.delivered_any {
            return self.reload().await;
        }

        let offset = self.loaded;
        let records = self
            .store
            .query_page(&self.query, offset, self.page_size)
            .await?;
        let is_last = (records.len() as u64) < self.page_size;
        self.loaded += records.len() as u64;
        self.delivered_any = true;

        Ok(Page {
            records,
            offset,
            generation: self.generation,
            refreshed: false,
            is_last,
        })
    }

    /// Restart from the first row regardless of store changes.
    ///
    /// The returned page is marked `refreshed`, like one following a store
    /// change.
    pub async fn restart(&mut self) -> Result<Page, StoreError> {
        self.watch.take_pending();
        self.stale = false;
        self.loaded = 0;
        self.delivered_any = false;
        self.generation += 1;
        let mut page = self.next_page().await?;
        page.refreshed = true;
        Ok(page)
    }

    /// Wait until a write affecting this query lands.
    ///
    /// The following [`next_page`](Self::next_page) returns a refreshed
    /// page.
    pub async fn changed(&mut self) -> Result<(), WatchClosed> {
        self.watch.changed().await?;
        self.stale = true;
        Ok(())
    }

    async fn reload(&mut self) -> Result<Page, StoreError> {
        let limit = self.loaded.max(self.page_size);
        let records = self.store.query_page(&self.query, 0, limit).await?;
        self.generation += 1;
        self.loaded = records.len() as u64;

        tracing::debug!(
            circuit = %self.query.circuit,
            generation = self.generation,
            rows = records.len(),
            "Setup pager reloaded after store change"
        );

        Ok(Page {
            is_last: (records.len() as u64) < limit,
            records,
            offset: 0,
            generation: self.generation,
            refreshed: true,
        })
    }
}
