use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::{FetchCoordinator, FetchOutcome, QuoteCache};
use crate::models::{InstrumentCode, QuoteRecord, WatchItem};

/// Default pause between two instruments in one refresh.
pub const DEFAULT_ITEM_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one pass over the watchlist.
#[derive(Clone, Debug, Default)]
pub struct RefreshSummary {
    /// One record per enabled item, in watchlist order. Failed items carry
    /// the placeholder record.
    pub records: Vec<QuoteRecord>,
    pub succeeded: usize,
    pub failed: usize,
}

impl RefreshSummary {
    /// Whether at least one record carries real data.
    pub fn has_valid_records(&self) -> bool {
        self.records.iter().any(QuoteRecord::is_valid)
    }

    /// Diagnostic of the failed fetch for `code` in this pass, if any.
    pub fn failure_for(&self, code: &InstrumentCode) -> Option<&str> {
        self.records
            .iter()
            .find(|record| &record.code == code)
            .and_then(|record| record.error.as_deref())
    }

    /// Mark cached records whose refresh failed in this pass.
    pub fn annotate_stale(&self, records: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
        records
            .into_iter()
            .map(|mut record| {
                record.last_error = self.failure_for(&record.code).map(str::to_string);
                record
            })
            .collect()
    }
}

/// Refreshes a watchlist one instrument at a time and keeps the cache current.
pub struct QuoteRefresher {
    coordinator: FetchCoordinator,
    cache: Arc<QuoteCache>,
    item_delay: Duration,
}

impl QuoteRefresher {
    pub fn new(coordinator: FetchCoordinator, cache: Arc<QuoteCache>) -> Self {
        Self {
            coordinator,
            cache,
            item_delay: DEFAULT_ITEM_DELAY,
        }
    }

    pub fn with_item_delay(mut self, item_delay: Duration) -> Self {
        self.item_delay = item_delay;
        self
    }

    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    /// Fetch every enabled item in order.
    ///
    /// Successful quotes replace the cached entry; failures leave it alone.
    pub async fn refresh_all(&self, items: &[WatchItem]) -> RefreshSummary {
        let enabled: Vec<&WatchItem> = items.iter().filter(|item| item.enabled).collect();
        info!("Refreshing {} of {} watched instruments", enabled.len(), items.len());

        let mut summary = RefreshSummary::default();
        for (index, item) in enabled.iter().enumerate() {
            if index > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }

            let outcome = self.coordinator.fetch_with_retry(&item.code).await;
            let record = outcome.to_record().with_watch_item(item);
            match outcome {
                FetchOutcome::Fetched(quote) => {
                    self.cache.insert(quote);
                    summary.succeeded += 1;
                }
                FetchOutcome::Failed(_) => summary.failed += 1,
            }
            summary.records.push(record);
        }

        info!(
            "Refresh finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        summary
    }

    /// Cached quotes for the enabled items, sorted by configured order.
    ///
    /// Items that never produced a quote are left out.
    pub fn display_records(&self, items: &[WatchItem]) -> Vec<QuoteRecord> {
        let cached = self.cache.snapshot();
        let mut records: Vec<QuoteRecord> = items
            .iter()
            .filter(|item| item.enabled)
            .filter_map(|item| {
                let quote = cached.get(&item.code);
                if quote.is_none() {
                    debug!("No cached quote for {}", item.code);
                }
                quote.map(|quote| QuoteRecord::from(quote).with_watch_item(item))
            })
            .collect();
        records.sort_by_key(|record| record.order.unwrap_or(0));
        records
    }
}
