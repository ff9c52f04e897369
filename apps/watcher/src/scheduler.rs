//! Periodic watchlist refresh.
//!
//! Refreshes immediately, then on a fixed interval, printing the cached
//! records to stdout after each pass. An instrument whose latest fetch failed
//! keeps its previous quote, annotated with `lastError`.

use std::io::Write;

use serde_json::{Map, Value};
use tokio::time::interval;
use tracing::{info, warn};

use quotewatch_market_data::{QuoteRecord, QuoteRefresher, WatchItem};

use crate::config::Config;

/// Runs the refresh loop until the process is stopped, or once with `--once`.
pub async fn run(refresher: &QuoteRefresher, config: &Config) -> anyhow::Result<()> {
    let items = &config.stocks;
    if config.run_once {
        return run_refresh(refresher, items).await;
    }

    info!(
        "Quote scheduler started ({} instruments, {}-minute interval)",
        items.len(),
        config.update_interval.as_secs() / 60
    );

    // First tick is immediate.
    let mut refresh_interval = interval(config.update_interval);
    loop {
        refresh_interval.tick().await;
        if let Err(e) = run_refresh(refresher, items).await {
            warn!("Failed to publish quotes: {}", e);
        }
    }
}

/// Runs a single refresh and publishes the result.
async fn run_refresh(refresher: &QuoteRefresher, items: &[WatchItem]) -> anyhow::Result<()> {
    let summary = refresher.refresh_all(items).await;
    let records = summary.annotate_stale(refresher.display_records(items));
    if !records.iter().any(QuoteRecord::is_valid) {
        warn!(
            "No cached quotes after this refresh ({} failed), nothing published",
            summary.failed
        );
        return Ok(());
    }

    let payload = records_by_code(&records);
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &payload)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// One JSON object keyed by instrument code.
fn records_by_code(records: &[QuoteRecord]) -> Value {
    let map: Map<String, Value> = records
        .iter()
        .filter_map(|record| {
            serde_json::to_value(record)
                .ok()
                .map(|value| (record.code.to_string(), value))
        })
        .collect();
    Value::Object(map)
}
