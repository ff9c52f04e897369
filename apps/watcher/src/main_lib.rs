use std::sync::Arc;

use quotewatch_market_data::{
    Extractor, FetchCoordinator, NaverFinanceSource, NaverFinanceSourceConfig, QuoteCache,
    QuotePageSource, QuoteRefresher, QuoteValidator, RetryPolicy,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Install the subscriber. Takes the config so `.env` is already loaded when
/// `RUST_LOG` is read.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries the quote records.
    if config.log_format == LogFormat::Json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_refresher(config: &Config) -> QuoteRefresher {
    let source: Arc<dyn QuotePageSource> =
        Arc::new(NaverFinanceSource::with_config(NaverFinanceSourceConfig {
            base_url: config.quote_base_url.clone(),
            request_timeout: config.request_timeout,
        }));
    let policy = RetryPolicy {
        attempt_timeout: config.attempt_timeout,
        ..RetryPolicy::default()
    };
    tracing::info!(
        "Quote source {} at {} ({} attempts per instrument)",
        source.id(),
        config.quote_base_url,
        policy.max_attempts()
    );

    let coordinator =
        FetchCoordinator::with_config(source, Extractor::new(), QuoteValidator::new(), policy);
    QuoteRefresher::new(coordinator, Arc::new(QuoteCache::new())).with_item_delay(config.item_delay)
}
