//! QuoteWatch Market Data Crate
//!
//! This crate reads current stock quotes for KRX instruments out of the
//! Naver Finance item page and keeps them fresh for a display layer.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Fetching the quote page for a 6-digit instrument code
//! - Extracting price, prior close, volume and name with selector fallbacks
//! - Deriving change, trend and change rate consistently
//! - Retrying failed fetches with backoff, and caching the last good quote
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  QuoteRefresher  | --> |  FetchCoordinator|  (retry, timeout, validation)
//! +------------------+     +------------------+
//!          |                       |
//!          v                       v
//! +------------------+     +------------------+
//! |   QuoteCache     |     | QuotePageSource  |  (Naver Finance over HTTP)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Extractor     |  (HTML -> Quote)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  Quote / Record  |  (domain value, display shape)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`InstrumentCode`] - Validated 6-digit instrument code
//! - [`Quote`] - Extracted quote with derived change, trend and rate
//! - [`QuoteRecord`] - Flat record consumed by the display layer
//! - [`WatchItem`] - Configured watchlist entry

pub mod coordinator;
pub mod errors;
pub mod extract;
pub mod models;
pub mod provider;

#[cfg(test)]
mod testing;

// Re-export all public types from models
pub use models::{change_rate_percent, InstrumentCode, Quote, QuoteRecord, Trend, WatchItem};

// Re-export extraction types
pub use extract::{extract, ExtractOptions, Extractor, MoveStatus, PriceMove};

// Re-export provider types
pub use provider::{NaverFinanceSource, NaverFinanceSourceConfig, QuotePageSource};

// Re-export coordinator types
pub use coordinator::{
    FetchCoordinator, FetchOutcome, QuoteCache, QuoteRefresher, QuoteValidator, RefreshSummary,
    RetryPolicy,
};

pub use errors::{ExtractionFailure, ExtractionReason, MarketDataError, RetryClass};
