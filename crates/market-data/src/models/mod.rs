//! Market data models
//!
//! This module contains the core data types of the quote pipeline:
//! - `instrument` - Validated 6-digit instrument code (InstrumentCode)
//! - `quote` - Normalized quote and its trend classification (Quote, Trend)
//! - `record` - Flat display record serialized at the output boundary (QuoteRecord)
//! - `watch` - Configured watchlist entries (WatchItem)

mod instrument;
mod quote;
mod record;
mod watch;

pub use instrument::InstrumentCode;
pub use quote::{change_rate_percent, Quote, Trend, MAX_PRICE};
pub use record::{korean_time_of_day, QuoteRecord};
pub use watch::WatchItem;
