//! Quote fetch coordination.
//!
//! This module drives the page source, extractor and validator, including:
//! - Retry with backoff per instrument
//! - Quote data validation
//! - Sequential watchlist refresh
//! - The shared cache of last successful quotes

mod cache;
mod coordinator;
mod policy;
mod refresher;
mod validator;

pub use cache::QuoteCache;
pub use coordinator::{FetchCoordinator, FetchOutcome};
pub use policy::RetryPolicy;
pub use refresher::{QuoteRefresher, RefreshSummary, DEFAULT_ITEM_DELAY};
pub use validator::{QuoteValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
