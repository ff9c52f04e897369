//! Quote page sources.
//!
//! This module contains:
//! - The `QuotePageSource` trait through which the coordinator obtains HTML
//! - The Naver Finance implementation backed by `reqwest`
//!
//! Sources only fetch. Reading the page is the extractor's job, and retries
//! belong to the coordinator.

mod naver;
mod traits;

pub use naver::{NaverFinanceSource, NaverFinanceSourceConfig, DEFAULT_BASE_URL};
pub use traits::QuotePageSource;
