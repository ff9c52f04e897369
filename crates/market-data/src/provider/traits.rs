//! Quote page source trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::InstrumentCode;

/// Capability to obtain the HTML of an instrument's quote page.
///
/// The coordinator owns retries and timeouts; implementations should make a
/// single attempt and classify failures through [`MarketDataError`] so the
/// coordinator can pick the right backoff.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use quotewatch_market_data::provider::QuotePageSource;
///
/// struct FixtureSource(String);
///
/// #[async_trait]
/// impl QuotePageSource for FixtureSource {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     async fn fetch_html(&self, _code: &InstrumentCode) -> Result<String, MarketDataError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait QuotePageSource: Send + Sync {
    /// Identifier used in logs and error messages, e.g. "NAVER".
    fn id(&self) -> &'static str;

    /// Fetch the raw HTML of the quote page for `code`.
    async fn fetch_html(&self, code: &InstrumentCode) -> Result<String, MarketDataError>;
}
