//! Fetch-retry coordinator.
//!
//! Runs fetch → extract → validate for one instrument and retries with
//! backoff until a valid quote comes back or the attempt budget is spent:
//!
//! ```text
//! Attempting(n) ──ok──▶ ValidatingResult ──valid──▶ Succeeded
//!      │                      │
//!      │ error                │ invalid
//!      ▼                      ▼
//! RetryingAfterError(n)   RetryingAfterInvalid(n) ──▶ Attempting(n+1)
//!      │ (budget spent, from either)
//!      ▼
//! ExhaustedFailure ──▶ placeholder record
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{QuoteValidator, RetryPolicy};
use crate::errors::MarketDataError;
use crate::extract::Extractor;
use crate::models::{InstrumentCode, Quote, QuoteRecord};
use crate::provider::QuotePageSource;

/// Result of [`FetchCoordinator::fetch_with_retry`].
#[derive(Clone, Debug)]
pub enum FetchOutcome {
    /// A validated quote.
    Fetched(Quote),
    /// Every attempt failed; carries the placeholder record with a diagnostic.
    Failed(QuoteRecord),
}

impl FetchOutcome {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Fetched(quote) => Some(quote),
            Self::Failed(_) => None,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    /// Display record for either outcome.
    pub fn to_record(&self) -> QuoteRecord {
        match self {
            Self::Fetched(quote) => QuoteRecord::from(quote),
            Self::Failed(record) => record.clone(),
        }
    }
}

/// What to do after an attempt that did not succeed.
enum Retry {
    AfterInvalid(MarketDataError),
    AfterError(MarketDataError),
}

/// Orchestrates fetch, extraction and validation for a single instrument.
pub struct FetchCoordinator {
    source: Arc<dyn QuotePageSource>,
    extractor: Extractor,
    validator: QuoteValidator,
    policy: RetryPolicy,
}

impl FetchCoordinator {
    /// Create a coordinator with default extractor, validator and policy.
    pub fn new(source: Arc<dyn QuotePageSource>) -> Self {
        Self::with_config(source, Extractor::new(), QuoteValidator::new(), RetryPolicy::default())
    }

    /// Create a coordinator with custom configuration.
    pub fn with_config(
        source: Arc<dyn QuotePageSource>,
        extractor: Extractor,
        validator: QuoteValidator,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            source,
            extractor,
            validator,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch a quote for `code`, retrying per the policy.
    ///
    /// Never returns an error: exhaustion yields [`FetchOutcome::Failed`] with a
    /// placeholder record whose `error` names the last failure.
    pub async fn fetch_with_retry(&self, code: &InstrumentCode) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            info!(
                "Requesting quote for {} (attempt {}/{})",
                code,
                attempt + 1,
                max_attempts
            );

            let retry = match self.attempt(code).await {
                Ok(quote) => match self.validator.validate(&quote) {
                    Ok(()) => {
                        info!("Quote collected for {}", code);
                        return FetchOutcome::Fetched(quote);
                    }
                    Err(e) => Retry::AfterInvalid(e),
                },
                Err(e) => Retry::AfterError(e),
            };

            let (error, delay) = match retry {
                Retry::AfterInvalid(e) => (e, self.policy.invalid_backoff),
                Retry::AfterError(e) => {
                    let delay = e.retry_class().delay(self.policy.error_backoff);
                    (e, delay)
                }
            };

            if attempt >= self.policy.max_retries {
                return self.exhausted(code, error, attempt + 1);
            }

            warn!(
                "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                attempt + 1,
                max_attempts,
                code,
                error,
                delay
            );
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    /// One fetch-and-extract attempt, bounded by the attempt timeout.
    async fn attempt(&self, code: &InstrumentCode) -> Result<Quote, MarketDataError> {
        let html = tokio::time::timeout(self.policy.attempt_timeout, self.source.fetch_html(code))
            .await
            .map_err(|_| MarketDataError::Timeout {
                source_id: self.source.id().to_string(),
            })??;

        debug!("Extracting quote for {} from {} bytes", code, html.len());
        Ok(self.extractor.extract_html(&html, code)?)
    }

    fn exhausted(&self, code: &InstrumentCode, error: MarketDataError, attempts: u32) -> FetchOutcome {
        warn!(
            "Giving up on {} after {} attempts: {}",
            code, attempts, error
        );
        let message = format!(
            "{} ({}/{} 시도 후 실패)",
            error,
            attempts,
            self.policy.max_attempts()
        );
        FetchOutcome::Failed(QuoteRecord::failed(code, message, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::ValidatorConfig;
    use crate::models::Trend;
    use crate::testing::{code, falling_page, transient, ScriptedSource};

    fn no_backoff() -> RetryPolicy {
        RetryPolicy {
            invalid_backoff: Duration::ZERO,
            error_backoff: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    fn coordinator(source: Arc<ScriptedSource>, policy: RetryPolicy) -> FetchCoordinator {
        FetchCoordinator::with_config(source, Extractor::new(), QuoteValidator::new(), policy)
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(falling_page(
            "삼성전자", "71,500", "500",
        ))]));
        let outcome = coordinator(source.clone(), no_backoff())
            .fetch_with_retry(&code("005930"))
            .await;

        let quote = outcome.quote().expect("quote");
        assert_eq!(quote.current_price(), 71_500);
        assert_eq!(quote.change(), -500);
        assert_eq!(quote.trend(), Trend::Down);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_always_transient_makes_three_attempts() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let outcome = coordinator(source.clone(), no_backoff())
            .fetch_with_retry(&code("005930"))
            .await;

        assert_eq!(source.calls(), 3);
        let FetchOutcome::Failed(record) = outcome else {
            panic!("expected failure placeholder");
        };
        assert_eq!(record.price, 0);
        assert_eq!(record.volume, 0);
        assert!(!record.is_valid());
        let error = record.error.expect("diagnostic");
        assert!(error.contains("connection reset"));
        assert!(error.ends_with("(3/3 시도 후 실패)"));
    }

    #[tokio::test]
    async fn test_success_after_transient_failure() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(transient()),
            Ok(falling_page("삼성전자", "71,500", "500")),
            Ok(falling_page("삼성전자", "1,000", "0")),
        ]));
        let outcome = coordinator(source.clone(), no_backoff())
            .fetch_with_retry(&code("005930"))
            .await;

        assert_eq!(outcome.quote().map(|q| q.current_price()), Some(71_500));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_retried_then_exhausted() {
        let empty = "<html><body><p>점검 중</p></body></html>".to_string();
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(empty.clone()),
            Ok(empty.clone()),
            Ok(empty),
        ]));
        let outcome = coordinator(source.clone(), RetryPolicy::default())
            .fetch_with_retry(&code("005930"))
            .await;

        assert_eq!(source.calls(), 3);
        let record = outcome.to_record();
        assert!(record
            .error
            .as_deref()
            .is_some_and(|e| e.contains("rate_info container not found")));
    }

    #[tokio::test]
    async fn test_placeholder_uses_synthetic_name() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let outcome = coordinator(source, no_backoff())
            .fetch_with_retry(&code("000660"))
            .await;
        assert_eq!(outcome.to_record().name, "주식 000660");
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_backoff_is_applied_between_attempts() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let coordinator = coordinator(source.clone(), RetryPolicy::default());

        let started = tokio::time::Instant::now();
        let outcome = coordinator.fetch_with_retry(&code("005930")).await;

        assert!(!outcome.is_fetched());
        assert_eq!(source.calls(), 3);
        // Two retries, 5 seconds each; no wait after the last attempt.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_backs_off_then_succeeds() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(MarketDataError::Timeout {
                source_id: "SCRIPTED".to_string(),
            }),
            Ok(falling_page("삼성전자", "71,500", "500")),
        ]));
        let coordinator = coordinator(source.clone(), RetryPolicy::default());

        let started = tokio::time::Instant::now();
        let outcome = coordinator.fetch_with_retry(&code("005930")).await;

        assert!(outcome.is_fetched());
        assert_eq!(source.calls(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_quote_waits_invalid_backoff() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(falling_page("삼성전자", "71,500", "500")),
            Ok(falling_page("삼성전자", "69,000", "500")),
        ]));
        let validator = QuoteValidator::with_config(ValidatorConfig {
            reject_above_price: Some(70_000),
            ..ValidatorConfig::default()
        });
        let coordinator = FetchCoordinator::with_config(
            source.clone(),
            Extractor::new(),
            validator,
            RetryPolicy::default(),
        );

        let started = tokio::time::Instant::now();
        let outcome = coordinator.fetch_with_retry(&code("005930")).await;

        assert_eq!(outcome.quote().map(|q| q.current_price()), Some(69_000));
        assert_eq!(source.calls(), 2);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_quotes_exhaust_with_validation_message() {
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(falling_page("삼성전자", "71,500", "500")),
            Ok(falling_page("삼성전자", "71,600", "400")),
            Ok(falling_page("삼성전자", "71,700", "300")),
        ]));
        let validator = QuoteValidator::with_config(ValidatorConfig {
            reject_above_price: Some(70_000),
            ..ValidatorConfig::default()
        });
        let coordinator = FetchCoordinator::with_config(
            source.clone(),
            Extractor::new(),
            validator,
            RetryPolicy::default(),
        );

        let started = tokio::time::Instant::now();
        let record = coordinator.fetch_with_retry(&code("005930")).await.to_record();

        assert_eq!(source.calls(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
        let error = record.error.expect("diagnostic");
        assert!(error.starts_with("Validation failed: Price (71700) exceeds hard limit"));
        assert!(error.ends_with("(3/3 시도 후 실패)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out_as_retryable() {
        struct SlowSource;

        #[async_trait::async_trait]
        impl QuotePageSource for SlowSource {
            fn id(&self) -> &'static str {
                "SLOW"
            }

            async fn fetch_html(&self, _code: &InstrumentCode) -> Result<String, MarketDataError> {
                tokio::time::sleep(Duration::from_secs(120)).await;
                Ok(String::new())
            }
        }

        let coordinator = FetchCoordinator::with_config(
            Arc::new(SlowSource),
            Extractor::new(),
            QuoteValidator::new(),
            RetryPolicy {
                max_retries: 0,
                ..RetryPolicy::default()
            },
        );
        let record = coordinator.fetch_with_retry(&code("005930")).await.to_record();
        assert!(record
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Timeout: SLOW")));
    }
}
