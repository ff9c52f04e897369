//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for page fetching and extraction
//! - [`ExtractionFailure`]: Structured failure produced by the extractor
//! - [`RetryClass`]: Classification for determining retry behavior

mod extraction;
mod retry;

pub use extraction::{ExtractionFailure, ExtractionReason, PageSnapshot};
pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while obtaining and reading a quote page.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the coordinator schedules the next attempt.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The instrument code is not a 6-digit numeric code.
    #[error("Invalid instrument code: {0}")]
    InvalidInstrument(String),

    /// The request or the whole attempt timed out.
    #[error("Timeout: {source_id}")]
    Timeout {
        /// The page source that timed out
        source_id: String,
    },

    /// The page could not be loaded (network failure, non-success status).
    #[error("Load failed: {source_id} - {message}")]
    LoadFailed {
        /// The page source that failed
        source_id: String,
        /// Description of the failure
        message: String,
    },

    /// The quote site refused the request (HTTP 401/403).
    #[error("Access denied: {source_id}")]
    AccessDenied {
        /// The page source that was refused
        source_id: String,
    },

    /// The channel delivering the page is not available.
    #[error("Channel unavailable: {source_id}")]
    ChannelUnavailable {
        /// The page source whose channel is gone
        source_id: String,
    },

    /// The page was loaded but no usable quote could be read from it.
    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    /// The extracted quote failed validation.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// Anything else raised by a page source.
    #[error("{0}")]
    Other(String),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::WithBackoff`]: timeout, load failure, access denied, channel unavailable
    /// - [`RetryClass::Immediate`]: everything else
    ///
    /// # Examples
    ///
    /// ```
    /// use quotewatch_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { source_id: "NAVER".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::Other("boom".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Immediate);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Timeout { .. }
            | Self::LoadFailed { .. }
            | Self::AccessDenied { .. }
            | Self::ChannelUnavailable { .. } => RetryClass::WithBackoff,

            Self::InvalidInstrument(_)
            | Self::Extraction(_)
            | Self::ValidationFailed { .. }
            | Self::Other(_) => RetryClass::Immediate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_retries_with_backoff() {
        let error = MarketDataError::Timeout {
            source_id: "NAVER".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_load_failed_retries_with_backoff() {
        let error = MarketDataError::LoadFailed {
            source_id: "NAVER".to_string(),
            message: "HTTP 502".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_access_denied_retries_with_backoff() {
        let error = MarketDataError::AccessDenied {
            source_id: "NAVER".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_channel_unavailable_retries_with_backoff() {
        let error = MarketDataError::ChannelUnavailable {
            source_id: "NAVER".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_extraction_failure_retries_immediately() {
        let error: MarketDataError =
            ExtractionFailure::new(ExtractionReason::PriceNotFound).into();
        assert_eq!(error.retry_class(), RetryClass::Immediate);
    }

    #[test]
    fn test_other_retries_immediately() {
        let error = MarketDataError::Other("unexpected".to_string());
        assert_eq!(error.retry_class(), RetryClass::Immediate);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::InvalidInstrument("ABC".to_string());
        assert_eq!(format!("{}", error), "Invalid instrument code: ABC");

        let error = MarketDataError::LoadFailed {
            source_id: "NAVER".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(format!("{}", error), "Load failed: NAVER - HTTP 500");

        let error: MarketDataError =
            ExtractionFailure::new(ExtractionReason::MalformedNumericField { field: "price" })
                .into();
        assert_eq!(
            format!("{}", error),
            "extraction failed: malformed numeric field: price"
        );
    }
}
