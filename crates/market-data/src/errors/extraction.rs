use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why the extractor could not produce a quote.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ExtractionReason {
    /// The `div.rate_info` container was absent and no fallback price was found.
    ContainerNotFound,
    /// No selector, primary or fallback, yielded a positive price.
    PriceNotFound,
    /// A located text node did not reduce to a number after stripping.
    MalformedNumericField { field: &'static str },
}

impl fmt::Display for ExtractionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerNotFound => write!(f, "rate_info container not found"),
            Self::PriceNotFound => write!(f, "price not found"),
            Self::MalformedNumericField { field } => write!(f, "malformed numeric field: {field}"),
        }
    }
}

/// Advisory description of the page that failed to extract.
///
/// Not part of the contract; only used for logs and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub title: Option<String>,
    /// `(selector, present)` for each known container.
    pub containers: Vec<(&'static str, bool)>,
    /// First few hidden-text (`.blind`) values in document order.
    pub blind_texts: Vec<String>,
    /// Body text mentions an error, suggesting an error page was served.
    pub error_page_suspected: bool,
}

/// Structured failure returned by the extractor.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("extraction failed: {reason}")]
pub struct ExtractionFailure {
    pub reason: ExtractionReason,
    pub snapshot: Option<PageSnapshot>,
}

impl ExtractionFailure {
    pub fn new(reason: ExtractionReason) -> Self {
        Self {
            reason,
            snapshot: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: PageSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}
