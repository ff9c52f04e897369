//! Quote data validation.
//!
//! Decides whether an extracted quote counts as data:
//! - A zero price is a hard failure (the record means "no data")
//! - A change that disagrees with the prices or trend is a hard failure
//! - A price above the optional hard limit is a hard failure
//! - Implausibly large prices, zero volume and a synthetic name are warnings

use log::warn;

use crate::errors::MarketDataError;
use crate::models::{Quote, Trend};

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - reject quote, retry the attempt.
    Hard,
    /// Soft warning - accept quote but log warning.
    Soft,
}

/// Validation result details.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Description of the issue.
    pub message: String,
}

/// Quote validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Maximum plausible price (for sanity check).
    pub max_price: Option<u64>,
    /// Prices above this are rejected outright, e.g. a misread concatenated number.
    pub reject_above_price: Option<u64>,
    /// Whether to warn on zero volume.
    pub warn_on_zero_volume: bool,
    /// Whether to warn when no name was found on the page.
    pub warn_on_default_name: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_price: Some(100_000_000), // above any listed KRX share price
            reject_above_price: None,
            warn_on_zero_volume: true,
            warn_on_default_name: true,
        }
    }
}

/// Quote data validator.
pub struct QuoteValidator {
    config: ValidatorConfig,
}

impl QuoteValidator {
    /// Create a new validator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a quote.
    ///
    /// Returns Ok(()) if the quote is valid, or Err with details if invalid.
    /// Warnings are logged but do not cause rejection.
    pub fn validate(&self, quote: &Quote) -> Result<(), MarketDataError> {
        let issues = self.issues(quote);

        let errors: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Hard)
            .map(|i| i.message.as_str())
            .collect();

        if !errors.is_empty() {
            return Err(MarketDataError::ValidationFailed {
                message: errors.join("; "),
            });
        }

        for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
            warn!("Quote validation warning for {}: {}", quote.code(), issue.message);
        }

        Ok(())
    }

    /// Collect every issue found in `quote`.
    pub fn issues(&self, quote: &Quote) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.validate_price(quote, &mut issues);
        self.validate_change(quote, &mut issues);
        self.validate_volume(quote, &mut issues);
        self.validate_name(quote, &mut issues);
        issues
    }

    fn validate_price(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        if !quote.is_valid() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: "Zero current price".to_string(),
            });
            return;
        }

        if let Some(limit) = self.config.reject_above_price {
            if quote.current_price() > limit {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Hard,
                    message: format!(
                        "Price ({}) exceeds hard limit ({})",
                        quote.current_price(),
                        limit
                    ),
                });
                return;
            }
        }

        if let Some(max_price) = self.config.max_price {
            if quote.current_price() > max_price {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Soft,
                    message: format!(
                        "Price ({}) exceeds max threshold ({})",
                        quote.current_price(),
                        max_price
                    ),
                });
            }
        }
    }

    fn validate_change(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        let expected = quote.current_price() as i128 - quote.prior_close_price() as i128;
        if quote.change() as i128 != expected || quote.trend() != Trend::from_change(quote.change())
        {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!(
                    "Inconsistent change {} ({}) for price {} and prior close {}",
                    quote.change(),
                    quote.trend().as_str(),
                    quote.current_price(),
                    quote.prior_close_price()
                ),
            });
        }
    }

    fn validate_volume(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        if self.config.warn_on_zero_volume && quote.volume() == 0 {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: "Zero volume (market may be closed)".to_string(),
            });
        }
    }

    fn validate_name(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        if self.config.warn_on_default_name && quote.has_default_name() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: "Name not found on page".to_string(),
            });
        }
    }
}

impl Default for QuoteValidator {
    fn default() -> Self {
        Self::new()
    }
}
