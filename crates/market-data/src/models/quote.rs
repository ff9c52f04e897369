use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::instrument::InstrumentCode;

/// Direction of the price move relative to the prior close.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

impl Trend {
    /// Classify a signed change.
    pub fn from_change(change: i64) -> Self {
        match change.signum() {
            1 => Self::Up,
            -1 => Self::Down,
            _ => Self::Flat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

/// `|change| / prior_close * 100`, rounded half-up to two decimals.
///
/// Returns zero when `prior_close` is zero.
pub fn change_rate_percent(change: i64, prior_close: u64) -> Decimal {
    if prior_close == 0 {
        return Decimal::new(0, 2);
    }

    let mut rate = (Decimal::from(change.unsigned_abs()) * Decimal::ONE_HUNDRED
        / Decimal::from(prior_close))
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rate.rescale(2);
    rate
}

/// Largest price a quote can hold; keeps `change` exact in an `i64`.
pub const MAX_PRICE: u64 = i64::MAX as u64;

/// Normalized quote read from a quote page.
///
/// All derived fields (`change`, `trend`, `change_rate_percent`) are computed
/// from the current and prior-close prices at construction, so the record is
/// always internally consistent. A quote is never mutated after it is built.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    code: InstrumentCode,
    name: String,
    current_price: u64,
    prior_close_price: u64,
    change: i64,
    change_rate_percent: Decimal,
    trend: Trend,
    volume: u64,
    retrieved_at: DateTime<Utc>,
}

impl Quote {
    /// Build a quote, deriving change, trend and rate from the two prices.
    ///
    /// Prices above [`MAX_PRICE`] are capped; the extractor never produces them.
    pub fn new(
        code: InstrumentCode,
        name: String,
        current_price: u64,
        prior_close_price: u64,
        volume: u64,
        retrieved_at: DateTime<Utc>,
    ) -> Self {
        let current_price = current_price.min(MAX_PRICE);
        let prior_close_price = prior_close_price.min(MAX_PRICE);
        // Both prices fit in i64, so the difference does too.
        let change = current_price as i64 - prior_close_price as i64;

        Self {
            code,
            name,
            current_price,
            prior_close_price,
            change,
            change_rate_percent: change_rate_percent(change, prior_close_price),
            trend: Trend::from_change(change),
            volume,
            retrieved_at,
        }
    }

    pub fn code(&self) -> &InstrumentCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_price(&self) -> u64 {
        self.current_price
    }

    pub fn prior_close_price(&self) -> u64 {
        self.prior_close_price
    }

    pub fn change(&self) -> i64 {
        self.change
    }

    pub fn change_rate_percent(&self) -> Decimal {
        self.change_rate_percent
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }

    /// A quote carries data only when its current price is positive.
    pub fn is_valid(&self) -> bool {
        self.current_price > 0
    }

    /// Whether the name is the synthetic fallback label.
    pub fn has_default_name(&self) -> bool {
        self.name == self.code.default_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code() -> InstrumentCode {
        InstrumentCode::parse("005930").unwrap()
    }

    #[test]
    fn test_quote_falling() {
        let quote = Quote::new(code(), "삼성전자".into(), 71_500, 72_000, 1_000, Utc::now());
        assert_eq!(quote.change(), -500);
        assert_eq!(quote.trend(), Trend::Down);
        assert_eq!(quote.change_rate_percent(), dec!(0.69));
        assert!(quote.is_valid());
    }

    #[test]
    fn test_quote_rising() {
        let quote = Quote::new(code(), "삼성전자".into(), 60_000, 59_000, 0, Utc::now());
        assert_eq!(quote.change(), 1_000);
        assert_eq!(quote.trend(), Trend::Up);
        assert_eq!(quote.change_rate_percent(), dec!(1.69));
    }

    #[test]
    fn test_quote_flat() {
        let quote = Quote::new(code(), "삼성전자".into(), 60_000, 60_000, 0, Utc::now());
        assert_eq!(quote.change(), 0);
        assert_eq!(quote.trend(), Trend::Flat);
        assert_eq!(quote.change_rate_percent(), Decimal::ZERO);
        assert_eq!(quote.change_rate_percent().to_string(), "0.00");
    }

    #[test]
    fn test_zero_prior_close_has_zero_rate() {
        assert_eq!(change_rate_percent(500, 0), Decimal::ZERO);
    }

    #[test]
    fn test_rate_rounds_half_up() {
        // 1 / 800 * 100 = 0.125 exactly
        assert_eq!(change_rate_percent(1, 800), dec!(0.13));
        assert_eq!(change_rate_percent(-1, 800), dec!(0.13));
        // 1 / 1600 * 100 = 0.0625
        assert_eq!(change_rate_percent(1, 1600), dec!(0.06));
    }

    #[test]
    fn test_rate_keeps_two_decimals() {
        assert_eq!(change_rate_percent(100, 1000).to_string(), "10.00");
    }

    #[test]
    fn test_trend_from_change() {
        assert_eq!(Trend::from_change(3), Trend::Up);
        assert_eq!(Trend::from_change(-3), Trend::Down);
        assert_eq!(Trend::from_change(0), Trend::Flat);
    }

    #[test]
    fn test_extreme_prices_keep_change_exact() {
        let quote = Quote::new(code(), "x".into(), u64::MAX, 0, 0, Utc::now());
        assert_eq!(quote.current_price(), MAX_PRICE);
        assert_eq!(quote.change(), i64::MAX);
        assert_eq!(
            quote.change() as i128,
            quote.current_price() as i128 - quote.prior_close_price() as i128
        );

        let quote = Quote::new(code(), "x".into(), 1, u64::MAX, 0, Utc::now());
        assert_eq!(quote.change(), 1 - i64::MAX);
        assert_eq!(quote.trend(), Trend::Down);
    }

    #[test]
    fn test_default_name_detection() {
        let quote = Quote::new(code(), code().default_name(), 100, 100, 0, Utc::now());
        assert!(quote.has_default_name());
    }
}
