use std::fmt::Display;

use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::instrument::InstrumentCode;
use super::quote::{Quote, Trend};
use super::watch::WatchItem;

/// Korea Standard Time, UTC+9, no daylight saving.
const KST_OFFSET_SECS: i32 = 9 * 60 * 60;

fn as_display_string<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn as_signed_change<S: Serializer>(change: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_signed_change(*change))
}

/// `+500`, `-500` or `0`.
pub(crate) fn format_signed_change(change: i64) -> String {
    if change > 0 {
        format!("+{change}")
    } else {
        change.to_string()
    }
}

/// Time of day the way a Korean locale prints it, e.g. `오후 3:05:09`.
pub fn korean_time_of_day(at: DateTime<Utc>) -> String {
    let local = match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at.with_timezone(&kst).naive_local(),
        None => at.naive_utc(),
    };
    let (is_pm, hour) = local.hour12();
    let meridiem = if is_pm { "오후" } else { "오전" };
    format!("{} {}:{:02}:{:02}", meridiem, hour, local.minute(), local.second())
}

/// Flat record handed to the display layer.
///
/// Numbers are serialized as strings and `change` carries an explicit sign,
/// which is the shape the overlay consumes. A record with a zero price or an
/// `error` means "no data", never a zero-priced instrument.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub code: InstrumentCode,
    pub name: String,
    #[serde(serialize_with = "as_display_string")]
    pub price: u64,
    #[serde(serialize_with = "as_display_string")]
    pub yesterday_price: u64,
    #[serde(serialize_with = "as_signed_change")]
    pub change: i64,
    #[serde(serialize_with = "as_display_string")]
    pub change_rate: Decimal,
    #[serde(serialize_with = "as_display_string")]
    pub volume: u64,
    pub trend_direction: Trend,
    /// RFC 3339 capture instant.
    pub last_updated: String,
    pub update_time: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the latest refresh failed and this record is an older quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl QuoteRecord {
    /// Placeholder returned when every attempt failed.
    pub fn failed(code: &InstrumentCode, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            code: code.clone(),
            name: code.default_name(),
            price: 0,
            yesterday_price: 0,
            change: 0,
            change_rate: Decimal::ZERO,
            volume: 0,
            trend_direction: Trend::Flat,
            last_updated: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            update_time: korean_time_of_day(at),
            timestamp: at.timestamp_millis(),
            error: Some(message.into()),
            last_error: None,
            order: None,
            enabled: None,
        }
    }

    /// Whether the record carries real data.
    pub fn is_valid(&self) -> bool {
        self.price > 0 && self.error.is_none()
    }

    /// Overlay the configured name and ordering of a watchlist entry.
    pub fn with_watch_item(mut self, item: &WatchItem) -> Self {
        self.name = item.name.clone();
        self.order = Some(item.order);
        self.enabled = Some(item.enabled);
        self
    }

    /// The change formatted with its sign, e.g. `+500`.
    pub fn signed_change(&self) -> String {
        format_signed_change(self.change)
    }
}

impl From<&Quote> for QuoteRecord {
    fn from(quote: &Quote) -> Self {
        let at = quote.retrieved_at();
        Self {
            code: quote.code().clone(),
            name: quote.name().to_string(),
            price: quote.current_price(),
            yesterday_price: quote.prior_close_price(),
            change: quote.change(),
            change_rate: quote.change_rate_percent(),
            volume: quote.volume(),
            trend_direction: quote.trend(),
            last_updated: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            update_time: korean_time_of_day(at),
            timestamp: at.timestamp_millis(),
            error: None,
            last_error: None,
            order: None,
            enabled: None,
        }
    }
}
