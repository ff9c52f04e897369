use std::time::Duration;

use quotewatch_market_data::{provider::DEFAULT_BASE_URL, InstrumentCode, WatchItem};

const DEFAULT_STOCKS: &str = "005930:삼성전자";

/// Log output format, from `QW_LOG_FORMAT`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

pub struct Config {
    pub stocks: Vec<WatchItem>,
    /// `QW_STOCKS` entries that were not valid instrument codes.
    pub rejected_stocks: Vec<String>,
    pub update_interval: Duration,
    pub quote_base_url: String,
    pub request_timeout: Duration,
    pub attempt_timeout: Duration,
    pub item_delay: Duration,
    pub log_format: LogFormat,
    pub run_once: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let stocks = std::env::var("QW_STOCKS").unwrap_or_else(|_| DEFAULT_STOCKS.into());
        let (stocks, rejected_stocks) = parse_stocks(&stocks);
        let interval_minutes: u64 = std::env::var("QW_UPDATE_INTERVAL_MINUTES")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .unwrap_or(2);
        let quote_base_url =
            std::env::var("QW_QUOTE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self {
            stocks,
            rejected_stocks,
            update_interval: Duration::from_secs(interval_minutes.max(1) * 60),
            quote_base_url,
            request_timeout: Duration::from_millis(env_millis("QW_REQUEST_TIMEOUT_MS", 30_000)),
            attempt_timeout: Duration::from_millis(env_millis("QW_ATTEMPT_TIMEOUT_MS", 45_000)),
            item_delay: Duration::from_millis(env_millis("QW_ITEM_DELAY_MS", 1_000)),
            log_format: std::env::var("QW_LOG_FORMAT")
                .map(|value| LogFormat::parse(&value))
                .unwrap_or_default(),
            run_once: std::env::args().skip(1).any(|arg| arg == "--once"),
        }
    }
}

fn env_millis(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse `code[:name],...` into watch items ordered as listed.
///
/// Entries without a name get the synthetic `주식 <code>` name.
fn parse_stocks(raw: &str) -> (Vec<WatchItem>, Vec<String>) {
    let mut items = Vec::new();
    let mut rejected = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, name) = match entry.split_once(':') {
            Some((code, name)) => (code, Some(name.trim())),
            None => (entry, None),
        };
        match InstrumentCode::parse(code) {
            Ok(code) => {
                let name = name
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| code.default_name());
                let order = items.len() as u32;
                items.push(WatchItem::new(code, name).with_order(order));
            }
            Err(_) => rejected.push(entry.to_string()),
        }
    }

    (items, rejected)
}
