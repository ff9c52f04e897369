//! Naver Finance item page source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::{debug, warn};
use urlencoding::encode;

use super::traits::QuotePageSource;
use crate::errors::MarketDataError;
use crate::models::InstrumentCode;

const SOURCE_ID: &str = "NAVER";

/// Default quote site.
pub const DEFAULT_BASE_URL: &str = "https://finance.naver.com";

/// Default network timeout for a single page request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings for [`NaverFinanceSource`].
#[derive(Clone, Debug)]
pub struct NaverFinanceSourceConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for NaverFinanceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Fetches `/item/main.naver?code=<code>` pages.
pub struct NaverFinanceSource {
    client: Client,
    base_url: String,
}

impl NaverFinanceSource {
    pub fn new() -> Self {
        Self::with_config(NaverFinanceSourceConfig::default())
    }

    pub fn with_config(config: NaverFinanceSourceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(DESKTOP_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Quote page URL for `code`.
    pub fn page_url(&self, code: &InstrumentCode) -> String {
        format!("{}/item/main.naver?code={}", self.base_url, encode(code.as_str()))
    }
}

impl Default for NaverFinanceSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a non-success HTTP status to an error.
fn status_error(status: StatusCode) -> Option<MarketDataError> {
    if status.is_success() {
        return None;
    }

    Some(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MarketDataError::AccessDenied {
            source_id: SOURCE_ID.to_string(),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MarketDataError::Timeout {
            source_id: SOURCE_ID.to_string(),
        },
        _ => MarketDataError::LoadFailed {
            source_id: SOURCE_ID.to_string(),
            message: format!("HTTP {}", status),
        },
    })
}

fn request_error(error: reqwest::Error) -> MarketDataError {
    if error.is_timeout() {
        MarketDataError::Timeout {
            source_id: SOURCE_ID.to_string(),
        }
    } else {
        MarketDataError::LoadFailed {
            source_id: SOURCE_ID.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl QuotePageSource for NaverFinanceSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_html(&self, code: &InstrumentCode) -> Result<String, MarketDataError> {
        let url = self.page_url(code);
        debug!("Fetching quote page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en;q=0.8")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(request_error)?;

        if let Some(error) = status_error(response.status()) {
            warn!("Quote page request for {} failed: {}", code, error);
            return Err(error);
        }

        // Decodes using the response charset; the item page is served as EUC-KR.
        let html = response.text().await.map_err(request_error)?;
        debug!("Fetched {} bytes for {}", html.len(), code);
        Ok(html)
    }
}
