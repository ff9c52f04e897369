//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::InstrumentCode;
use crate::provider::QuotePageSource;

/// Minimal item page with a falling price.
pub(crate) fn falling_page(name: &str, price: &str, amount: &str) -> String {
    format!(
        r##"<html><head><title>{name} : 네이버 증권</title></head><body>
        <div class="new_totalinfo">
          <div class="wrap_company"><h2><a href="#">{name}</a></h2></div>
          <div class="rate_info"><div class="today">
            <p class="no_today"><em><span class="blind">{price}</span></em></p>
            <p class="no_exday"><em><span class="ico down"></span><span class="blind">하락</span><span class="blind">{amount}</span></em></p>
          </div>
          <table class="no_info"><tr>
            <td><span class="blind">1</span></td><td><span class="blind">2</span></td>
            <td><span class="blind">3</span></td><td><span class="blind">4,321</span></td>
          </tr></table></div>
        </div></body></html>"##
    )
}

pub(crate) fn transient() -> MarketDataError {
    MarketDataError::LoadFailed {
        source_id: "SCRIPTED".to_string(),
        message: "connection reset".to_string(),
    }
}

pub(crate) fn code(code: &str) -> InstrumentCode {
    InstrumentCode::parse(code).unwrap()
}

/// Page source replaying a fixed script of responses.
///
/// Once the script runs out, every call returns a transient error.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, MarketDataError>>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<InstrumentCode>>,
}

impl ScriptedSource {
    pub(crate) fn new(script: Vec<Result<String, MarketDataError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requested(&self) -> Vec<InstrumentCode> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuotePageSource for ScriptedSource {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    async fn fetch_html(&self, code: &InstrumentCode) -> Result<String, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(code.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(transient()))
    }
}
