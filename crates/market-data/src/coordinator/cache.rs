//! Shared store of the latest successful quote per instrument.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::models::{InstrumentCode, Quote};

/// Latest successful quote per instrument.
///
/// Only validated quotes are stored. A failed refresh leaves the previous
/// entry in place, so readers keep seeing the last known price.
#[derive(Debug, Default)]
pub struct QuoteCache {
    quotes: RwLock<HashMap<InstrumentCode, Quote>>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `quote`, replacing any earlier entry for its code.
    pub fn insert(&self, quote: Quote) -> Option<Quote> {
        self.write().insert(quote.code().clone(), quote)
    }

    pub fn get(&self, code: &InstrumentCode) -> Option<Quote> {
        self.read().get(code).cloned()
    }

    /// Copy of every stored quote.
    pub fn snapshot(&self) -> HashMap<InstrumentCode, Quote> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Entries are whole quotes, so a panicked writer cannot leave one half-written.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<InstrumentCode, Quote>> {
        self.quotes.read().unwrap_or_else(|poisoned| {
            warn!("Quote cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<InstrumentCode, Quote>> {
        self.quotes.write().unwrap_or_else(|poisoned| {
            warn!("Quote cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
