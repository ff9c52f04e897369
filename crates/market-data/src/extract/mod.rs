//! Quote extraction from the Naver Finance item page.
//!
//! Extraction is layered:
//! 1. Structural read of the `div.rate_info` block (price, move, volume) and
//!    the `div.new_totalinfo` heading (name).
//! 2. Per-field fallback through ordered selector cascades for whatever the
//!    structural read did not produce.
//! 3. Final check that a positive price was found.
//!
//! Extraction never fails for partial data. Only a missing price is an error;
//! every other field degrades to a default.

mod movement;
mod selectors;
mod snapshot;
mod text;

pub use movement::{MoveStatus, PriceMove};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

use crate::errors::{ExtractionFailure, ExtractionReason};
use crate::models::{InstrumentCode, Quote};

use selectors::{
    ANY_ELEMENT, CHANGE_CASCADE, DIRECTION_CASCADE, EXDAY, EXDAY_BLOCK, INFO_TABLE_BLIND,
    NAME_CASCADE, PRICE_CASCADE, RATE_INFO, SPAN, TITLE_NAME, TODAY_BLOCK, TODAY_PRICE, TOTAL_INFO,
    TOTAL_INFO_HEADING, VOLUME_CASCADE,
};
use text::{element_text, parse_digits, NumericRead};

/// Fallback price candidates must exceed this to be accepted, so that stray
/// small numbers elsewhere on the page are not mistaken for a price.
const MIN_FALLBACK_PRICE: u64 = 100;

/// Position of the volume among the hidden values of `table.no_info`.
const VOLUME_INDEX: usize = 3;

/// Extraction options.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractOptions {
    /// When set, an unrecognized status label leaves the direction unresolved
    /// (to be read from marker classes) instead of being read as a rise.
    pub strict_status_label: bool,
}

/// Reads quotes out of parsed quote pages.
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

/// Extract a quote with default options.
pub fn extract(document: &Html, code: &InstrumentCode) -> Result<Quote, ExtractionFailure> {
    Extractor::new().extract(document, code)
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Parse `html` and extract a quote from it.
    pub fn extract_html(&self, html: &str, code: &InstrumentCode) -> Result<Quote, ExtractionFailure> {
        let document = Html::parse_document(html);
        self.extract(&document, code)
    }

    /// Extract a quote stamped with the current time.
    pub fn extract(&self, document: &Html, code: &InstrumentCode) -> Result<Quote, ExtractionFailure> {
        self.extract_at(document, code, Utc::now())
    }

    /// Extract a quote stamped with `retrieved_at`.
    ///
    /// Deterministic: the same document and instant always give the same quote.
    pub fn extract_at(
        &self,
        document: &Html,
        code: &InstrumentCode,
        retrieved_at: DateTime<Utc>,
    ) -> Result<Quote, ExtractionFailure> {
        let container = document.select(&RATE_INFO).next();
        if container.is_none() {
            warn!("[{}] rate_info container not found, using fallback selectors", code);
        }

        let primary_price = container.map(read_primary_price).unwrap_or(NumericRead::Missing);
        let current = match primary_price {
            NumericRead::Value(price) if price > 0 => Some(price),
            _ => {
                let price = first_value(document, &PRICE_CASCADE, |text| {
                    parse_digits(text).filter(|price| *price > MIN_FALLBACK_PRICE)
                });
                if let Some(price) = price {
                    warn!("[{}] fallback price: {}", code, price);
                }
                price
            }
        };

        let Some(current) = current else {
            let reason = if container.is_none() {
                ExtractionReason::ContainerNotFound
            } else if primary_price == NumericRead::Malformed {
                ExtractionReason::MalformedNumericField { field: "price" }
            } else {
                ExtractionReason::PriceNotFound
            };
            let snapshot = snapshot::capture(document);
            warn!("[{}] no price on page ({}): {:?}", code, reason, snapshot);
            return Err(ExtractionFailure::new(reason).with_snapshot(snapshot));
        };

        let movement = self.read_movement(document, container, code);
        let prior_close = match movement.and_then(|mv| mv.prior_close(current)) {
            Some(prior) => prior,
            None => {
                warn!(
                    "[{}] could not resolve price move {:?}, treating as unchanged",
                    code, movement
                );
                current
            }
        };

        let volume = container
            .and_then(read_primary_volume)
            .or_else(|| {
                first_value(document, &VOLUME_CASCADE, |text| {
                    parse_digits(text).filter(|volume| *volume > 0)
                })
            })
            .unwrap_or(0);

        let name = read_primary_name(document)
            .or_else(|| read_fallback_name(document))
            .unwrap_or_else(|| code.default_name());

        let quote = Quote::new(code.clone(), name, current, prior_close, volume, retrieved_at);
        debug!(
            "[{}] extracted price={} prior={} change={} rate={}% trend={} volume={}",
            code,
            quote.current_price(),
            quote.prior_close_price(),
            quote.change(),
            quote.change_rate_percent(),
            quote.trend().as_str(),
            quote.volume()
        );
        Ok(quote)
    }

    /// Status and amount of today's move, structural first, then fallbacks.
    fn read_movement(
        &self,
        document: &Html,
        container: Option<ElementRef<'_>>,
        code: &InstrumentCode,
    ) -> Option<PriceMove> {
        let (status, magnitude) = container
            .map(|c| self.read_exday(c, code))
            .unwrap_or((None, None));

        if let (Some(status), Some(magnitude)) = (status, magnitude) {
            return Some(PriceMove::new(status, magnitude));
        }

        let (change_node, magnitude) = first_match(document, &CHANGE_CASCADE, |text| {
            parse_digits(text).filter(|amount| *amount > 0)
        })?;

        let status = status
            .or_else(|| direction_near(change_node))
            .or(if self.options.strict_status_label {
                None
            } else {
                Some(MoveStatus::Rose)
            })?;

        warn!("[{}] fallback move: {:?} {}", code, status, magnitude);
        Some(PriceMove::new(status, magnitude))
    }

    /// Read `[icon, status, amount]` from `p.no_exday`.
    fn read_exday(
        &self,
        container: ElementRef<'_>,
        code: &InstrumentCode,
    ) -> (Option<MoveStatus>, Option<u64>) {
        let Some(exday) = container.select(&EXDAY).next() else {
            warn!("[{}] no_exday block not found", code);
            return (None, None);
        };

        let spans: Vec<ElementRef<'_>> = exday.select(&SPAN).collect();
        if spans.len() < 3 {
            warn!("[{}] no_exday has {} spans, expected 3", code, spans.len());
            return (None, None);
        }

        let label = element_text(spans[1]);
        let status = match MoveStatus::from_label(&label) {
            Some(status) => Some(status),
            None if self.options.strict_status_label => {
                warn!("[{}] unrecognized status label {:?}", code, label);
                None
            }
            None => {
                warn!("[{}] unrecognized status label {:?}, reading as a rise", code, label);
                Some(MoveStatus::Rose)
            }
        };

        let amount = element_text(spans[2]);
        let magnitude = parse_digits(&amount);
        if magnitude.is_none() {
            warn!("[{}] malformed move amount {:?}", code, amount);
        }

        (status, magnitude)
    }
}

fn read_primary_price(container: ElementRef<'_>) -> NumericRead {
    container
        .select(&TODAY_PRICE)
        .next()
        .map(|element| NumericRead::from_text(&element_text(element)))
        .unwrap_or(NumericRead::Missing)
}

fn read_primary_volume(container: ElementRef<'_>) -> Option<u64> {
    container
        .select(&INFO_TABLE_BLIND)
        .nth(VOLUME_INDEX)
        .and_then(|element| parse_digits(&element_text(element)))
        .filter(|volume| *volume > 0)
}

fn read_primary_name(document: &Html) -> Option<String> {
    document
        .select(&TOTAL_INFO)
        .next()?
        .select(&TOTAL_INFO_HEADING)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
}

fn read_fallback_name(document: &Html) -> Option<String> {
    let title_index = NAME_CASCADE.len() - 1;
    NAME_CASCADE
        .iter()
        .enumerate()
        .find_map(|(index, selector)| {
            let text = document
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())?;
            if index == title_index {
                TITLE_NAME
                    .captures(&text)
                    .map(|caps| caps[1].trim().to_string())
                    .filter(|name| !name.is_empty())
            } else {
                Some(text)
            }
        })
}

/// Direction marker closest to the node that held the change amount.
///
/// Only markers inside the enclosing `.today` block (or `.no_exday`, or the
/// node's parent) count, so index rows elsewhere on the page cannot flip the
/// sign. Within that scope the first marker in document order wins.
fn direction_near(change_node: ElementRef<'_>) -> Option<MoveStatus> {
    let ancestors: Vec<ElementRef<'_>> =
        change_node.ancestors().filter_map(ElementRef::wrap).collect();
    let scope = ancestors
        .iter()
        .find(|element| TODAY_BLOCK.matches(element))
        .or_else(|| ancestors.iter().find(|element| EXDAY_BLOCK.matches(element)))
        .or_else(|| ancestors.first())
        .copied()?;

    scope.select(&ANY_ELEMENT).find_map(|element| {
        DIRECTION_CASCADE
            .iter()
            .find(|(selector, _)| selector.matches(&element))
            .map(|(_, status)| *status)
    })
}

/// First value accepted by `read` across `cascade`, trying selectors in order.
fn first_value<T>(
    document: &Html,
    cascade: &[Selector],
    read: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    first_match(document, cascade, read).map(|(_, value)| value)
}

/// Like [`first_value`], also returning the element the value came from.
fn first_match<'a, T>(
    document: &'a Html,
    cascade: &[Selector],
    read: impl Fn(&str) -> Option<T>,
) -> Option<(ElementRef<'a>, T)> {
    cascade.iter().find_map(|selector| {
        document.select(selector).find_map(|element| {
            let text = element_text(element);
            if text.is_empty() {
                return None;
            }
            read(&text).map(|value| (element, value))
        })
    })
}
