use scraper::ElementRef;

use crate::models::MAX_PRICE;

/// Result of reading a numeric node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NumericRead {
    /// No node was located.
    Missing,
    /// A node was located but its text did not reduce to a number.
    Malformed,
    Value(u64),
}

impl NumericRead {
    pub(crate) fn from_text(text: &str) -> Self {
        match parse_digits(text) {
            Some(value) => Self::Value(value),
            None => Self::Malformed,
        }
    }
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Keep only ASCII digits and parse them, so `71,500원` reads as `71500`.
///
/// Returns `None` when no digit remains or the value exceeds [`MAX_PRICE`].
pub(crate) fn parse_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().filter(|value| *value <= MAX_PRICE)
}
