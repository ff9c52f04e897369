//! CSS selectors for the Naver Finance item page.
//!
//! Primary selectors describe the `div.rate_info` block. Fallback cascades are
//! ordered lists tried first to last; the first selector yielding a usable
//! value wins.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

use super::movement::MoveStatus;

fn parse(selector: &str) -> Selector {
    Selector::parse(selector).expect("Invalid CSS selector")
}

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors.iter().map(|s| parse(s)).collect()
}

/// Price selectors tried when the rate_info block yields nothing.
const PRICE_FALLBACKS: &[&str] = &[
    ".today .blind",
    ".no_today .blind",
    "#_nowVal",
    ".no_today",
    ".today",
    ".rate_info .blind",
    ".new_totalinfo .blind",
];

const CHANGE_FALLBACKS: &[&str] = &[".no_exday .blind", ".change .blind"];

const VOLUME_FALLBACKS: &[&str] = &[
    ".trading_volume .blind",
    "#_volume",
    ".trading_volume",
    ".volume .blind",
];

/// `title` must stay last: it is read through [`TITLE_NAME`].
const NAME_FALLBACKS: &[&str] = &[
    ".wrap_company h2",
    ".h_company h2 a",
    ".company_info h2",
    ".wrap_company h2 a",
    "h2.h_company",
    "title",
];

/// Direction markers looked up near the change amount.
const DIRECTION_MARKERS: &[(&str, MoveStatus)] = &[
    ("em.no_down", MoveStatus::Fell),
    ("em.no_up", MoveStatus::Rose),
    ("em.no_steady", MoveStatus::Unchanged),
    (".ico.down", MoveStatus::Fell),
    (".ico.up", MoveStatus::Rose),
    (".ico.same", MoveStatus::Unchanged),
];

/// Containers reported in failure snapshots.
pub(crate) const SNAPSHOT_CONTAINERS: &[&str] = &[
    ".wrap_company",
    ".rate_info",
    ".new_totalinfo",
    ".today",
    ".no_today",
    ".stock_info",
    ".tab_con1",
];

lazy_static! {
    pub(crate) static ref RATE_INFO: Selector = parse("div.rate_info");
    pub(crate) static ref TODAY_PRICE: Selector = parse("div > p.no_today .blind");
    pub(crate) static ref EXDAY: Selector = parse("div > p.no_exday");
    pub(crate) static ref SPAN: Selector = parse("span");
    pub(crate) static ref INFO_TABLE_BLIND: Selector = parse("table.no_info span.blind");
    pub(crate) static ref TOTAL_INFO: Selector = parse("div.new_totalinfo");
    pub(crate) static ref TOTAL_INFO_HEADING: Selector = parse("div > div > h2");
    pub(crate) static ref TITLE: Selector = parse("title");
    pub(crate) static ref BODY: Selector = parse("body");
    pub(crate) static ref BLIND: Selector = parse(".blind");
    pub(crate) static ref TODAY_BLOCK: Selector = parse(".today");
    pub(crate) static ref EXDAY_BLOCK: Selector = parse(".no_exday");
    pub(crate) static ref ANY_ELEMENT: Selector = parse("*");

    pub(crate) static ref PRICE_CASCADE: Vec<Selector> = parse_all(PRICE_FALLBACKS);
    pub(crate) static ref CHANGE_CASCADE: Vec<Selector> = parse_all(CHANGE_FALLBACKS);
    pub(crate) static ref VOLUME_CASCADE: Vec<Selector> = parse_all(VOLUME_FALLBACKS);
    pub(crate) static ref NAME_CASCADE: Vec<Selector> = parse_all(NAME_FALLBACKS);

    pub(crate) static ref DIRECTION_CASCADE: Vec<(Selector, MoveStatus)> = DIRECTION_MARKERS
        .iter()
        .map(|(selector, status)| (parse(selector), *status))
        .collect();

    pub(crate) static ref SNAPSHOT_SELECTORS: Vec<(&'static str, Selector)> = SNAPSHOT_CONTAINERS
        .iter()
        .map(|selector| (*selector, parse(selector)))
        .collect();

    /// Page titles look like `삼성전자 : 네이버 증권`.
    pub(crate) static ref TITLE_NAME: Regex =
        Regex::new(r"^([^:]+)").expect("Invalid regex pattern");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_parse() {
        // Forces every lazy static; a bad selector panics here instead of at runtime.
        assert_eq!(PRICE_CASCADE.len(), PRICE_FALLBACKS.len());
        assert_eq!(CHANGE_CASCADE.len(), CHANGE_FALLBACKS.len());
        assert_eq!(VOLUME_CASCADE.len(), VOLUME_FALLBACKS.len());
        assert_eq!(NAME_CASCADE.len(), NAME_FALLBACKS.len());
        assert_eq!(DIRECTION_CASCADE.len(), DIRECTION_MARKERS.len());
        assert_eq!(SNAPSHOT_SELECTORS.len(), SNAPSHOT_CONTAINERS.len());
        let _ = (&*RATE_INFO, &*TODAY_PRICE, &*EXDAY, &*SPAN, &*INFO_TABLE_BLIND);
        let _ = (&*TOTAL_INFO, &*TOTAL_INFO_HEADING, &*TITLE, &*BODY, &*BLIND);
        let _ = (&*TODAY_BLOCK, &*EXDAY_BLOCK, &*ANY_ELEMENT);
    }

    #[test]
    fn test_title_name_pattern() {
        let caps = TITLE_NAME.captures("삼성전자 : 네이버 증권").unwrap();
        assert_eq!(caps[1].trim(), "삼성전자");
    }
}
