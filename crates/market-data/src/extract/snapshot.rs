use scraper::Html;

use super::selectors::{BLIND, BODY, SNAPSHOT_SELECTORS, TITLE};
use super::text::element_text;
use crate::errors::PageSnapshot;

const MAX_BLIND_TEXTS: usize = 10;

/// Describe a page that did not yield a price.
pub(crate) fn capture(document: &Html) -> PageSnapshot {
    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let containers = SNAPSHOT_SELECTORS
        .iter()
        .map(|(name, selector)| (*name, document.select(selector).next().is_some()))
        .collect();

    let blind_texts = document
        .select(&BLIND)
        .take(MAX_BLIND_TEXTS)
        .map(element_text)
        .collect();

    let error_page_suspected = document
        .select(&BODY)
        .next()
        .map(|body| {
            let text = body.text().collect::<String>();
            text.contains("오류") || text.contains("error") || text.contains("Error")
        })
        .unwrap_or(false);

    PageSnapshot {
        title,
        containers,
        blind_texts,
        error_page_suspected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_page() {
        let html = Html::parse_document(
            "<html><head><title>네이버 증권</title></head>\
             <body><p>일시적인 오류가 발생했습니다</p><span class=\"blind\">x</span></body></html>",
        );
        let snapshot = capture(&html);
        assert_eq!(snapshot.title.as_deref(), Some("네이버 증권"));
        assert!(snapshot.error_page_suspected);
        assert_eq!(snapshot.blind_texts, vec!["x".to_string()]);
        assert!(snapshot.containers.iter().all(|(_, present)| !present));
    }
}
