//! Search results parser for cnvsweb
//!
//! Parses HTML from the `/search` page. Results use the same card markup as
//! the landing page, always as `div.item`.

use scraper::Html;
use tracing::debug;

use crate::error::Result;
use crate::parser::card::{CardSelectors, parse_card, selector};
use crate::types::CatalogItem;

/// Parses search results HTML and returns up to `limit` items
///
/// `limit` caps the number of cards looked at. Cards that fail to parse are
/// skipped. There is no kind filter here; callers filter themselves.
///
/// # Errors
/// Returns `ParseError` only if a built-in selector fails to parse
pub fn parse_search_results(html: &str, limit: usize) -> Result<Vec<CatalogItem>> {
    let document = Html::parse_document(html);
    let item_sel = selector("div.item")?;
    let sel = CardSelectors::new()?;

    let cards: Vec<_> = document.select(&item_sel).collect();
    debug!(candidates = cards.len(), "search result cards found");

    Ok(cards
        .iter()
        .take(limit)
        .filter_map(|card| parse_card(card, &sel))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentKind;

    #[test]
    fn test_parse_empty_html() {
        let html = "<html><body></body></html>";
        let results = parse_search_results(html, 20).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_search_results_single() {
        let html = r#"
        <html>
        <body>
        <div class="results">
            <div class="item">
                <div class="poster"><img src="https://img.cnvs/batman.jpg"></div>
                <div class="info">
                    <h6>Batman</h6>
                    <p class="tags"><span>2h 56min</span><span>2022</span><span>7.8</span></p>
                    <a href="https://cnvsweb.stream/watch/4321">Assistir</a>
                </div>
            </div>
        </div>
        </body>
        </html>
        "#;

        let results = parse_search_results(html, 20).unwrap();
        assert_eq!(results.len(), 1);

        let item = &results[0];
        assert_eq!(item.title, "Batman");
        assert_eq!(item.id, "4321");
        assert_eq!(item.kind, ContentKind::Movie);
        assert_eq!(item.duration_or_seasons, "2h 56min");
        assert_eq!(item.year, "2022");
        assert_eq!(item.rating, "7.8");
        assert_eq!(item.poster_url, "https://img.cnvs/batman.jpg");
    }

    #[test]
    fn test_series_are_not_filtered_out() {
        let html = r#"
        <div class="item"><div class="info"><h6>Movie</h6><p class="tags"><span>1h</span></p></div></div>
        <div class="item"><div class="info"><h6>Show</h6><p class="tags"><span>4 Temporadas</span></p></div></div>
        "#;

        let results = parse_search_results(html, 20).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, ContentKind::Movie);
        assert_eq!(results[1].kind, ContentKind::Series);
    }

    #[test]
    fn test_swiper_slides_are_not_results() {
        let html = r#"
        <div class="swiper-slide"><div class="info"><h6>Slide</h6></div></div>
        "#;

        let results = parse_search_results(html, 20).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_limit_caps_candidates() {
        let html = r#"
        <div class="item"><div class="info"><h6>One</h6></div></div>
        <div class="item"><p>broken</p></div>
        <div class="item"><div class="info"><h6>Three</h6></div></div>
        "#;

        // the broken card uses up one slot of the limit
        let results = parse_search_results(html, 2).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "One");

        let results = parse_search_results(html, 20).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_zero_limit() {
        let html = r#"<div class="item"><div class="info"><h6>One</h6></div></div>"#;
        assert!(parse_search_results(html, 0).unwrap().is_empty());
    }
}
