//! Catalog card parsing shared by the most-watched and search parsers
//!
//! Both pages render items with the same card markup:
//!
//! ```html
//! <div class="item">
//!   <div class="poster"><img src="..."></div>
//!   <div class="info">
//!     <h6>Title</h6>
//!     <p class="tags"><span>2h 10min</span><span>2023</span><span>7.5</span></p>
//!     <a href="/watch/123">Assistir</a>
//!   </div>
//! </div>
//! ```

use scraper::{ElementRef, Selector};

use crate::error::{CnvsError, Result};
use crate::types::{CatalogItem, ContentKind, PLACEHOLDER_TITLE};
use crate::url::extract_item_id;

/// Pre-parsed selectors for card fields
pub(crate) struct CardSelectors {
    info: Selector,
    title: Selector,
    link: Selector,
    tags: Selector,
    span: Selector,
    poster: Selector,
    img: Selector,
}

impl CardSelectors {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            info: selector("div.info")?,
            title: selector("h6")?,
            link: selector("a[href]")?,
            tags: selector("p.tags")?,
            span: selector("span")?,
            poster: selector("div.poster")?,
            img: selector("img")?,
        })
    }
}

/// Parses a CSS selector, mapping failures to `ParseError`
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CnvsError::ParseError(format!("Invalid selector {:?}: {:?}", css, e)))
}

/// Collapses an element's text to a trimmed string
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses one card
///
/// Returns `None` when the card has no `div.info`; every other missing piece
/// falls back to an empty field (or the placeholder title).
pub(crate) fn parse_card(card: &ElementRef, sel: &CardSelectors) -> Option<CatalogItem> {
    let info = card.select(&sel.info).next()?;

    let title = info
        .select(&sel.title)
        .next()
        .map(|h6| element_text(&h6))
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());

    let watch_page_url = info
        .select(&sel.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    let id = extract_item_id(&watch_page_url).unwrap_or_default();

    let [duration_or_seasons, year, rating] = tag_labels(&info, sel);

    let poster_url = card
        .select(&sel.poster)
        .next()
        .and_then(|poster| poster.select(&sel.img).next())
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    Some(CatalogItem {
        id,
        title,
        kind: ContentKind::from_label(&duration_or_seasons),
        duration_or_seasons,
        year,
        rating,
        poster_url,
        watch_page_url,
    })
}

/// Reads the first three `p.tags` spans in order, empty when missing
fn tag_labels(info: &ElementRef, sel: &CardSelectors) -> [String; 3] {
    let mut labels: [String; 3] = Default::default();

    if let Some(tags) = info.select(&sel.tags).next() {
        for (slot, span) in labels.iter_mut().zip(tags.select(&sel.span)) {
            *slot = element_text(&span);
        }
    }

    labels
}
