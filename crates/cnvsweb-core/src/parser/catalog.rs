//! Most-watched catalog parser for cnvsweb
//!
//! The landing page has several carousels. The one we want sits in the
//! `div.col-12` that contains an `h5` reading "Mais Visto".

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::Result;
use crate::parser::card::{CardSelectors, element_text, parse_card, selector};
use crate::types::{CatalogItem, KindFilter};

const SECTION_HEADING: &str = "mais visto";
const SECTION_CONTAINER_CLASS: &str = "col-12";

/// Card markup conventions, in the order they are tried
///
/// The first convention that yields any node wins; results are never merged.
const CARD_CONVENTIONS: [&str; 2] = ["div.swiper-slide", "div.item"];

/// Parses the landing page and returns the most-watched items
///
/// `limit` caps the number of cards looked at, before the kind filter is
/// applied, so a filtered result can be shorter than `limit`. Cards without
/// an info block are skipped. A page without the section yields an empty
/// vector.
///
/// # Errors
/// Returns `ParseError` only if a built-in selector fails to parse
pub fn parse_most_watched(html: &str, limit: usize, filter: KindFilter) -> Result<Vec<CatalogItem>> {
    let document = Html::parse_document(html);

    let Some(container) = find_section(&document)? else {
        debug!("most-watched section not found");
        return Ok(Vec::new());
    };

    let cards = find_cards(&container)?;
    debug!(candidates = cards.len(), "most-watched cards found");

    let sel = CardSelectors::new()?;
    let items = cards
        .iter()
        .take(limit)
        .filter_map(|card| parse_card(card, &sel))
        .filter(|item| filter.matches(item.kind))
        .collect();

    Ok(items)
}

/// Locates the container of the most-watched carousel
fn find_section(document: &Html) -> Result<Option<ElementRef<'_>>> {
    let heading_sel = selector("h5")?;

    let Some(heading) = document
        .select(&heading_sel)
        .find(|h5| element_text(h5).to_lowercase().contains(SECTION_HEADING))
    else {
        return Ok(None);
    };

    Ok(heading.ancestors().filter_map(ElementRef::wrap).find(|el| {
        el.value().name() == "div"
            && el.value().classes().any(|c| c == SECTION_CONTAINER_CLASS)
    }))
}

/// Collects card nodes using the first convention that matches anything
fn find_cards<'a>(container: &ElementRef<'a>) -> Result<Vec<ElementRef<'a>>> {
    for convention in CARD_CONVENTIONS {
        let sel = selector(convention)?;
        let cards: Vec<ElementRef<'a>> = container.select(&sel).collect();
        if !cards.is_empty() {
            return Ok(cards);
        }
    }

    Ok(Vec::new())
}
