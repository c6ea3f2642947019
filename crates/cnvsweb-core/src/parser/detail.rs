//! Watch page detail parser

use scraper::Html;

use crate::error::Result;
use crate::parser::card::{element_text, selector};
use crate::types::ItemDetail;

/// Extracts title (`h1`), synopsis (`div.description`) and poster
/// (`img.poster`) from a watch page
///
/// Missing elements leave the corresponding field empty.
///
/// # Errors
/// Returns `ParseError` only if a built-in selector fails to parse
pub fn parse_item_detail(html: &str, id: &str, watch_page_url: &str) -> Result<ItemDetail> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("h1")?)
        .next()
        .map(|h1| element_text(&h1))
        .unwrap_or_default();

    let synopsis = document
        .select(&selector("div.description")?)
        .next()
        .map(|div| element_text(&div))
        .unwrap_or_default();

    let poster_url = document
        .select(&selector("img.poster")?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    Ok(ItemDetail {
        id: id.to_string(),
        title,
        synopsis,
        poster_url,
        watch_page_url: watch_page_url.to_string(),
    })
}
