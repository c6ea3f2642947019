//! HTML parsers for cnvsweb
//!
//! Contains modules for parsing different page types. All parsers are pure
//! functions of the page text.

mod card;
pub mod catalog;
pub mod detail;
pub mod media_url;
pub mod search;

pub use catalog::parse_most_watched;
pub use detail::parse_item_detail;
pub use media_url::parse_media_url;
pub use search::parse_search_results;
