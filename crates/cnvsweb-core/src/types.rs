//! Core data types for the cnvsweb scraper
//!
//! Field names on the wire follow the JSON the site's catalog API has always
//! served (`type`, `imdb`, `poster`, `player_url`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CnvsError;

/// Title used when a card has no heading
pub const PLACEHOLDER_TITLE: &str = "Sem título";

/// Label fragments that mark a card as a series ("2 Temporadas", "1 Temp.")
const SEASON_MARKERS: [&str; 2] = ["temporada", "temp"];

/// Kind of a catalog entry, inferred from its duration/season label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Classifies a duration/season label
    ///
    /// The site never states the kind directly: series show a season count
    /// where movies show a running time.
    ///
    /// # Example
    /// ```
    /// use cnvsweb_core::ContentKind;
    /// assert_eq!(ContentKind::from_label("2 Temporadas"), ContentKind::Series);
    /// assert_eq!(ContentKind::from_label("1h 52min"), ContentKind::Movie);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if SEASON_MARKERS.iter().any(|marker| lower.contains(marker)) {
            ContentKind::Series
        } else {
            ContentKind::Movie
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog filter accepted by the most-watched listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Movie,
    Series,
}

impl KindFilter {
    /// Whether an item of `kind` passes this filter
    pub fn matches(&self, kind: ContentKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Movie => kind == ContentKind::Movie,
            KindFilter::Series => kind == ContentKind::Series,
        }
    }
}

impl FromStr for KindFilter {
    type Err = CnvsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "movie" => Ok(KindFilter::Movie),
            "series" => Ok(KindFilter::Series),
            other => Err(CnvsError::InvalidFilter(other.to_string())),
        }
    }
}

/// One card from the most-watched listing or from search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Numeric ID taken from the watch link, empty when the link has none
    pub id: String,

    /// Card title, [`PLACEHOLDER_TITLE`] when the card has no heading
    pub title: String,

    #[serde(rename = "type")]
    pub kind: ContentKind,

    /// First tag label: running time for movies, season count for series
    pub duration_or_seasons: String,

    /// Second tag label
    pub year: String,

    /// Third tag label (IMDb rating on the site)
    #[serde(rename = "imdb")]
    pub rating: String,

    #[serde(rename = "poster")]
    pub poster_url: String,

    /// Watch page link exactly as found on the card (may be site-relative)
    #[serde(rename = "player_url")]
    pub watch_page_url: String,
}

/// Movie/series counts for a batch of items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub movies: usize,
    pub series: usize,
}

impl Summary {
    pub fn of(items: &[CatalogItem]) -> Self {
        let series = items
            .iter()
            .filter(|item| item.kind == ContentKind::Series)
            .count();
        Self {
            total: items.len(),
            movies: items.len() - series,
            series,
        }
    }
}

/// Result of a most-watched catalog fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub count: usize,
    #[serde(rename = "type")]
    pub kind_filter: KindFilter,
}

impl CatalogPage {
    pub fn new(items: Vec<CatalogItem>, kind_filter: KindFilter) -> Self {
        Self {
            count: items.len(),
            items,
            kind_filter,
        }
    }

    pub fn empty(kind_filter: KindFilter) -> Self {
        Self::new(Vec::new(), kind_filter)
    }

    pub fn movies(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|i| i.kind == ContentKind::Movie)
    }

    pub fn series(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(|i| i.kind == ContentKind::Series)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.items)
    }
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    pub count: usize,
    pub query: String,
}

impl SearchPage {
    pub fn new(items: Vec<CatalogItem>, query: impl Into<String>) -> Self {
        Self {
            count: items.len(),
            items,
            query: query.into(),
        }
    }

    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(Vec::new(), query)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.items)
    }
}

/// Title, synopsis and poster of a single watch page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub title: String,
    #[serde(rename = "description")]
    pub synopsis: String,
    #[serde(rename = "poster")]
    pub poster_url: String,
    #[serde(rename = "player_url")]
    pub watch_page_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(kind: ContentKind) -> CatalogItem {
        CatalogItem {
            id: "1".to_string(),
            title: "Test".to_string(),
            kind,
            duration_or_seasons: String::new(),
            year: String::new(),
            rating: String::new(),
            poster_url: String::new(),
            watch_page_url: String::new(),
        }
    }

    #[test]
    fn test_kind_from_label() {
        assert_eq!(ContentKind::from_label("2 Temporadas"), ContentKind::Series);
        assert_eq!(ContentKind::from_label("1 TEMPORADA"), ContentKind::Series);
        assert_eq!(ContentKind::from_label("3 Temp."), ContentKind::Series);
        assert_eq!(ContentKind::from_label("2h 10min"), ContentKind::Movie);
        assert_eq!(ContentKind::from_label(""), ContentKind::Movie);
    }

    #[test]
    fn test_kind_filter_from_str() {
        assert_eq!("all".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!("Movie".parse::<KindFilter>().unwrap(), KindFilter::Movie);
        assert_eq!(" series ".parse::<KindFilter>().unwrap(), KindFilter::Series);
        match "anime".parse::<KindFilter>() {
            Err(CnvsError::InvalidFilter(value)) => assert_eq!(value, "anime"),
            _ => panic!("Expected InvalidFilter error"),
        }
    }

    #[test]
    fn test_kind_filter_matches() {
        assert!(KindFilter::All.matches(ContentKind::Movie));
        assert!(KindFilter::All.matches(ContentKind::Series));
        assert!(KindFilter::Movie.matches(ContentKind::Movie));
        assert!(!KindFilter::Movie.matches(ContentKind::Series));
        assert!(!KindFilter::Series.matches(ContentKind::Movie));
    }

    #[test]
    fn test_catalog_item_wire_names() {
        let json = serde_json::to_value(item(ContentKind::Series)).unwrap();
        assert_eq!(json["type"], "series");
        assert!(json.get("imdb").is_some());
        assert!(json.get("poster").is_some());
        assert!(json.get("player_url").is_some());
        assert!(json.get("duration_or_seasons").is_some());
    }

    #[test]
    fn test_catalog_page_summary() {
        let page = CatalogPage::new(
            vec![
                item(ContentKind::Movie),
                item(ContentKind::Series),
                item(ContentKind::Movie),
            ],
            KindFilter::All,
        );
        assert_eq!(page.count, 3);
        assert_eq!(
            page.summary(),
            Summary {
                total: 3,
                movies: 2,
                series: 1
            }
        );
        assert_eq!(page.movies().count(), 2);
        assert_eq!(page.series().count(), 1);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["type"], "all");
    }

    #[test]
    fn test_search_page_echoes_query() {
        let page = SearchPage::empty("batman");
        assert_eq!(page.count, 0);
        assert_eq!(page.query, "batman");
    }

    #[test]
    fn test_item_detail_wire_names() {
        let detail = ItemDetail {
            id: "42".to_string(),
            title: "Title".to_string(),
            synopsis: "Plot".to_string(),
            poster_url: "https://img/p.jpg".to_string(),
            watch_page_url: "https://cnvsweb.stream/watch/42".to_string(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["description"], "Plot");
        assert_eq!(json["player_url"], "https://cnvsweb.stream/watch/42");
    }

    proptest! {
        #[test]
        fn prop_series_iff_label_has_season_marker(
            prefix in "[0-9 ]{0,4}",
            marker in prop::sample::select(vec!["temporada", "Temporadas", "TEMP", "temp."]),
            suffix in "[a-z ]{0,6}",
        ) {
            let label = format!("{prefix}{marker}{suffix}");
            prop_assert_eq!(ContentKind::from_label(&label), ContentKind::Series);
        }

        #[test]
        fn prop_labels_without_marker_are_movies(label in "[a-z0-9 :.]{0,16}") {
            prop_assume!(!label.contains("temp"));
            prop_assert_eq!(ContentKind::from_label(&label), ContentKind::Movie);
        }
    }
}
