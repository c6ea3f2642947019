//! cnvsweb Scraper Core Library
//!
//! Provides an async API for browsing the cnvsweb.stream catalog and turning
//! watch pages into direct, playable media URLs.
//!
//! # Overview
//!
//! The site has no API. This crate provides:
//! - An authenticated HTTP session (token login handshake, cookies, keep-alive)
//! - HTML parsers for the most-watched listing, search results and watch pages
//! - A prioritized media URL resolver that tolerates several player encodings
//!
//! # Example
//!
//! ```no_run
//! use cnvsweb_core::{CnvsScraper, KindFilter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = CnvsScraper::new()?;
//!     scraper.try_login("MY-TOKEN").await?;
//!
//!     let catalog = scraper.fetch_catalog(20, KindFilter::Movie).await;
//!     for item in &catalog.items {
//!         println!("{} ({})", item.title, item.year);
//!     }
//!
//!     if let Some(item) = catalog.items.first() {
//!         if let Some(url) = scraper.resolve(&item.watch_page_url).await {
//!             println!("Play: {}", url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Keeping the session alive
//!
//! Every operation refreshes an idle session before running. Long-lived
//! embedders should also run [`spawn_keep_alive`] so the session survives
//! quiet periods:
//!
//! ```no_run
//! # async fn example() -> cnvsweb_core::Result<()> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cnvsweb_core::{CnvsScraper, spawn_keep_alive};
//!
//! let scraper = Arc::new(CnvsScraper::new()?);
//! scraper.login("MY-TOKEN").await;
//! let keeper = spawn_keep_alive(Arc::clone(&scraper), Duration::from_secs(180));
//! // ...
//! keeper.abort();
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
mod liveness;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, CnvsClient, FetchedPage, RateLimiter};

// Re-export error types
pub use error::{CnvsError, Result};

// Re-export keep-alive task
pub use liveness::spawn_keep_alive;

// Re-export parser functions
pub use parser::{parse_item_detail, parse_media_url, parse_most_watched, parse_search_results};

// Re-export main scraper API
pub use scraper::{CnvsScraper, DEFAULT_CATALOG_LIMIT, DEFAULT_SEARCH_LIMIT};

// Re-export data types
pub use types::{
    CatalogItem, CatalogPage, ContentKind, ItemDetail, KindFilter, PLACEHOLDER_TITLE, SearchPage,
    Summary,
};

// Re-export URL helper functions for convenience
pub use url::{build_search_url, build_watch_url, extract_item_id};
