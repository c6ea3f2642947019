//! Main scraper API for cnvsweb
//!
//! Combines the HTTP session with the parsers. Every operation comes in two
//! flavours:
//!
//! - `try_*` returns a [`Result`] and says why nothing came back
//!   (transport error, missing media, rejected login, bad input).
//! - the plain name never fails: errors are logged and collapse into
//!   `false`, an empty page or `None`.

use tracing::{debug, warn};

use crate::auth;
use crate::client::{ClientConfig, CnvsClient};
use crate::error::{CnvsError, Result};
use crate::parser::{parse_item_detail, parse_media_url, parse_most_watched, parse_search_results};
use crate::types::{CatalogPage, ItemDetail, KindFilter, SearchPage};
use crate::url::{absolutize, build_search_url, build_watch_url};

/// Default number of most-watched cards looked at
pub const DEFAULT_CATALOG_LIMIT: usize = 50;

/// Default number of search result cards looked at
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Main scraper API for cnvsweb
///
/// Owns one authenticated session. Share it between tasks with an `Arc`;
/// several instances (for different tokens) can live side by side.
pub struct CnvsScraper {
    client: CnvsClient,
}

impl CnvsScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = CnvsClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or HTTP client
    /// initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = CnvsClient::with_config(config)?;
        Ok(Self { client })
    }

    /// The underlying HTTP session
    pub fn client(&self) -> &CnvsClient {
        &self.client
    }

    /// Whether login succeeded on this session
    pub async fn is_authenticated(&self) -> bool {
        self.client.is_authenticated().await
    }

    /// Refresh the server-side session if it has been idle too long
    pub async fn ensure_alive(&self) {
        self.client.ensure_alive().await;
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    /// Log in with an access token
    ///
    /// # Errors
    /// - `HttpError` if any request of the handshake fails
    /// - `LoginRejected` if the site does not accept the token
    pub async fn try_login(&self, token: &str) -> Result<()> {
        auth::login(&self.client, token).await
    }

    /// Log in with an access token, reporting only success
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> cnvsweb_core::Result<()> {
    /// use cnvsweb_core::CnvsScraper;
    /// let scraper = CnvsScraper::new()?;
    /// if !scraper.login("MY-TOKEN").await {
    ///     eprintln!("login failed");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, token: &str) -> bool {
        match self.try_login(token).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "login failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Fetch the most-watched listing from the landing page
    ///
    /// `limit` caps the cards looked at before `filter` applies, so the
    /// page can hold fewer than `limit` items.
    ///
    /// # Errors
    /// - `HttpError` / `RateLimited` / `NotFound` if the landing page fails
    pub async fn try_fetch_catalog(&self, limit: usize, filter: KindFilter) -> Result<CatalogPage> {
        self.client.ensure_alive().await;

        let html = self.client.fetch("/").await?;
        let items = parse_most_watched(&html, limit, filter)?;

        Ok(CatalogPage::new(items, filter))
    }

    /// Fetch the most-watched listing, empty on any failure
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> cnvsweb_core::Result<()> {
    /// use cnvsweb_core::{CnvsScraper, KindFilter};
    /// let scraper = CnvsScraper::new()?;
    /// scraper.login("MY-TOKEN").await;
    /// let page = scraper.fetch_catalog(50, KindFilter::Series).await;
    /// for item in &page.items {
    ///     println!("{} ({})", item.title, item.duration_or_seasons);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_catalog(&self, limit: usize, filter: KindFilter) -> CatalogPage {
        match self.try_fetch_catalog(limit, filter).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "catalog fetch failed");
                CatalogPage::empty(filter)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Search the site
    ///
    /// Unlike the catalog there is no kind filter; filter the items yourself.
    /// The query is sent and echoed exactly as given.
    ///
    /// # Errors
    /// - `InvalidId` if query is empty or whitespace only
    /// - `HttpError` / `RateLimited` / `NotFound` if the search page fails
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<SearchPage> {
        if query.trim().is_empty() {
            return Err(CnvsError::InvalidId(
                "Search query cannot be empty".to_string(),
            ));
        }

        self.client.ensure_alive().await;

        let html = self
            .client
            .fetch(&build_search_url(self.client.base_url(), query))
            .await?;
        let items = parse_search_results(&html, limit)?;

        Ok(SearchPage::new(items, query))
    }

    /// Search the site, empty on any failure
    pub async fn search(&self, query: &str, limit: usize) -> SearchPage {
        match self.try_search(query, limit).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, query, "search failed");
                SearchPage::empty(query)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Media URL
    // -----------------------------------------------------------------------

    /// Resolve a watch page into a direct media URL
    ///
    /// Site-relative watch links are accepted. Relative media references
    /// are made absolute against the site root.
    ///
    /// # Errors
    /// - `InvalidUrl` if `watch_page_url` is empty
    /// - `HttpError` / `RateLimited` / `NotFound` if the page fails to load
    /// - `NotFound` if the page loads but has no media reference
    pub async fn try_resolve(&self, watch_page_url: &str) -> Result<String> {
        if watch_page_url.trim().is_empty() {
            return Err(CnvsError::InvalidUrl(
                "Watch page URL cannot be empty".to_string(),
            ));
        }

        self.client.ensure_alive().await;

        let html = self.client.fetch(watch_page_url).await?;
        let media_url = parse_media_url(&html)?;

        Ok(absolutize(self.client.base_url(), &media_url))
    }

    /// Resolve a watch page into a direct media URL, `None` on any failure
    ///
    /// "Page unreachable" and "no media on the page" both give `None`; use
    /// [`try_resolve`](Self::try_resolve) to tell them apart.
    pub async fn resolve(&self, watch_page_url: &str) -> Option<String> {
        match self.try_resolve(watch_page_url).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, url = watch_page_url, "media url not resolved");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Detail
    // -----------------------------------------------------------------------

    /// Fetch title, synopsis and poster for an item ID
    ///
    /// Whatever page the server answers with is parsed, error statuses
    /// included; elements it lacks leave their fields empty.
    ///
    /// # Errors
    /// - `InvalidId` if `id` is empty or whitespace only
    /// - `HttpError` if the request itself fails (connection, timeout)
    pub async fn try_fetch_detail(&self, id: &str) -> Result<ItemDetail> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CnvsError::InvalidId("Item ID cannot be empty".to_string()));
        }

        self.client.ensure_alive().await;

        let url = build_watch_url(self.client.base_url(), id);
        let page = self.client.fetch_page_any_status(&url).await?;
        if !page.status.is_success() {
            debug!(status = %page.status, id, "detail page answered with error status");
        }

        parse_item_detail(&page.body, id, &url)
    }

    /// Fetch item details, `None` on any failure
    pub async fn fetch_detail(&self, id: &str) -> Option<ItemDetail> {
        match self.try_fetch_detail(id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!(error = %e, id, "detail fetch failed");
                None
            }
        }
    }
}
