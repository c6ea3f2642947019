//! URL helper functions for cnvsweb
//!
//! Builds page URLs against a configurable base and pulls item IDs out of
//! watch links.

/// Production site
pub const DEFAULT_BASE_URL: &str = "https://cnvsweb.stream";

/// Builds the login page URL
///
/// # Example
/// ```
/// use cnvsweb_core::url::build_login_page_url;
/// assert_eq!(build_login_page_url("https://cnvsweb.stream"), "https://cnvsweb.stream/login");
/// ```
pub fn build_login_page_url(base: &str) -> String {
    format!("{}/login", base.trim_end_matches('/'))
}

/// Builds the AJAX login endpoint URL
pub fn build_login_endpoint_url(base: &str) -> String {
    format!("{}/ajax/login.php", base.trim_end_matches('/'))
}

/// Builds the search URL for a given query
///
/// # Example
/// ```
/// use cnvsweb_core::url::build_search_url;
/// let url = build_search_url("https://cnvsweb.stream", "dupla perigosa");
/// assert_eq!(url, "https://cnvsweb.stream/search?q=dupla%20perigosa");
/// ```
pub fn build_search_url(base: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    format!("{}/search?q={}", base.trim_end_matches('/'), encoded)
}

/// Builds the canonical watch page URL for an item ID
///
/// # Example
/// ```
/// use cnvsweb_core::url::build_watch_url;
/// assert_eq!(build_watch_url("https://cnvsweb.stream", "123"), "https://cnvsweb.stream/watch/123");
/// ```
pub fn build_watch_url(base: &str, id: &str) -> String {
    format!(
        "{}/watch/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// Turns a site-relative link into an absolute URL
///
/// Absolute `http(s)` URLs are returned unchanged, protocol-relative links
/// get `https:`, everything else is joined to `base`.
pub fn absolutize(base: &str, link: &str) -> String {
    let link = link.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    if let Some(rest) = link.strip_prefix("//") {
        return format!("https://{}", rest);
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

/// Extracts the numeric item ID from a watch link
///
/// The ID is the last path segment, allowing one trailing slash. Links whose
/// last segment is not purely numeric have no ID.
///
/// # Example
/// ```
/// use cnvsweb_core::url::extract_item_id;
/// assert_eq!(extract_item_id("/watch/12345/"), Some("12345".to_string()));
/// assert_eq!(extract_item_id("/watch/dupla-perigosa"), None);
/// ```
pub fn extract_item_id(link: &str) -> Option<String> {
    let path = link.strip_suffix('/').unwrap_or(link);
    let (_, segment) = path.rsplit_once('/')?;

    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        return Some(segment.to_string());
    }

    None
}
