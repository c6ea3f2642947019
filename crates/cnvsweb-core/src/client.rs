//! HTTP session for cnvsweb
//!
//! Wraps a cookie-carrying `reqwest::Client` together with the shared
//! session state (authenticated flag and last-activity time) and a rate
//! limiter that spaces requests to the site.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{CnvsError, Result};
use crate::url::{DEFAULT_BASE_URL, absolutize};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";
const MAX_REDIRECTS: usize = 5;

/// Configuration for the HTTP session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root (default: `https://cnvsweb.stream`)
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Timeout for keep-alive pings in seconds (default: 5)
    pub keep_alive_timeout_secs: u64,
    /// Idle time after which the session is refreshed (default: 180)
    pub idle_threshold_secs: u64,
    /// Maximum requests per second (default: 4.0)
    pub requests_per_second: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            keep_alive_timeout_secs: 5,
            idle_threshold_secs: 180,
            requests_per_second: 4.0,
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// Non-positive rates disable spacing.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Acquire permission to make a request
    ///
    /// Sleeps until `min_interval` has passed since the previous request.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Mutable part of the session, shared by every operation
#[derive(Debug)]
struct SessionState {
    authenticated: bool,
    last_activity: Instant,
}

/// A fetched page after following same-site redirects
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL of the last hop
    pub url: String,
    /// Status of the last hop
    pub status: StatusCode,
    /// Response body of the last hop
    pub body: String,
}

/// HTTP session for cnvsweb
///
/// Holds the cookie jar (inside the `reqwest::Client`), default browser
/// headers and the session state. All state changes go through one mutex,
/// so a `CnvsClient` can be shared between tasks behind an `Arc`.
pub struct CnvsClient {
    client: reqwest::Client,
    base_url: String,
    keep_alive_timeout: Duration,
    idle_threshold: Duration,
    rate_limiter: RateLimiter,
    state: Mutex<SessionState>,
}

impl CnvsClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CnvsError::InvalidUrl(config.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&format!("{}/", base_url))
                .map_err(|_| CnvsError::InvalidUrl(base_url.clone()))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .default_headers(headers)
            .build()
            .map_err(CnvsError::HttpError)?;

        Ok(Self {
            client,
            base_url,
            keep_alive_timeout: Duration::from_secs(config.keep_alive_timeout_secs),
            idle_threshold: Duration::from_secs(config.idle_threshold_secs),
            rate_limiter: RateLimiter::new(config.requests_per_second),
            state: Mutex::new(SessionState {
                authenticated: false,
                last_activity: Instant::now(),
            }),
        })
    }

    /// Site root without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch HTML from a path or URL on the site
    ///
    /// Site-relative links are resolved against the base URL. Redirects are
    /// followed; the body of the last hop is returned.
    ///
    /// # Errors
    /// - `HttpError` - network errors and 5xx responses
    /// - `RateLimited` - server returned 429
    /// - `NotFound` - server returned 404
    pub async fn fetch(&self, path_or_url: &str) -> Result<String> {
        let url = absolutize(&self.base_url, path_or_url);
        let page = self.fetch_page(&url).await?;

        if page.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CnvsError::RateLimited);
        }
        if page.status == StatusCode::NOT_FOUND {
            return Err(CnvsError::NotFound(page.url));
        }

        Ok(page.body)
    }

    /// Perform a GET with manual redirect following
    ///
    /// Returns the final URL and status alongside the body. Only server
    /// errors are turned into `Err`; other statuses are left to the caller.
    /// A completed request counts as session activity.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        self.get_following_redirects(url, true).await
    }

    /// Like [`fetch_page`](Self::fetch_page), but server errors come back as
    /// a page too; only transport failures are `Err`
    pub(crate) async fn fetch_page_any_status(&self, url: &str) -> Result<FetchedPage> {
        self.get_following_redirects(url, false).await
    }

    /// Single GET whose response is discarded; only transport failures count
    ///
    /// Used to pick up cookies from pages that may answer with an error
    /// status (anti-bot challenges).
    pub(crate) async fn prime_cookies(&self, url: &str) -> Result<()> {
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CnvsError::HttpError)?;

        self.touch().await;
        debug!(url, status = %response.status(), "cookie page fetched");
        Ok(())
    }

    async fn get_following_redirects(
        &self,
        url: &str,
        reject_server_errors: bool,
    ) -> Result<FetchedPage> {
        let mut current_url = url.to_string();

        for _ in 0..MAX_REDIRECTS {
            self.rate_limiter.acquire().await;

            let response = self
                .client
                .get(&current_url)
                .send()
                .await
                .map_err(CnvsError::HttpError)?;

            self.touch().await;

            let status = response.status();

            if reject_server_errors
                && status.is_server_error()
                && let Err(e) = response.error_for_status_ref()
            {
                return Err(CnvsError::HttpError(e));
            }

            if status.is_redirection()
                && let Some(location) = response.headers().get(header::LOCATION)
                && let Ok(loc_str) = location.to_str()
            {
                current_url = join_location(&current_url, loc_str)?;
                debug!(url = %current_url, "following redirect");
                continue;
            }

            let body = response.text().await.map_err(CnvsError::HttpError)?;
            return Ok(FetchedPage {
                url: current_url,
                status,
                body,
            });
        }

        Err(CnvsError::ParseError("Too many redirects".to_string()))
    }

    /// Lightweight GET to the site root with the short keep-alive timeout
    pub(crate) async fn ping(&self) -> Result<()> {
        self.rate_limiter.acquire().await;

        self.client
            .get(format!("{}/", self.base_url))
            .timeout(self.keep_alive_timeout)
            .send()
            .await
            .map_err(CnvsError::HttpError)?;

        Ok(())
    }

    /// Wait for the rate limiter before a request issued outside `fetch`
    pub(crate) async fn pace(&self) {
        self.rate_limiter.acquire().await;
    }

    /// Whether the login handshake has succeeded on this session
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.authenticated
    }

    pub(crate) async fn mark_authenticated(&self) {
        let mut state = self.state.lock().await;
        state.authenticated = true;
        state.last_activity = Instant::now();
    }

    /// Record session activity now
    pub async fn touch(&self) {
        self.set_last_activity(Instant::now()).await;
    }

    /// Overwrite the last-activity time
    ///
    /// Used to simulate an idle session.
    #[doc(hidden)]
    pub async fn set_last_activity(&self, at: Instant) {
        self.state.lock().await.last_activity = at;
    }

    /// Time since the last recorded activity
    pub async fn idle_for(&self) -> Duration {
        self.state.lock().await.last_activity.elapsed()
    }

    /// Decide whether a keep-alive ping is due, and claim it if so
    ///
    /// Check and update happen under one lock: of many concurrent callers in
    /// the same idle window exactly one gets `true`. Last-activity is reset
    /// before the ping is sent, so a failed ping still counts as activity.
    pub(crate) async fn claim_keep_alive(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.authenticated || state.last_activity.elapsed() <= self.idle_threshold {
            return false;
        }
        state.last_activity = Instant::now();
        true
    }
}

/// Resolves a `Location` header against the URL that returned it
fn join_location(current: &str, location: &str) -> Result<String> {
    let base = reqwest::Url::parse(current).map_err(|_| CnvsError::InvalidUrl(current.to_string()))?;
    base.join(location)
        .map(String::from)
        .map_err(|_| CnvsError::InvalidUrl(location.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_disabled() {
        let limiter = RateLimiter::new(0.0);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://cnvsweb.stream");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.keep_alive_timeout_secs, 5);
        assert_eq!(config.idle_threshold_secs, 180);
        assert_eq!(config.requests_per_second, 4.0);
    }

    #[test]
    fn test_client_creation() {
        let client = CnvsClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = ClientConfig {
            base_url: "cnvsweb.stream".to_string(),
            ..ClientConfig::default()
        };
        match CnvsClient::with_config(config) {
            Err(CnvsError::InvalidUrl(url)) => assert_eq!(url, "cnvsweb.stream"),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig {
            base_url: "https://cnvsweb.stream/".to_string(),
            ..ClientConfig::default()
        };
        let client = CnvsClient::with_config(config).unwrap();
        assert_eq!(client.base_url(), "https://cnvsweb.stream");
    }

    #[test]
    fn test_join_location() {
        assert_eq!(
            join_location("https://cnvsweb.stream/login", "/home").unwrap(),
            "https://cnvsweb.stream/home"
        );
        assert_eq!(
            join_location("https://cnvsweb.stream/a", "https://x.example/b").unwrap(),
            "https://x.example/b"
        );
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(10.0); // 100ms interval

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_new_session_is_not_authenticated() {
        let client = CnvsClient::new().unwrap();
        assert!(!client.is_authenticated().await);
        assert!(!client.claim_keep_alive().await);
    }

    #[tokio::test]
    async fn test_claim_keep_alive_only_when_idle() {
        let client = CnvsClient::new().unwrap();
        client.mark_authenticated().await;
        assert!(!client.claim_keep_alive().await);

        let idle = Instant::now()
            .checked_sub(Duration::from_secs(200))
            .expect("monotonic clock older than 200s");
        client.set_last_activity(idle).await;
        assert!(client.idle_for().await >= Duration::from_secs(200));

        assert!(client.claim_keep_alive().await);
        // the claim resets last-activity
        assert!(!client.claim_keep_alive().await);
    }
}
