//! Session keep-alive
//!
//! The site drops idle sessions. Every operation calls
//! [`CnvsClient::ensure_alive`] first, and embedders can additionally run
//! [`spawn_keep_alive`] so the session survives quiet periods.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::client::CnvsClient;
use crate::scraper::CnvsScraper;

impl CnvsClient {
    /// Refresh the server-side session if it has been idle too long
    ///
    /// No-op until login succeeded. Past the idle threshold a single GET to
    /// the site root is sent with the short keep-alive timeout. Its outcome
    /// is ignored: a failed ping never aborts the caller.
    pub async fn ensure_alive(&self) {
        if !self.claim_keep_alive().await {
            return;
        }

        match self.ping().await {
            Ok(()) => debug!("keep-alive ping sent"),
            Err(e) => debug!(error = %e, "keep-alive ping failed"),
        }
    }
}

/// Spawn a task that calls `ensure_alive` every `every`
///
/// The task runs until the returned handle is aborted or the runtime shuts
/// down. Must be called from within a tokio runtime. A zero period is
/// raised to one millisecond.
pub fn spawn_keep_alive(scraper: Arc<CnvsScraper>, every: Duration) -> JoinHandle<()> {
    let every = every.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            scraper.ensure_alive().await;
        }
    })
}
