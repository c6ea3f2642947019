//! Login handshake for cnvsweb
//!
//! The site gates content behind an access token: the login page sets
//! anti-bot cookies, an AJAX endpoint accepts the token and answers with a
//! JSON status plus a redirect, and the redirect target must not bounce back
//! to the login page.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::CnvsClient;
use crate::error::{CnvsError, Result};
use crate::url::{absolutize, build_login_endpoint_url, build_login_page_url};

const AJAX_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Form body posted to the login endpoint
///
/// Only the token is ever filled in. Absent identity fields are left out of
/// the encoded body entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct LoginForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    token: String,
    #[serde(rename = "emailVerified", skip_serializing_if = "Option::is_none")]
    email_verified: Option<bool>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    referer: String,
}

impl LoginForm {
    pub(crate) fn with_token(token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..Self::default()
        }
    }
}

/// JSON answer of the login endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    redirect: Option<String>,
}

impl LoginResponse {
    /// Parses the endpoint body and returns the redirect target on success
    ///
    /// A missing redirect means the site root.
    pub(crate) fn redirect_target(body: &str, base_url: &str) -> Result<String> {
        let response: LoginResponse = serde_json::from_str(body)
            .map_err(|e| CnvsError::LoginRejected(format!("response is not JSON: {}", e)))?;

        match response.status.as_deref() {
            Some("success") => Ok(response
                .redirect
                .filter(|r| !r.trim().is_empty())
                .map(|r| absolutize(base_url, &r))
                .unwrap_or_else(|| base_url.to_string())),
            Some(other) => Err(CnvsError::LoginRejected(format!(
                "status was {:?}",
                other
            ))),
            None => Err(CnvsError::LoginRejected("response has no status".to_string())),
        }
    }
}

/// Runs the login handshake and marks the session authenticated on success
///
/// No retries; the caller owns retry policy.
///
/// # Errors
/// - `HttpError` - any transport failure during the three requests
/// - `LoginRejected` - non-200 answer, non-JSON body, status other than
///   "success", or a redirect that lands on the login page again
pub(crate) async fn login(client: &CnvsClient, token: &str) -> Result<()> {
    let base = client.base_url();
    let login_page = build_login_page_url(base);

    // anti-bot cookies; challenge pages often answer 403/503 while setting them
    client.prime_cookies(&login_page).await?;

    client.pace().await;
    let response = client
        .http()
        .post(build_login_endpoint_url(base))
        .header("X-Requested-With", "XMLHttpRequest")
        .header(ACCEPT, AJAX_ACCEPT)
        .header(ORIGIN, base)
        .header(REFERER, login_page.as_str())
        .form(&LoginForm::with_token(token))
        .send()
        .await
        .map_err(CnvsError::HttpError)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CnvsError::LoginRejected(format!(
            "login endpoint answered {}",
            status
        )));
    }

    let body = response.text().await.map_err(CnvsError::HttpError)?;
    let redirect = LoginResponse::redirect_target(&body, base)?;
    debug!(redirect = %redirect, "login endpoint accepted token");

    let landing = client.fetch_page_any_status(&redirect).await?;
    if landing.status != StatusCode::OK {
        return Err(CnvsError::LoginRejected(format!(
            "redirect target answered {}",
            landing.status
        )));
    }
    if landing.url.contains("/login") {
        return Err(CnvsError::LoginRejected(
            "redirect landed on the login page".to_string(),
        ));
    }

    client.mark_authenticated().await;
    info!("login succeeded");
    Ok(())
}
