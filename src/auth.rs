use crate::config::OAuthConfig;
use crate::error::AuthError;
use crate::session::Session;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use time::OffsetDateTime;
use tracing::{info, warn};
use urlencoding::encode;

#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Bearer token for the data fetch, plus whether the caller may see data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    pub authorized: bool,
}

/// Whether `email` belongs to `allowed_domain`. No configured domain allows
/// everyone; a configured domain rejects sessions without an email.
pub fn is_authorized(email: Option<&str>, allowed_domain: Option<&str>) -> bool {
    let Some(domain) = allowed_domain else {
        return true;
    };
    email
        .and_then(|e| e.rsplit_once('@'))
        .is_some_and(|(_, d)| d.eq_ignore_ascii_case(domain.trim_start_matches('@')))
}

fn refresh_body(oauth: &OAuthConfig) -> String {
    format!(
        "client_id={}&client_secret={}&refresh_token={}&grant_type=refresh_token",
        encode(&oauth.client_id),
        encode(&oauth.client_secret),
        encode(&oauth.refresh_token),
    )
}

/// Trade the configured refresh token for a fresh access token.
pub async fn manual_refresh(
    client: &Client,
    oauth: &OAuthConfig,
) -> Result<TokenResponse, AuthError> {
    let resp = client
        .post(&oauth.token_url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(refresh_body(oauth))
        .send()
        .await?;

    if !resp.status().is_success() {
        let error_text = resp.text().await?;
        warn!(error = %error_text, "Token refresh rejected");
        return Err(AuthError::Rejected(error_text));
    }

    let token_resp: TokenResponse = resp.json().await?;
    info!(expires_in = token_resp.expires_in, token_type = %token_resp.token_type, "Access token refreshed");
    Ok(token_resp)
}

/// Cached session token first; otherwise (or when `force_refresh`) run the
/// refresh-token grant and cache the result. `authorized` reflects the cached
/// identity's email domain against `allowed_domain`.
pub async fn acquire_token(
    client: &Client,
    oauth: Option<&OAuthConfig>,
    session_path: impl AsRef<Path>,
    allowed_domain: Option<&str>,
    force_refresh: bool,
) -> Result<AccessGrant, AuthError> {
    let session_path = session_path.as_ref();

    if !force_refresh {
        if let Some(session) = Session::load(session_path)? {
            info!(email = ?session.email, "Using cached session");
            let authorized = is_authorized(session.email.as_deref(), allowed_domain);
            return Ok(AccessGrant {
                access_token: session.access_token,
                authorized,
            });
        }
    }

    let oauth = oauth.ok_or(AuthError::NotConfigured)?;
    info!("Refreshing....");
    let token = manual_refresh(client, oauth).await?;

    let mut session = Session::load(session_path)?.unwrap_or_default();
    session.access_token = token.access_token.clone();
    session.stamp_login(OffsetDateTime::now_utc());
    session.save(session_path)?;

    Ok(AccessGrant {
        authorized: is_authorized(session.email.as_deref(), allowed_domain),
        access_token: token.access_token,
    })
}

/// Forced de-authentication after the source rejected the token.
pub fn revoke(session_path: impl AsRef<Path>) -> Result<(), AuthError> {
    Session::clear(session_path)?;
    warn!("Session cleared, login required");
    Ok(())
}
