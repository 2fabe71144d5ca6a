//! Client-credentials authentication for the Spotify Web API.
//!
//! Tokens are requested from the accounts service and cached per resolver
//! until shortly before they expire.

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::SpotifyCredentials,
    spotify::ResolveError,
    types::{AccessToken, TokenResponse},
};

/// Tokens are refreshed this many seconds before they actually expire.
pub const EXPIRY_MARGIN_SECS: u64 = 30;

/// Requests an app access token with the client-credentials grant.
///
/// This grant carries no user context, which is all that public track and
/// playlist metadata needs.
pub async fn request_token(
    client: &Client,
    token_url: &str,
    credentials: &SpotifyCredentials,
) -> Result<AccessToken, ResolveError> {
    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ResolveError::Status {
            endpoint: "Spotify token",
            status: response.status(),
        });
    }

    let payload = response.json::<TokenResponse>().await?;

    Ok(AccessToken {
        access_token: payload.access_token,
        token_type: payload.token_type,
        expires_in: payload.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Whether `token` is expired at `now` (Unix seconds), counting the
/// [`EXPIRY_MARGIN_SECS`] margin as already expired.
pub fn is_expired(token: &AccessToken, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}

/// Shares one access token between all lookups of a resolver.
///
/// The lock is held while a new token is requested, so concurrent lookups
/// that find the cache empty wait for a single token request instead of
/// each issuing their own.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn access_token(
        &self,
        client: &Client,
        token_url: &str,
        credentials: &SpotifyCredentials,
    ) -> Result<String, ResolveError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !is_expired(token, Utc::now().timestamp() as u64) {
                return Ok(token.access_token.clone());
            }
        }

        let token = request_token(client, token_url, credentials).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    pub async fn clear(&self) {
        *self.token.lock().await = None;
    }
}
