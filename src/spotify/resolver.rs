//! The metadata resolver used for card generation.
//!
//! [`SpotifyResolver`] reads the resource kind from the URL, tries the Web
//! API when credentials are configured and falls back to oEmbed otherwise.
//! Every oEmbed result is reported as degraded, together with the reason.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio_util::sync::CancellationToken;

use crate::{
    config::{SpotifyConfig, SpotifyCredentials},
    spotify::{ResolveError, TrackResolver, auth::TokenCache, cancellable, oembed, tracks},
    types::{Resolution, ResolvedTrack},
    warning,
};

pub const NO_CREDENTIALS_REASON: &str =
    "Spotify Web API credentials are not configured; metadata comes from oEmbed.";

/// The kind of Spotify page a URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotifyResource {
    Track(String),
    Playlist(String),
}

impl SpotifyResource {
    /// Reads `/track/{id}` or `/playlist/{id}` from the start of the path.
    pub fn from_url(url: &str) -> Result<Self, ResolveError> {
        let unsupported = || ResolveError::UnsupportedUrl(url.to_string());
        let parsed = Url::parse(url).map_err(|_| unsupported())?;
        let mut segments = parsed
            .path_segments()
            .ok_or_else(unsupported)?
            .filter(|segment| !segment.is_empty());

        match (segments.next(), segments.next()) {
            (Some("track"), Some(id)) => Ok(SpotifyResource::Track(id.to_string())),
            (Some("playlist"), Some(id)) => Ok(SpotifyResource::Playlist(id.to_string())),
            _ => Err(unsupported()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            SpotifyResource::Track(id) | SpotifyResource::Playlist(id) => id,
        }
    }

    pub fn uri(&self) -> String {
        match self {
            SpotifyResource::Track(id) => format!("spotify:track:{id}"),
            SpotifyResource::Playlist(id) => format!("spotify:playlist:{id}"),
        }
    }
}

/// Resolves cards through the Spotify Web API, falling back to oEmbed.
pub struct SpotifyResolver {
    client: Client,
    config: SpotifyConfig,
    tokens: TokenCache,
}

impl SpotifyResolver {
    pub fn new(config: SpotifyConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: SpotifyConfig) -> Self {
        Self {
            client,
            config,
            tokens: TokenCache::new(),
        }
    }

    async fn resolve(&self, url: &str) -> Result<Resolution, ResolveError> {
        let resource = SpotifyResource::from_url(url)?;

        let Some(credentials) = self.config.credentials() else {
            let track = self.resolve_with_oembed(url, &resource).await?;
            return Ok(Resolution {
                tracks: vec![track],
                degraded_reason: Some(NO_CREDENTIALS_REASON.to_string()),
            });
        };

        match self.resolve_with_web_api(&resource, &credentials).await {
            Ok(resolution) => Ok(resolution),
            Err(e) => {
                warning!(
                    "Spotify Web API lookup failed for {}, using oEmbed fallback: {}",
                    url,
                    e
                );
                let track = self.resolve_with_oembed(url, &resource).await?;
                Ok(Resolution {
                    tracks: vec![track],
                    degraded_reason: Some(format!(
                        "Spotify Web API lookup failed ({e}); metadata comes from oEmbed."
                    )),
                })
            }
        }
    }

    async fn resolve_with_web_api(
        &self,
        resource: &SpotifyResource,
        credentials: &SpotifyCredentials,
    ) -> Result<Resolution, ResolveError> {
        let token = self
            .tokens
            .access_token(&self.client, &self.config.token_url, credentials)
            .await?;

        let result = match resource {
            SpotifyResource::Track(id) => {
                tracks::get_track(&self.client, &self.config.api_url, &token, id)
                    .await
                    .map(|track| Resolution {
                        tracks: vec![track],
                        degraded_reason: None,
                    })
            }
            SpotifyResource::Playlist(id) => {
                tracks::get_playlist_tracks(&self.client, &self.config.api_url, &token, id)
                    .await
                    .map(|playlist| Resolution {
                        degraded_reason: playlist.truncated.then(|| {
                            format!(
                                "Playlist is longer than {} pages; only the first {} tracks were loaded.",
                                tracks::MAX_PLAYLIST_PAGES,
                                playlist.tracks.len()
                            )
                        }),
                        tracks: playlist.tracks,
                    })
            }
        };

        // a revoked or rotated token must not be reused by later lookups
        if let Err(ResolveError::Status {
            status: StatusCode::UNAUTHORIZED,
            ..
        }) = &result
        {
            self.tokens.clear().await;
        }

        result
    }

    async fn resolve_with_oembed(
        &self,
        url: &str,
        resource: &SpotifyResource,
    ) -> Result<ResolvedTrack, ResolveError> {
        oembed::get_oembed(&self.client, &self.config.oembed_url, url, resource).await
    }
}

#[async_trait]
impl TrackResolver for SpotifyResolver {
    async fn resolve_track(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Resolution, ResolveError> {
        cancellable(cancel, self.resolve(url)).await
    }
}
