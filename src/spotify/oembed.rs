//! Lookups through Spotify's public oEmbed endpoint.

use reqwest::Client;

use crate::{
    spotify::{ResolveError, SpotifyResource},
    types::{OEmbedResponse, ResolvedTrack},
};

/// Looks up a Spotify URL through the public oEmbed endpoint.
///
/// oEmbed needs no credentials but only describes the page itself, so a
/// playlist URL yields one card for the playlist rather than one per track.
pub async fn get_oembed(
    client: &Client,
    oembed_url: &str,
    url: &str,
    resource: &SpotifyResource,
) -> Result<ResolvedTrack, ResolveError> {
    let response = client.get(oembed_url).query(&[("url", url)]).send().await?;

    if !response.status().is_success() {
        return Err(ResolveError::Status {
            endpoint: "Spotify oEmbed",
            status: response.status(),
        });
    }

    let payload = response.json::<OEmbedResponse>().await?;

    Ok(ResolvedTrack {
        title: payload.title,
        artists: payload.author_name.unwrap_or_default(),
        artwork_url: payload.thumbnail_url.unwrap_or_default(),
        spotify_uri: resource.uri(),
    })
}
