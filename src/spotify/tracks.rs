//! Web API lookups for tracks and playlist items.
//!
//! All requests go through [`send`], which waits out a short `Retry-After`
//! once when Spotify answers `429 Too Many Requests`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    spotify::ResolveError,
    types::{PlaylistTracksResponse, ResolvedTrack, SpotifyTrack},
    warning,
};

/// Longest `Retry-After` delay that is waited out before giving up.
pub const MAX_RETRY_AFTER_SECS: u64 = 10;

/// Page size for playlist items; the Web API maximum.
pub const PLAYLIST_PAGE_LIMIT: u32 = 100;

/// Upper bound on playlist pages fetched for one line. Later pages are
/// dropped and the playlist is reported as truncated.
pub const MAX_PLAYLIST_PAGES: usize = 100;

/// The tracks of one playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistTracks {
    pub tracks: Vec<ResolvedTrack>,
    /// `true` when pages were left unfetched after [`MAX_PLAYLIST_PAGES`].
    pub truncated: bool,
}

/// Fetches a single track from the Web API.
pub async fn get_track(
    client: &Client,
    api_url: &str,
    token: &str,
    track_id: &str,
) -> Result<ResolvedTrack, ResolveError> {
    let endpoint = format!("{api_url}/tracks/{track_id}");
    let response = send(client.get(&endpoint).bearer_auth(token), "Spotify track").await?;
    let track = response.json::<SpotifyTrack>().await?;

    Ok(to_resolved_track(track))
}

/// Fetches the tracks of a playlist, following the `next` links for at
/// most [`MAX_PLAYLIST_PAGES`] pages.
///
/// Removed tracks and local files come back as `null` and are skipped, as
/// they have nothing to print.
pub async fn get_playlist_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    playlist_id: &str,
) -> Result<PlaylistTracks, ResolveError> {
    let mut tracks = Vec::new();
    let mut next = Some(format!(
        "{api_url}/playlists/{playlist_id}/tracks?limit={PLAYLIST_PAGE_LIMIT}"
    ));

    for _ in 0..MAX_PLAYLIST_PAGES {
        let Some(page_url) = next.take() else {
            break;
        };

        let response = send(client.get(&page_url).bearer_auth(token), "Spotify playlist").await?;
        let page = response.json::<PlaylistTracksResponse>().await?;

        tracks.extend(
            page.items
                .into_iter()
                .flatten()
                .filter_map(|item| item.track)
                .map(to_resolved_track),
        );
        next = page.next;
    }

    let truncated = next.is_some();
    if truncated {
        warning!(
            "Playlist {} has more than {} pages, only the first {} tracks are used",
            playlist_id,
            MAX_PLAYLIST_PAGES,
            tracks.len()
        );
    }

    Ok(PlaylistTracks { tracks, truncated })
}

/// Maps a Web API track to card metadata: artist names joined with `", "`
/// and the largest (first) album image, or an empty URL without images.
pub fn to_resolved_track(track: SpotifyTrack) -> ResolvedTrack {
    ResolvedTrack {
        title: track.name,
        artists: track
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        artwork_url: track
            .album
            .images
            .first()
            .map(|image| image.url.clone())
            .unwrap_or_default(),
        spotify_uri: track.uri,
    }
}

/// Sends a request, waiting out a short `Retry-After` once when rate limited.
async fn send(request: RequestBuilder, endpoint: &'static str) -> Result<Response, ResolveError> {
    let retry = request.try_clone();
    let response = request.send().await?;

    let response = match (response.status(), retry) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry)) => {
            let retry_after = retry_after_secs(&response);
            if retry_after > MAX_RETRY_AFTER_SECS {
                warning!(
                    "Spotify asked to retry after {} seconds, skipping {} lookup",
                    retry_after,
                    endpoint
                );
                return Err(ResolveError::RateLimited(retry_after));
            }

            sleep(Duration::from_secs(retry_after)).await;
            retry.send().await?
        }
        _ => response,
    };

    if !response.status().is_success() {
        return Err(ResolveError::Status {
            endpoint,
            status: response.status(),
        });
    }

    Ok(response)
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
