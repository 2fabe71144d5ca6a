//! # Spotify Integration Module
//!
//! Metadata lookup for flipbook cards and the Spotify Code image URLs printed
//! on them.
//!
//! ## Architecture
//!
//! ```text
//! Resolution Orchestrator
//!          ↓
//! TrackResolver (trait)
//!          ↓
//! SpotifyResolver
//!     ├── Web API (client credentials, tracks, playlist items)
//!     └── oEmbed fallback (no authentication, single card)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Resolution Strategy
//!
//! With client credentials configured, tracks and playlists are looked up
//! through the Web API. Any failure of that path falls back to oEmbed and the
//! result is reported as degraded. Without credentials oEmbed is used
//! directly, which is also reported as degraded because it lacks full artist
//! credits and album artwork.
//!
//! ## Cancellation
//!
//! Every lookup takes a [`CancellationToken`]. When the token fires the
//! lookup future is dropped, which aborts any request in flight, and the call
//! fails with [`ResolveError::Cancelled`]. Callers use
//! [`ResolveError::is_cancelled`] to tell a superseded lookup apart from a
//! genuine failure.

pub mod auth;
pub mod oembed;
pub mod resolver;
pub mod scannable;
pub mod tracks;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::StatusCode;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::types::Resolution;

pub use resolver::{SpotifyResolver, SpotifyResource};
pub use scannable::ScannableCodes;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup was cancelled")]
    Cancelled,

    #[error("unsupported Spotify URL: {0}")]
    UnsupportedUrl(String),

    #[error("{endpoint} request failed with status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("rate limited by Spotify for {0} seconds")]
    RateLimited(u64),

    #[error("cannot decode Spotify response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ResolveError::Decode(e)
        } else {
            ResolveError::Http(e)
        }
    }
}

impl ResolveError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResolveError::Cancelled)
    }
}

/// Looks up card metadata for a validated Spotify URL.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolves one track or playlist URL. A playlist resolves to one track
    /// per playable item.
    ///
    /// Must fail with [`ResolveError::Cancelled`] once `cancel` fires.
    async fn resolve_track(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Resolution, ResolveError>;

    /// Resolves all `urls` concurrently and waits for every lookup to settle.
    ///
    /// One failing lookup never short-circuits the others. Results are
    /// returned in the order of `urls`, whatever order they complete in.
    async fn resolve_tracks(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Vec<Result<Resolution, ResolveError>> {
        join_all(urls.iter().map(|url| cancellable(cancel, self.resolve_track(url, cancel)))).await
    }
}

/// Runs `lookup` until it completes or `cancel` fires, whichever is first.
pub async fn cancellable<F, T>(cancel: &CancellationToken, lookup: F) -> Result<T, ResolveError>
where
    F: Future<Output = Result<T, ResolveError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ResolveError::Cancelled),
        result = lookup => result,
    }
}
