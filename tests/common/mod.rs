#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use flipbook::{
    spotify::{ResolveError, TrackResolver},
    types::{Resolution, ResolvedTrack},
};
use reqwest::StatusCode;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub const SCANNABLE_PREFIX: &str = "https://scannables.scdn.co/uri/plain/svg/000000/white/640/";

// Helper function to create a resolved test track
pub fn track(title: &str, artists: &str, id: &str) -> ResolvedTrack {
    ResolvedTrack {
        title: title.to_string(),
        artists: artists.to_string(),
        artwork_url: format!("https://i.scdn.co/image/{}", id),
        spotify_uri: format!("spotify:track:{}", id),
    }
}

/// Resolver stub whose behaviour is picked by a keyword in the URL:
///
/// - `good` resolves normally, `warn` resolves degraded
/// - `list` resolves to two tracks, `empty` to none
/// - `slow` resolves after a short delay
/// - `gated` signals `started` and waits for `release`
/// - anything else fails
#[derive(Default)]
pub struct StubResolver {
    pub calls: AtomicUsize,
    pub started: Notify,
    pub release: Notify,
}

impl StubResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackResolver for StubResolver {
    async fn resolve_track(
        &self,
        url: &str,
        _cancel: &CancellationToken,
    ) -> Result<Resolution, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if url.contains("/good") {
            return Ok(Resolution {
                tracks: vec![track("Good Song", "Good Artist", "good")],
                degraded_reason: None,
            });
        }

        if url.contains("/warn") {
            return Ok(Resolution {
                tracks: vec![track("Warn Song", "Warn Artist", "warn")],
                degraded_reason: Some("Fallback metadata was used.".to_string()),
            });
        }

        if url.contains("/list") {
            return Ok(Resolution {
                tracks: vec![
                    track("First Song", "List Artist", "first"),
                    track("Second Song", "List Artist", "second"),
                ],
                degraded_reason: None,
            });
        }

        if url.contains("/empty") {
            return Ok(Resolution::default());
        }

        if url.contains("/slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
            return Ok(Resolution {
                tracks: vec![track("Slow Song", "Slow Artist", "slow")],
                degraded_reason: None,
            });
        }

        if url.contains("/gated") {
            self.started.notify_one();
            self.release.notified().await;
            return Ok(Resolution {
                tracks: vec![track("Gated Song", "Gated Artist", "gated")],
                degraded_reason: None,
            });
        }

        Err(ResolveError::Status {
            endpoint: "stub",
            status: StatusCode::NOT_FOUND,
        })
    }
}
