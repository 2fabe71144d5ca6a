//! Spotify Code image URLs.
//!
//! A Spotify Code is the barcode the Spotify app scans to open a track or
//! playlist. The image is rendered by Spotify from the URI, the colours and
//! the size encoded in the URL path.

use crate::config::non_empty_var;

pub const SCANNABLE_BASE_URL: &str = "https://scannables.scdn.co/uri/plain/svg";

/// Builds image URLs for Spotify Codes, the barcodes the Spotify app scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannableCodes {
    pub background: String,
    pub bar_color: String,
    pub size: u32,
}

impl Default for ScannableCodes {
    fn default() -> Self {
        Self {
            background: "000000".to_string(),
            bar_color: "white".to_string(),
            size: 640,
        }
    }
}

impl ScannableCodes {
    pub fn new(background: impl Into<String>, bar_color: impl Into<String>, size: u32) -> Self {
        Self {
            background: background.into(),
            bar_color: bar_color.into(),
            size,
        }
    }

    /// Reads `FLIPBOOK_SCANNABLE_BACKGROUND`, `FLIPBOOK_SCANNABLE_BAR_COLOR`
    /// and `FLIPBOOK_SCANNABLE_SIZE`, falling back to the defaults for unset
    /// or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            background: non_empty_var("FLIPBOOK_SCANNABLE_BACKGROUND")
                .unwrap_or(defaults.background),
            bar_color: non_empty_var("FLIPBOOK_SCANNABLE_BAR_COLOR")
                .unwrap_or(defaults.bar_color),
            size: non_empty_var("FLIPBOOK_SCANNABLE_SIZE")
                .and_then(|size| size.trim().parse().ok())
                .unwrap_or(defaults.size),
        }
    }

    pub fn scannable_url(&self, spotify_uri: &str) -> String {
        format!(
            "{base}/{background}/{bar_color}/{size}/{uri}",
            base = SCANNABLE_BASE_URL,
            background = self.background,
            bar_color = self.bar_color,
            size = self.size,
            uri = urlencoding::encode(spotify_uri)
        )
    }
}
