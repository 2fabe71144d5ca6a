//! Data structures shared across the crate.
//!
//! The first half models flipbook input and output: raw lines, parsed
//! entries, line states, issues and printable cards. Their serde names match
//! the JSON emitted by `flipbook generate --json`. The second half holds the
//! Spotify wire types and the rows of the console tables.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One line of user input, numbered from 1. Blank lines are kept so that
/// later lines retain their original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub line_number: usize,
    pub raw_line: String,
    pub excerpt: String,
    pub url: String,
    pub custom_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub title: String,
    /// Display names joined with `", "`.
    pub artists: String,
    pub artwork_url: String,
    pub spotify_uri: String,
}

/// A printable card: the source line, its resolved metadata and the
/// scannable code image for the track URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInfo {
    #[serde(flatten)]
    pub entry: ParsedEntry,
    #[serde(flatten)]
    pub track: ResolvedTrack,
    pub scannable_url: String,
}

/// Outcome of one successful lookup. A playlist line may yield many tracks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub tracks: Vec<ResolvedTrack>,
    pub degraded_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingComma,
    MissingUrl,
    InvalidUrl,
    UnsupportedSpotifyTrackUrl,
    MetadataFallback,
    TrackResolutionFailed,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingComma => "MISSING_COMMA",
            IssueCode::MissingUrl => "MISSING_URL",
            IssueCode::InvalidUrl => "INVALID_URL",
            IssueCode::UnsupportedSpotifyTrackUrl => "UNSUPPORTED_SPOTIFY_TRACK_URL",
            IssueCode::MetadataFallback => "METADATA_FALLBACK",
            IssueCode::TrackResolutionFailed => "TRACK_RESOLUTION_FAILED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub line_number: usize,
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    pub excerpt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStatus {
    Unvalidated,
    InvalidInput,
    Resolving,
    Resolved,
    Degraded,
    Failed,
}

/// Status of one non-blank input line. `url` and `custom_text` are `None`
/// exactly when the line failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineState {
    pub line_number: usize,
    pub raw_line: String,
    pub excerpt: String,
    pub url: Option<String>,
    pub custom_text: Option<String>,
    pub status: LineStatus,
    pub issue: Option<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEvaluation {
    pub line_states: Vec<LineState>,
    pub valid_entries: Vec<ParsedEntry>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSnapshot {
    pub input_text: String,
    pub last_generated_text: Option<String>,
    pub line_states: Vec<LineState>,
    pub issues: Vec<Issue>,
    pub entries: Vec<RenderInfo>,
    pub is_loading: bool,
}

impl GenerationSnapshot {
    pub fn is_stale(&self) -> bool {
        match &self.last_generated_text {
            Some(last) => *last != self.input_text,
            None => false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_states.len()
    }

    pub fn valid_line_count(&self) -> usize {
        self.line_states.iter().filter(|s| s.issue.is_none()).count()
    }

    pub fn issue_line_count(&self) -> usize {
        self.line_states.iter().filter(|s| s.issue.is_some()).count()
    }
}

/// A cached app access token. `obtained_at` is in Unix seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: SpotifyAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<Option<PlaylistItem>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OEmbedResponse {
    pub title: String,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Tabled)]
pub struct CardTableRow {
    pub line: usize,
    pub title: String,
    pub artists: String,
    pub message: String,
    pub scannable: String,
}

#[derive(Tabled)]
pub struct IssueTableRow {
    pub line: usize,
    pub severity: String,
    pub code: String,
    pub message: String,
    pub suggestion: String,
}
