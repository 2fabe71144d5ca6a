//! Per-line validation of flipbook input.
//!
//! Every non-blank line becomes exactly one [`LineState`]. The checks run in
//! a fixed order and the first failing one decides the issue reported for the
//! line. Lines passing all checks are returned as [`ParsedEntry`] values that
//! are eligible for metadata resolution.

use reqwest::Url;

use crate::{
    parser::{self, build_excerpt, split_entry},
    types::{
        Issue, IssueCode, LineEvaluation, LineState, LineStatus, ParsedEntry, RawLine, Severity,
    },
};

pub const SPOTIFY_HOSTS: [&str; 2] = ["open.spotify.com", "play.spotify.com"];

/// The validation result for a single non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedLine {
    pub state: LineState,
    /// Present only when the line passed every check.
    pub entry: Option<ParsedEntry>,
}

/// Validates one raw line. Returns `None` for blank lines, which are not
/// represented in the output at all.
pub fn evaluate(raw: &RawLine) -> Option<EvaluatedLine> {
    let trimmed = raw.text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let excerpt = build_excerpt(trimmed);

    let Some((url, custom_text)) = split_entry(trimmed) else {
        return Some(invalid(
            raw,
            excerpt,
            IssueCode::MissingComma,
            "Line must contain a comma separating URL and custom message.",
            "Use the format spotifyTrackOrPlaylistUrl,custom message on this line.",
        ));
    };

    if url.is_empty() {
        return Some(invalid(
            raw,
            excerpt,
            IssueCode::MissingUrl,
            "Spotify URL is missing before the comma.",
            "Add a full Spotify track or playlist URL before the comma.",
        ));
    }

    let parsed = match Url::parse(&url) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Some(invalid(
                raw,
                excerpt,
                IssueCode::InvalidUrl,
                "URL is not valid and cannot be parsed.",
                "Use a full Spotify URL such as https://open.spotify.com/track/{id}.",
            ));
        }
    };

    if !is_supported_spotify_url(&parsed) {
        return Some(invalid(
            raw,
            excerpt,
            IssueCode::UnsupportedSpotifyTrackUrl,
            "Only Spotify track and playlist URLs are supported for flipbook cards.",
            "Use an open.spotify.com/track/... or /playlist/... URL and keep the custom message after the comma.",
        ));
    }

    let entry = ParsedEntry {
        line_number: raw.line_number,
        raw_line: raw.text.clone(),
        excerpt: excerpt.clone(),
        url: url.clone(),
        custom_text: custom_text.clone(),
    };

    Some(EvaluatedLine {
        state: LineState {
            line_number: raw.line_number,
            raw_line: raw.text.clone(),
            excerpt,
            url: Some(url),
            custom_text: Some(custom_text),
            status: LineStatus::Unvalidated,
            issue: None,
        },
        entry: Some(entry),
    })
}

/// Validates every line of `text`.
///
/// Issues are collected in line order but are not sorted here; the state
/// controller sorts them once resolution issues have been merged in.
pub fn evaluate_lines(text: &str) -> LineEvaluation {
    let mut evaluation = LineEvaluation::default();

    for raw in parser::parse_lines(text) {
        let Some(evaluated) = evaluate(&raw) else {
            continue;
        };

        if let Some(issue) = &evaluated.state.issue {
            evaluation.issues.push(issue.clone());
        }
        if let Some(entry) = evaluated.entry {
            evaluation.valid_entries.push(entry);
        }
        evaluation.line_states.push(evaluated.state);
    }

    evaluation
}

/// Accepts `/track/{id}` and `/playlist/{id}` on the Spotify web player hosts.
pub fn is_supported_spotify_url(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if !SPOTIFY_HOSTS.contains(&host) {
        return false;
    }

    let mut segments = match url.path_segments() {
        Some(segments) => segments.filter(|s| !s.is_empty()),
        None => return false,
    };

    match (segments.next(), segments.next()) {
        (Some("track" | "playlist"), Some(_id)) => true,
        _ => false,
    }
}

fn invalid(
    raw: &RawLine,
    excerpt: String,
    code: IssueCode,
    message: &str,
    suggestion: &str,
) -> EvaluatedLine {
    let issue = Issue {
        line_number: raw.line_number,
        code,
        severity: Severity::Error,
        message: message.to_string(),
        suggestion: Some(suggestion.to_string()),
        excerpt: excerpt.clone(),
    };

    EvaluatedLine {
        state: LineState {
            line_number: raw.line_number,
            raw_line: raw.text.clone(),
            excerpt,
            url: None,
            custom_text: None,
            status: LineStatus::InvalidInput,
            issue: Some(issue),
        },
        entry: None,
    }
}
