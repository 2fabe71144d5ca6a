//! Splits flipbook input text into numbered lines and URL/message pairs.
//!
//! Input is one card per line in the form `spotifyUrl,custom message`.
//! Line numbers are 1-based and always refer to the position in the original
//! text, so blank lines are skipped but never renumber the lines after them.

use crate::types::{ParsedEntry, RawLine};

pub const EXCERPT_MAX_LENGTH: usize = 120;

const ELLIPSIS: char = '…';

/// Splits `text` strictly on `\n`, keeping blank lines as placeholders.
pub fn parse_lines(text: &str) -> Vec<RawLine> {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| RawLine {
            line_number: index + 1,
            text: line.to_string(),
        })
        .collect()
}

/// Builds the display excerpt for an already trimmed line.
///
/// Lines longer than [`EXCERPT_MAX_LENGTH`] characters are cut so that the
/// excerpt, including the trailing ellipsis, is exactly that long.
pub fn build_excerpt(trimmed: &str) -> String {
    if trimmed.chars().count() <= EXCERPT_MAX_LENGTH {
        return trimmed.to_string();
    }

    let mut excerpt: String = trimmed.chars().take(EXCERPT_MAX_LENGTH - 1).collect();
    excerpt.push(ELLIPSIS);
    excerpt
}

/// Splits a trimmed line at its first comma into `(url, custom_text)`.
///
/// Returns `None` when the line has no comma. Further commas stay part of
/// the custom text.
pub fn split_entry(trimmed: &str) -> Option<(String, String)> {
    let (url, custom_text) = trimmed.split_once(',')?;
    Some((url.trim().to_string(), custom_text.trim().to_string()))
}

/// Parses every non-blank line into an entry without validating it.
///
/// A line without a comma is taken to be a bare URL with an empty message.
pub fn parse_entries(text: &str) -> Vec<ParsedEntry> {
    parse_lines(text)
        .into_iter()
        .filter_map(|raw| {
            let trimmed = raw.text.trim();
            if trimmed.is_empty() {
                return None;
            }

            let (url, custom_text) =
                split_entry(trimmed).unwrap_or_else(|| (trimmed.to_string(), String::new()));

            Some(ParsedEntry {
                line_number: raw.line_number,
                excerpt: build_excerpt(trimmed),
                raw_line: raw.text,
                url,
                custom_text,
            })
        })
        .collect()
}
