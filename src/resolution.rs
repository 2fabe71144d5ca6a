//! Concurrent metadata resolution for one generation pass.
//!
//! All valid entries are looked up at once and every lookup is allowed to
//! settle; a failing line never blocks or cancels the others. Results are
//! matched back to their entry by position, so cards come out in line order
//! no matter which lookup finishes first.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::{
    spotify::{ResolveError, ScannableCodes, TrackResolver},
    types::{
        Issue, IssueCode, LineEvaluation, LineState, LineStatus, RenderInfo, Resolution, Severity,
    },
};

pub const FALLBACK_SUGGESTION: &str =
    "Card is printable, but verify metadata if precision is important.";
pub const RESOLUTION_FAILED_MESSAGE: &str =
    "Unable to resolve this line from Spotify APIs. Check URL availability and try again.";
pub const RESOLUTION_FAILED_SUGGESTION: &str =
    "Confirm the track URL opens publicly on Spotify, then regenerate.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub entries: Vec<RenderInfo>,
    /// The validation line states with each looked-up line's outcome applied.
    pub line_states: Vec<LineState>,
    /// Validation issues followed by resolution issues, unsorted.
    pub issues: Vec<Issue>,
}

/// Resolves every valid entry of `evaluation`.
///
/// Returns `None` when `cancel` fired before all lookups settled. A
/// cancelled pass produces nothing, not even for lookups that happened to
/// finish before the token fired.
pub async fn resolve_entries(
    resolver: &dyn TrackResolver,
    scannable: &ScannableCodes,
    evaluation: &LineEvaluation,
    cancel: &CancellationToken,
) -> Option<ResolutionOutcome> {
    let urls: Vec<String> = evaluation
        .valid_entries
        .iter()
        .map(|entry| entry.url.clone())
        .collect();

    let results = resolver.resolve_tracks(&urls, cancel).await;

    if cancel.is_cancelled() {
        return None;
    }

    Some(apply_results(evaluation, results, scannable))
}

/// Merges settled lookups into the validation result.
///
/// `results[i]` belongs to `evaluation.valid_entries[i]`. Only called for
/// passes whose token never fired, so a `Cancelled` error here came from the
/// resolver itself and counts as a failure like any other.
pub fn apply_results(
    evaluation: &LineEvaluation,
    results: Vec<Result<Resolution, ResolveError>>,
    scannable: &ScannableCodes,
) -> ResolutionOutcome {
    let mut line_states = evaluation.line_states.clone();
    let mut issues = evaluation.issues.clone();
    let mut entries = Vec::new();

    let position_by_line: HashMap<usize, usize> = line_states
        .iter()
        .enumerate()
        .map(|(position, state)| (state.line_number, position))
        .collect();

    for (entry, result) in evaluation.valid_entries.iter().zip(results) {
        let Some(state) = position_by_line
            .get(&entry.line_number)
            .and_then(|&position| line_states.get_mut(position))
        else {
            continue;
        };

        match result {
            Ok(resolution) => {
                entries.extend(resolution.tracks.into_iter().map(|track| RenderInfo {
                    scannable_url: scannable.scannable_url(&track.spotify_uri),
                    entry: entry.clone(),
                    track,
                }));

                match resolution.degraded_reason {
                    Some(reason) => {
                        let issue = Issue {
                            line_number: entry.line_number,
                            code: IssueCode::MetadataFallback,
                            severity: Severity::Warning,
                            message: reason,
                            suggestion: Some(FALLBACK_SUGGESTION.to_string()),
                            excerpt: entry.excerpt.clone(),
                        };
                        issues.push(issue.clone());
                        state.status = LineStatus::Degraded;
                        state.issue = Some(issue);
                    }
                    None => {
                        state.status = LineStatus::Resolved;
                        state.issue = None;
                    }
                }
            }
            Err(_) => {
                let issue = Issue {
                    line_number: entry.line_number,
                    code: IssueCode::TrackResolutionFailed,
                    severity: Severity::Error,
                    message: RESOLUTION_FAILED_MESSAGE.to_string(),
                    suggestion: Some(RESOLUTION_FAILED_SUGGESTION.to_string()),
                    excerpt: entry.excerpt.clone(),
                };
                issues.push(issue.clone());
                state.status = LineStatus::Failed;
                state.issue = Some(issue);
            }
        }
    }

    ResolutionOutcome {
        entries,
        line_states,
        issues,
    }
}

/// Sorts issues by line number. The sort is stable, so issues of the same
/// line keep their emission order.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by_key(|issue| issue.line_number);
}
