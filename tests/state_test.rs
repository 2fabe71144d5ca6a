mod common;

use std::sync::Arc;

use common::StubResolver;
use flipbook::spotify::ScannableCodes;
use flipbook::state::{EXAMPLE_INPUT, FlipbookState};
use flipbook::types::{IssueCode, LineStatus, Severity};

// Helper function to create a state controller over the stub resolver
fn create_state(resolver: &Arc<StubResolver>, input: &str) -> FlipbookState {
    FlipbookState::with_input(resolver.clone(), ScannableCodes::default(), input)
}

#[test]
fn test_new_state_starts_with_validated_example() {
    let state = FlipbookState::new(StubResolver::new(), ScannableCodes::default());

    assert_eq!(state.input_text(), EXAMPLE_INPUT);
    assert_eq!(state.line_count(), 6);
    assert_eq!(state.valid_line_count(), 6);
    assert!(state.entries().is_empty());
    assert!(!state.is_loading());
    assert!(!state.is_stale());
    assert!(state.last_generated_text().is_none());
}

#[tokio::test]
async fn test_generate_resolves_valid_lines_and_keeps_failures_non_blocking() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "");
    state.set_input_text(
        &[
            "https://podcastaddict.com/show/abc,Invalid source",
            "https://open.spotify.com/track/good-track,Good line",
            "https://open.spotify.com/track/fail-track,Will fail",
            "https://open.spotify.com/track/warn-track,Will degrade",
        ]
        .join("\n"),
    );

    state.generate().await;

    let entries = state.entries();
    assert_eq!(entries.len(), 2, "keeps printable entries");
    assert_eq!(
        entries
            .iter()
            .map(|card| card.track.title.as_str())
            .collect::<Vec<_>>(),
        vec!["Good Song", "Warn Song"]
    );
    assert_eq!(state.line_count(), 4);
    assert_eq!(state.valid_line_count(), 1);
    assert_eq!(state.issue_line_count(), 3);

    let codes: Vec<IssueCode> = state.issues().iter().map(|issue| issue.code).collect();
    assert!(codes.contains(&IssueCode::UnsupportedSpotifyTrackUrl));
    assert!(codes.contains(&IssueCode::TrackResolutionFailed));
    assert!(codes.contains(&IssueCode::MetadataFallback));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_generate_mixed_input_example() {
    let resolver = StubResolver::new();
    let state = create_state(
        &resolver,
        "https://open.spotify.com/track/good,Good line\nnot a url\nhttps://open.spotify.com/track/warn,Warn line",
    );

    // Before resolution only validation has run
    assert_eq!(state.line_count(), 3);
    assert_eq!(state.valid_line_count(), 2);

    state.generate().await;

    assert_eq!(state.entries().len(), 2);
    let issues = state.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].line_number, 2);
    assert_eq!(issues[0].code, IssueCode::MissingComma);
    assert_eq!(issues[1].line_number, 3);
    assert_eq!(issues[1].code, IssueCode::MetadataFallback);
    assert_eq!(issues[1].severity, Severity::Warning);

    let statuses: Vec<LineStatus> = state.line_states().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            LineStatus::Resolved,
            LineStatus::InvalidInput,
            LineStatus::Degraded,
        ]
    );
    assert_eq!(state.valid_line_count() + state.issue_line_count(), state.line_count());
}

#[tokio::test]
async fn test_issues_are_sorted_by_line_after_generate() {
    let resolver = StubResolver::new();
    let state = create_state(
        &resolver,
        "https://open.spotify.com/track/fail,first\nno comma\nhttps://open.spotify.com/track/warn,third",
    );

    state.generate().await;

    assert_eq!(
        state
            .issues()
            .iter()
            .map(|issue| (issue.line_number, issue.code))
            .collect::<Vec<_>>(),
        vec![
            (1, IssueCode::TrackResolutionFailed),
            (2, IssueCode::MissingComma),
            (3, IssueCode::MetadataFallback),
        ]
    );
}

#[tokio::test]
async fn test_generate_whitespace_input_skips_resolver() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "   \n\n  ");

    state.generate().await;

    assert!(state.line_states().is_empty());
    assert!(state.entries().is_empty());
    assert!(!state.is_loading());
    assert!(!state.is_stale());
    assert_eq!(state.last_generated_text().as_deref(), Some("   \n\n  "));
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_generate_without_valid_lines_clears_previous_entries() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/good,Good line");

    state.generate().await;
    assert_eq!(state.entries().len(), 1);

    state.set_input_text("no comma");
    state.generate().await;

    assert!(state.entries().is_empty());
    assert_eq!(state.issues()[0].code, IssueCode::MissingComma);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn test_playlist_line_yields_two_entries() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/playlist/list,Road trip");

    state.generate().await;

    assert_eq!(state.line_count(), 1);
    let entries = state.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|card| card.entry.line_number == 1));
    assert!(entries.iter().all(|card| card.entry.custom_text == "Road trip"));
}

#[tokio::test]
async fn test_entries_follow_line_order() {
    let resolver = StubResolver::new();
    let state = create_state(
        &resolver,
        "https://open.spotify.com/track/slow,first\n\nhttps://open.spotify.com/track/good,second",
    );

    state.generate().await;

    let lines: Vec<usize> = state
        .entries()
        .iter()
        .map(|card| card.entry.line_number)
        .collect();
    assert_eq!(lines, vec![1, 3]);
}

#[tokio::test]
async fn test_stale_tracking_across_edits() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/good-track,Good line");

    state.generate().await;
    assert!(!state.is_stale());

    state.set_input_text(
        &[
            "https://open.spotify.com/track/good-track,Good line",
            "https://open.spotify.com/track/warn-track,Second line",
        ]
        .join("\n"),
    );
    assert!(state.is_stale());

    // Entries from the last generation stay visible until regenerating
    assert_eq!(state.entries().len(), 1);
    // but validation already reflects the new text
    assert_eq!(state.line_count(), 2);

    state.generate().await;
    assert!(!state.is_stale());
    assert_eq!(state.entries().len(), 2);
}

#[tokio::test]
async fn test_set_input_text_with_same_text_is_noop() {
    let resolver = StubResolver::new();
    let text = "https://open.spotify.com/track/gated,Gated line";
    let state = create_state(&resolver, text);

    tokio::join!(state.generate(), async {
        resolver.started.notified().await;

        // Same text: the pass in flight is not cancelled
        state.set_input_text(text);
        assert!(state.is_loading());

        resolver.release.notify_one();
    });

    assert_eq!(state.entries().len(), 1);
    assert_eq!(state.entries()[0].track.title, "Gated Song");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_superseded_pass_never_mutates_state() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/gated,First pass");

    tokio::join!(state.generate(), async {
        resolver.started.notified().await;
        assert!(state.is_loading());
        let line_states = state.line_states();
        assert_eq!(line_states[0].status, LineStatus::Resolving);

        state.set_input_text("https://open.spotify.com/track/good,Second pass");
        assert!(!state.is_loading());

        state.generate().await;
        resolver.release.notify_one();
    });

    let entries = state.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].track.title, "Good Song");
    assert_eq!(entries[0].entry.custom_text, "Second pass");
    assert!(state.issues().is_empty());
    assert!(!state.is_loading());
    assert!(!state.is_stale());
}

#[tokio::test]
async fn test_second_generate_supersedes_first() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/gated,Gated line");

    tokio::join!(state.generate(), async {
        resolver.started.notified().await;

        // Regenerating the unchanged text cancels the first pass
        tokio::join!(state.generate(), async {
            resolver.started.notified().await;
            assert!(state.is_loading());
            // The cancelled lookup may still be registered as a waiter
            resolver.release.notify_waiters();
        });

        assert!(!state.is_loading());
    });

    assert_eq!(resolver.calls(), 2);
    let entries = state.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].track.title, "Gated Song");
    assert_eq!(state.line_states()[0].status, LineStatus::Resolved);
    assert!(!state.is_loading());
    assert!(!state.is_stale());
}

#[tokio::test]
async fn test_dropped_generate_clears_loading() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/gated,Gated line");

    tokio::select! {
        _ = state.generate() => panic!("gated lookup must not finish"),
        _ = resolver.started.notified() => {}
    }

    assert!(!state.is_loading());
    assert!(state.entries().is_empty());
    assert!(state.last_generated_text().is_none());

    // Nothing is in flight, so no line may still claim to be resolving
    let statuses: Vec<LineStatus> = state.line_states().iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![LineStatus::Unvalidated]);
}

#[tokio::test]
async fn test_dropped_generate_keeps_previous_entries_and_revalidates() {
    let resolver = StubResolver::new();
    let state = create_state(
        &resolver,
        "https://open.spotify.com/track/good,Good line\nno comma",
    );
    state.generate().await;

    state.set_input_text(
        "https://open.spotify.com/track/gated,Gated line\nno comma\nhttps://open.spotify.com/track/good,Good line",
    );
    tokio::select! {
        _ = state.generate() => panic!("gated lookup must not finish"),
        _ = resolver.started.notified() => {}
    }

    let snapshot = state.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].track.title, "Good Song");
    assert_eq!(
        snapshot
            .line_states
            .iter()
            .map(|s| s.status)
            .collect::<Vec<_>>(),
        vec![
            LineStatus::Unvalidated,
            LineStatus::InvalidInput,
            LineStatus::Unvalidated,
        ]
    );
    assert_eq!(snapshot.issues.len(), 1);
    assert_eq!(snapshot.issues[0].code, IssueCode::MissingComma);
    assert!(snapshot.is_stale());
}

#[tokio::test]
async fn test_settled_pass_keeps_resolved_statuses() {
    let resolver = StubResolver::new();
    let state = create_state(&resolver, "https://open.spotify.com/track/good,Good line");

    state.generate().await;

    let snapshot = state.snapshot();
    assert_eq!(snapshot.line_states[0].status, LineStatus::Resolved);
    assert!(!snapshot.is_loading);
}
