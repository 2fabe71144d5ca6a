use std::{path::PathBuf, sync::Arc};

use crate::{
    cli::{input::load_input, print_issues},
    config::SpotifyConfig,
    error, info,
    spotify::{ScannableCodes, SpotifyResolver},
    state::FlipbookState,
    success, warning,
};

/// Validates the input without contacting Spotify.
pub async fn check(input: Option<PathBuf>) {
    let text = match load_input(input).await {
        Ok(text) => text,
        Err(e) => error!("Cannot load input. Err: {}", e),
    };

    let resolver = Arc::new(SpotifyResolver::new(SpotifyConfig::from_env()));
    let state = FlipbookState::with_input(resolver, ScannableCodes::from_env(), text);

    info!(
        "Checked {} lines: {} valid, {} with issues",
        state.line_count(),
        state.valid_line_count(),
        state.issue_line_count()
    );

    let issues = state.issues();
    if issues.is_empty() {
        success!("All lines are ready to generate");
        return;
    }

    print_issues(&issues);
    warning!("Fix the lines above before generating");
}
