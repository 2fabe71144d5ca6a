use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::{input::load_input, print_issues},
    config::SpotifyConfig,
    error, info,
    spotify::{ScannableCodes, SpotifyResolver},
    state::FlipbookState,
    success,
    types::{CardTableRow, RenderInfo},
    warning,
};

/// Resolves every valid line and prints the resulting cards.
pub async fn generate(input: Option<PathBuf>, json: bool) {
    let text = match load_input(input).await {
        Ok(text) => text,
        Err(e) => error!("Cannot load input. Err: {}", e),
    };

    let spotify_config = SpotifyConfig::from_env();
    if spotify_config.credentials().is_none() {
        warning!("Spotify API credentials not set, cards will use oEmbed metadata");
    }

    let resolver = Arc::new(SpotifyResolver::new(spotify_config));
    let state = FlipbookState::with_input(resolver, ScannableCodes::from_env(), text);

    if !json {
        info!(
            "Resolving {} of {} lines",
            state.valid_line_count(),
            state.line_count()
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Resolving Spotify metadata...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    state.generate().await;
    pb.finish_and_clear();

    let snapshot = state.snapshot();
    let entries = &snapshot.entries;
    if json {
        match serde_json::to_string_pretty(entries) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize cards. Err: {}", e),
        }
    } else if !entries.is_empty() {
        println!("{}", Table::new(card_rows(entries)));
    }

    if json {
        // stdout carries the JSON document only
        for issue in &snapshot.issues {
            warning!(
                "line {}: {} {}",
                issue.line_number,
                issue.code,
                issue.message
            );
        }
    } else {
        print_issues(&snapshot.issues);
        success!(
            "Generated {} cards from {} lines",
            entries.len(),
            snapshot.line_count()
        );
    }
}

fn card_rows(entries: &[RenderInfo]) -> Vec<CardTableRow> {
    entries
        .iter()
        .map(|card| CardTableRow {
            line: card.entry.line_number,
            title: card.track.title.clone(),
            artists: card.track.artists.clone(),
            message: card.entry.custom_text.clone(),
            scannable: card.scannable_url.clone(),
        })
        .collect()
}
