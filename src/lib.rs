//! Spotify Flipbook Library
//!
//! Turns line-oriented text of the form `spotifyUrl,custom message` into
//! printable flipbook cards. Each line is validated on its own, valid lines
//! are resolved against Spotify concurrently, and the results are assembled
//! into cards carrying the track metadata and a scannable Spotify Code.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `parser` - Splitting input text into numbered lines and entries
//! - `resolution` - Concurrent metadata lookup for one generation pass
//! - `spotify` - Spotify metadata resolver and Spotify Code URLs
//! - `state` - Generation state controller with cancellation of stale passes
//! - `types` - Data structures and type definitions
//! - `validation` - Per-line validation and issue reporting
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flipbook::{config, spotify::{ScannableCodes, SpotifyResolver}, state::FlipbookState};
//!
//! #[tokio::main]
//! async fn main() -> flipbook::Res<()> {
//!     config::load_env().await?;
//!     let resolver = Arc::new(SpotifyResolver::new(config::SpotifyConfig::from_env()));
//!     let state = FlipbookState::new(resolver, ScannableCodes::from_env());
//!     state.generate().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod parser;
pub mod resolution;
pub mod spotify;
pub mod state;
pub mod types;
pub mod validation;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command-line glue, where any error simply ends the command.
/// Line-level problems are never reported through it; they are collected as
/// [`types::Issue`] values instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving {} lines...", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Generated {} cards", entries.len());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the binary: it terminates the process with exit code 1.
///
/// # Example
///
/// ```
/// error!("Cannot read input file: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, such as a lookup falling back to a
/// lower-fidelity source.
///
/// # Example
///
/// ```
/// warning!("Spotify Web API lookup failed, using oEmbed fallback: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
