//! Configuration management for the flipbook generator.
//!
//! Configuration is read from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Values are collected once into
//! plain structs that are injected into the components needing them, so the
//! resolution strategy never depends on global state at lookup time.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_OEMBED_URL: &str = "https://open.spotify.com/oembed";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot load {path}: {source}")]
    Dotenv {
        path: PathBuf,
        source: dotenv::Error,
    },
}

/// Returns the path of the optional `.env` file.
///
/// - Linux: `~/.local/share/flipbook/.env`
/// - macOS: `~/Library/Application Support/flipbook/.env`
/// - Windows: `%LOCALAPPDATA%/flipbook/.env`
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("flipbook/.env");
    path
}

/// Loads environment variables from the `.env` file in the local data
/// directory. A missing file is not an error: every setting has a default or
/// is optional.
///
/// # Errors
///
/// Fails if the parent directory cannot be created or the file exists but
/// cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|source| ConfigError::Dotenv { path, source })?;
    Ok(())
}

/// Client-credentials pair for the Spotify Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Settings for the metadata resolver.
///
/// Credentials are optional. When either half is missing the resolver uses
/// the oEmbed endpoint only, which needs no authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: String,
    pub token_url: String,
    pub oembed_url: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            oembed_url: DEFAULT_SPOTIFY_OEMBED_URL.to_string(),
        }
    }
}

impl SpotifyConfig {
    /// Reads the resolver settings from the environment.
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET` (optional)
    /// - `SPOTIFY_API_URL`, `SPOTIFY_API_TOKEN_URL`, `SPOTIFY_OEMBED_URL` (defaulted)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: non_empty_var("SPOTIFY_API_AUTH_CLIENT_ID"),
            client_secret: non_empty_var("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            api_url: non_empty_var("SPOTIFY_API_URL").unwrap_or(defaults.api_url),
            token_url: non_empty_var("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            oembed_url: non_empty_var("SPOTIFY_OEMBED_URL").unwrap_or(defaults.oembed_url),
        }
    }

    pub fn credentials(&self) -> Option<SpotifyCredentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(SpotifyCredentials {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }
}

pub(crate) fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
