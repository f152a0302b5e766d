//! Configuration management for promptlist.
//!
//! Values come from environment variables, optionally seeded from a `.env` file in
//! the local data directory. Everything is collected into an explicit [`Config`]
//! that callers build once and pass down; nothing here is global.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command line flags (pipeline options only, applied by the CLI)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use clap::ValueEnum;

use crate::{
    error::ConfigError,
    pipeline::{DuplicatePolicy, MatchPolicy, PipelineOptions, QueryMode},
};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `promptlist/.env`:
/// - Linux: `~/.local/share/promptlist/.env`
/// - macOS: `~/Library/Application Support/promptlist/.env`
/// - Windows: `%LOCALAPPDATA%/promptlist/.env`
///
/// A missing file is fine; the process environment alone may carry everything.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("promptlist/.env");
    path
}

/// Settings for the Spotify Web API client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Settings for the chat completion service that proposes titles and songs.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub song_count: u32,
    pub timeout: Duration,
}

impl SuggestionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            song_count: 25,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub catalog: CatalogConfig,
    pub suggestions: SuggestionConfig,
    pub pipeline: PipelineOptions,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if `OPENAI_API_KEY` is not set
    /// - [`ConfigError::Invalid`] if any value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing("OPENAI_API_KEY".to_string()))?;

        let catalog_defaults = CatalogConfig::default();
        let catalog = CatalogConfig {
            api_url: lookup("SPOTIFY_API_URL").unwrap_or(catalog_defaults.api_url),
            timeout: timeout_or(&lookup, "CATALOG_TIMEOUT_SECS", catalog_defaults.timeout)?,
        };

        let suggestion_defaults = SuggestionConfig::new(api_key);
        let suggestions = SuggestionConfig {
            api_url: lookup("OPENAI_API_URL").unwrap_or(suggestion_defaults.api_url.clone()),
            model: lookup("OPENAI_MODEL").unwrap_or(suggestion_defaults.model.clone()),
            song_count: parse_or(&lookup, "SONG_COUNT", suggestion_defaults.song_count)?,
            timeout: timeout_or(&lookup, "OPENAI_TIMEOUT_SECS", suggestion_defaults.timeout)?,
            ..suggestion_defaults
        };

        let defaults = PipelineOptions::default();
        let pipeline = PipelineOptions {
            playlist_public: parse_or(&lookup, "PLAYLIST_PUBLIC", defaults.playlist_public)?,
            max_candidates: parse_or(&lookup, "MAX_CANDIDATES", defaults.max_candidates)?,
            dedupe_candidates: parse_or(&lookup, "DEDUPE_CANDIDATES", defaults.dedupe_candidates)?,
            duplicate_policy: enum_or(&lookup, "DUPLICATE_POLICY", defaults.duplicate_policy)?,
            query_mode: enum_or(&lookup, "QUERY_MODE", defaults.query_mode)?,
            match_policy: enum_or(&lookup, "MATCH_POLICY", defaults.match_policy)?,
            fallback_title: lookup("FALLBACK_TITLE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.fallback_title),
        };

        Ok(Self {
            server_addr: lookup("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            catalog,
            suggestions,
            pipeline,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// Timeouts are whole seconds and must be positive.
fn timeout_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default.as_secs())? {
        0 => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: lookup(key).unwrap_or_default(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn enum_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: ValueEnum,
{
    match lookup(key) {
        Some(value) => T::from_str(value.trim(), true).map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
