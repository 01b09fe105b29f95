//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use crate::error::Result;

/// Songwriters used to seed discovery when `SONGBASE_WRITERS` is unset.
const DEFAULT_WRITERS: &[&str] = &["robert pollard", "taylor swift"];

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Genius API bearer token
    pub genius_access_token: String,
    /// Musixmatch API key
    pub musixmatch_api_key: String,
    /// Songwriters whose catalogs are searched for new songs
    pub writers: Vec<String>,
    /// Location of the JSON catalog snapshot
    pub catalog_path: PathBuf,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            genius_access_token: String::new(),
            musixmatch_api_key: String::new(),
            writers: DEFAULT_WRITERS.iter().map(|w| (*w).to_string()).collect(),
            catalog_path: default_catalog_path(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[allow(clippy::unnecessary_wraps)] // Returns Result for forward-compatible API
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(token) = env::var("GENIUS_ACCESS_TOKEN") {
            config.genius_access_token = token;
        }

        if let Ok(key) = env::var("MUSIXMATCH_API_KEY") {
            config.musixmatch_api_key = key;
        }

        if let Ok(writers) = env::var("SONGBASE_WRITERS") {
            let parsed = parse_writers(&writers);
            if !parsed.is_empty() {
                config.writers = parsed;
            }
        }

        if let Ok(path) = env::var("SONGBASE_CATALOG") {
            config.catalog_path = PathBuf::from(shellexpand::tilde(&path).to_string());
        }

        Ok(config)
    }

    /// Check if Genius is configured
    pub const fn has_genius_credentials(&self) -> bool {
        !self.genius_access_token.is_empty()
    }

    /// Check if Musixmatch is configured
    pub const fn has_musixmatch_credentials(&self) -> bool {
        !self.musixmatch_api_key.is_empty()
    }
}

/// Split a comma-separated writer list, dropping blanks.
fn parse_writers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Platform data directory, falling back to the working directory.
fn default_catalog_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("songbase_catalog.json"),
        |d| d.join("songbase").join("catalog.json"),
    )
}
