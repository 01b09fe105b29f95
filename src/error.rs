//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! The lyric segmenter and tokenizer never fail; everything here comes from
//! providers, persistence or the ingest driver's save-time validation.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog or lyrics provider error with status context
    #[error("{provider} API error: {message}")]
    Provider {
        /// Provider name, e.g. `Genius`.
        provider: &'static str,
        /// Human-readable error description.
        message: String,
        /// HTTP (or envelope) status code, if known.
        status: Option<u16>,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Response or file parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Segmentation produced no sections, so there is nothing to save
    #[error("No lyric sections found for \"{title}\"")]
    EmptyLyrics {
        /// Title of the song being saved.
        title: String,
    },

    /// A required song field was missing at save time
    #[error("Incomplete song data for \"{title}\": missing {missing}")]
    IncompleteSongData {
        /// Title of the song being saved (may be empty).
        title: String,
        /// Comma-separated list of the missing fields.
        missing: String,
    },

    /// A catalog table was requested by a name that does not exist
    #[error("Table '{0}' is not recognised")]
    UnrecognizedTable(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a provider error without status
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status: None,
            hint: None,
        }
    }

    /// Create a provider error with HTTP status
    pub fn provider_status(provider: &'static str, message: impl Into<String>, status: u16) -> Self {
        let hint = match status {
            401 => Some("Check GENIUS_ACCESS_TOKEN and MUSIXMATCH_API_KEY environment variables"),
            402 => Some("The API plan usage limit has been reached"),
            403 => Some("Your API credentials may lack required permissions"),
            404 => Some("The requested resource was not found"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("Provider server error - try again later"),
            _ => None,
        };
        Self::Provider {
            provider,
            message: message.into(),
            status: Some(status),
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}
