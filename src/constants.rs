//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Genius API constants.
pub mod genius {
    /// Base URL of the Genius REST API.
    pub const BASE_URL: &str = "https://api.genius.com";

    /// Search results requested per page while discovering songs.
    pub const PAGE_SIZE: usize = 48;
}

/// Musixmatch API constants.
pub mod musixmatch {
    /// Base URL of the Musixmatch REST API.
    pub const BASE_URL: &str = "https://api.musixmatch.com/ws/1.1";

    /// Tracks requested per page while discovering songs.
    pub const PAGE_SIZE: usize = 10;

    /// Prefix of the disclaimer lines appended to free-tier lyrics.
    pub const DISCLAIMER_PREFIX: &str = "*******";
}

/// HTTP client constants.
pub mod http {
    /// Request timeout in seconds for all provider calls.
    pub const TIMEOUT_SECS: u64 = 30;
}
