//! Genius integration.
//!
//! Song discovery through the Genius search API, release and writer credits
//! from song details, and lyrics scraped from the public song page.

/// API client for Genius requests
pub mod api;
/// Discovery feed and lyrics source
pub mod feed;
/// Lyrics extraction from song pages
pub mod page;

// Re-export key components
pub use api::{GeniusClient, SearchPage};
pub use feed::{GeniusFeed, GeniusLyrics};
