//! Musixmatch integration.
//!
//! Song discovery by songwriter credit, release details and lyrics bodies
//! from the Musixmatch REST API.

/// API client for Musixmatch requests
pub mod api;
/// Discovery feed and lyrics source
pub mod feed;

pub use api::MusixmatchClient;
pub use feed::{MusixmatchFeed, MusixmatchLyrics};
