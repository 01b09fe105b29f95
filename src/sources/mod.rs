//! Song discovery and lyrics source abstractions.
//!
//! The ingest driver only sees these traits; the Genius and Musixmatch
//! clients implement them.

use async_trait::async_trait;

use crate::error::Result;

/// Provider-neutral catalog records
pub mod types;

pub use types::{CatalogTrack, ExternalRef, ReleaseRecord, WriterRecord};

/// Iterator-style feed of candidate songs.
#[async_trait]
pub trait SongFeed: Send + Sync {
    /// Next candidate, or `None` once the feed is exhausted.
    async fn next_candidate(&mut self) -> Result<Option<CatalogTrack>>;

    /// Fill in details (release, writers) the discovery call did not return.
    async fn enrich(&self, track: CatalogTrack) -> Result<CatalogTrack> {
        Ok(track)
    }

    /// Get the name of this feed (for logging).
    fn name(&self) -> &'static str;
}

/// Source of plain-text lyric lines.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Fetch the ordered raw lines for a song.
    ///
    /// Lines are free of markup; `[Header]` lines, blank lines and lone `|`
    /// break markers are passed through for segmentation.
    async fn fetch_lyrics_lines(&self, locator: &str) -> Result<Vec<String>>;
}
