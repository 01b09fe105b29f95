use std::collections::VecDeque;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::api::MusixmatchClient;
use crate::error::{Error, Result};
use crate::sources::{CatalogTrack, LyricsSource, SongFeed};

/// Pages through Musixmatch tracks credited to one songwriter.
pub struct MusixmatchFeed {
    client: MusixmatchClient,
    writer: String,
    next_page: usize,
    pending: VecDeque<CatalogTrack>,
    exhausted: bool,
}

impl MusixmatchFeed {
    /// Create a feed for the given songwriter
    pub fn new(client: MusixmatchClient, writer: impl Into<String>) -> Self {
        Self {
            client,
            writer: writer.into(),
            next_page: 1,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Create a feed for a randomly chosen songwriter
    pub fn for_random_writer(client: MusixmatchClient, writers: &[String]) -> Result<Self> {
        let writer = writers.choose(&mut rand::thread_rng()).ok_or_else(|| {
            Error::config("No songwriters configured", "Set SONGBASE_WRITERS to a comma-separated list")
        })?;
        tracing::info!("Searching Musixmatch for tracks written by {writer}");
        Ok(Self::new(client, writer.clone()))
    }
}

#[async_trait]
impl SongFeed for MusixmatchFeed {
    async fn next_candidate(&mut self) -> Result<Option<CatalogTrack>> {
        loop {
            if let Some(track) = self.pending.pop_front() {
                return Ok(Some(track));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self.next_page;
            self.next_page += 1;

            let tracks = self.client.search_page(&self.writer, page).await?;
            if tracks.is_empty() {
                tracing::info!("Musixmatch tracks for '{}' exhausted after {} pages", self.writer, page - 1);
                self.exhausted = true;
            }
            self.pending.extend(tracks);
        }
    }

    async fn enrich(&self, mut track: CatalogTrack) -> Result<CatalogTrack> {
        if let Some(album_id) = track.release.as_ref().map(|r| r.external.external_id) {
            track.release = Some(self.client.release(album_id).await?);
        }
        Ok(track)
    }

    fn name(&self) -> &'static str {
        "Musixmatch"
    }
}

/// Reads lyrics bodies from Musixmatch by track id.
pub struct MusixmatchLyrics {
    client: MusixmatchClient,
}

impl MusixmatchLyrics {
    /// Create a lyrics source backed by the given client
    pub const fn new(client: MusixmatchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LyricsSource for MusixmatchLyrics {
    async fn fetch_lyrics_lines(&self, locator: &str) -> Result<Vec<String>> {
        self.client.lyrics(locator).await
    }
}
