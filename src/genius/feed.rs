use std::collections::VecDeque;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::api::{GeniusClient, SearchPage};
use super::page::lyrics_lines;
use crate::error::{Error, Result};
use crate::sources::{CatalogTrack, LyricsSource, SongFeed};

/// Pages through Genius search results for one songwriter.
pub struct GeniusFeed {
    client: GeniusClient,
    query: String,
    next_page: usize,
    pending: VecDeque<CatalogTrack>,
    exhausted: bool,
}

impl GeniusFeed {
    /// Create a feed searching for the given query
    pub fn new(client: GeniusClient, query: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
            next_page: 1,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Create a feed for a randomly chosen songwriter
    pub fn for_random_writer(client: GeniusClient, writers: &[String]) -> Result<Self> {
        let writer = writers.choose(&mut rand::thread_rng()).ok_or_else(|| {
            Error::config("No songwriters configured", "Set SONGBASE_WRITERS to a comma-separated list")
        })?;
        tracing::info!("Searching Genius for songs by {writer}");
        Ok(Self::new(client, writer.clone()))
    }

    /// The search query this feed pages through
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Queue a page's songs; a page without any hits ends the feed.
    fn absorb(&mut self, page_number: usize, page: SearchPage) {
        tracing::debug!(
            "Genius page {page_number} for '{}' returned {} hits, {} songs",
            self.query,
            page.hits,
            page.tracks.len()
        );
        if page.is_last() {
            tracing::info!("Genius results for '{}' exhausted after {} pages", self.query, page_number - 1);
            self.exhausted = true;
        }
        self.pending.extend(page.tracks);
    }
}

#[async_trait]
impl SongFeed for GeniusFeed {
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

            let results = self.client.search_page(&self.query, page).await?;
            self.absorb(page, results);
        }
    }

    async fn enrich(&self, track: CatalogTrack) -> Result<CatalogTrack> {
        self.client.song_details(track).await
    }

    fn name(&self) -> &'static str {
        "Genius"
    }
}

/// Reads lyrics from Genius song pages.
pub struct GeniusLyrics {
    client: GeniusClient,
}

impl GeniusLyrics {
    /// Create a lyrics source backed by the given client
    pub const fn new(client: GeniusClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LyricsSource for GeniusLyrics {
    async fn fetch_lyrics_lines(&self, locator: &str) -> Result<Vec<String>> {
        let html = self.client.fetch_page(locator).await?;
        let lines = lyrics_lines(&html);
        if lines.is_empty() {
            tracing::warn!("No lyrics container found on {locator}");
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::config::Config;
    use crate::genius::api::parse_search_hits;
    use serde_json::json;

    fn page(hits: serde_json::Value) -> SearchPage {
        parse_search_hits(&json!({ "response": { "hits": hits } })).unwrap()
    }

    #[test]
    fn test_random_writer_requires_writers() {
        let client = GeniusClient::new(&Config::default());
        let result = GeniusFeed::for_random_writer(client, &[]);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_random_writer_picks_from_list() {
        let client = GeniusClient::new(&Config::default());
        let writers = vec!["robert pollard".to_string()];
        let feed = GeniusFeed::for_random_writer(client, &writers).unwrap();
        assert_eq!(feed.query(), "robert pollard");
        assert_eq!(feed.name(), "Genius");
    }

    #[tokio::test]
    async fn test_page_of_non_songs_keeps_feed_open() {
        let mut feed = GeniusFeed::new(GeniusClient::new(&Config::default()), "taylor swift");

        feed.absorb(1, page(json!([
            { "type": "video", "result": { "id": 5, "_type": "video" } },
            { "type": "article", "result": { "id": 6, "_type": "article" } }
        ])));
        assert!(!feed.exhausted);
        assert!(feed.pending.is_empty());

        feed.absorb(2, page(json!([{
            "type": "song",
            "result": {
                "id": 7,
                "title": "Love Story",
                "url": "https://genius.com/Taylor-swift-love-story-lyrics",
                "primary_artist": { "name": "Taylor Swift" }
            }
        }])));
        feed.absorb(3, page(json!([])));
        assert!(feed.exhausted);

        let track = feed.next_candidate().await.unwrap().expect("queued song");
        assert_eq!(track.title, "Love Story");
        assert!(feed.next_candidate().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_feed_surfaces_client_errors() {
        let client = GeniusClient::new(&Config::default());
        let mut feed = GeniusFeed::new(client, "taylor swift");
        assert!(feed.next_candidate().await.is_err());
    }
}
