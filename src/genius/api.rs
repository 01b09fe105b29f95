use reqwest::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;

use crate::config::Config;
use crate::constants::{genius, http};
use crate::error::{Error, Result};
use crate::sources::types::parse_release_date;
use crate::sources::{CatalogTrack, ExternalRef, ReleaseRecord, WriterRecord};
use crate::types::ExternalSourceKind;

const PROVIDER: &str = "Genius";

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Number of hits of any kind (songs, videos, articles) on the page.
    pub hits: usize,
    /// The song hits, in result order.
    pub tracks: Vec<CatalogTrack>,
}

impl SearchPage {
    /// No hits at all: the result set has run out.
    pub const fn is_last(&self) -> bool {
        self.hits == 0
    }
}

/// Client for accessing the Genius API and song pages
#[derive(Clone)]
pub struct GeniusClient {
    access_token: String,
    base_url: String,
    client: Client,
}

impl GeniusClient {
    /// Create a new Genius client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, genius::BASE_URL)
    }

    /// Create a client against a different API root (e.g. a local mock)
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Self {
        Self {
            access_token: config.genius_access_token.clone(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(StdDuration::from_secs(http::TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Check if credentials are configured
    fn is_configured(&self) -> bool {
        !self.access_token.is_empty()
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(Error::config(
                "Genius client not configured",
                "Set the GENIUS_ACCESS_TOKEN environment variable",
            ))
        }
    }

    /// Make an authenticated GET request with query parameters
    async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.ensure_configured()?;

        let url = format!("{}{}", self.base_url, path);
        let resp = self.client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {path} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::provider_status(
                PROVIDER,
                format!("Request to {path} returned {status}"),
                status.as_u16(),
            ));
        }

        resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from {path}: {e}"), None))
    }

    /// Fetch one page of search results, keeping only song hits
    pub async fn search_page(&self, query: &str, page: usize) -> Result<SearchPage> {
        let per_page = genius::PAGE_SIZE.to_string();
        let page = page.to_string();
        let json = self.get_with_query("/search", &[
            ("q", query),
            ("per_page", &per_page),
            ("page", &page),
        ]).await?;

        parse_search_hits(&json)
    }

    /// Find the song whose primary artist and title match exactly (ignoring case)
    pub async fn search(&self, artist: &str, title: &str) -> Result<Option<CatalogTrack>> {
        let query = format!("{artist} {title}");
        let json = self.get_with_query("/search", &[("q", &query)]).await?;

        Ok(find_song(parse_search_hits(&json)?.tracks, artist, title))
    }

    /// Load release and writer credits for a discovered song
    pub async fn song_details(&self, track: CatalogTrack) -> Result<CatalogTrack> {
        let path = format!("/songs/{}", track.external.external_id);
        let json = self.get_with_query(&path, &[("text_format", "plain")]).await?;

        let song = &json["response"]["song"];
        if !song.is_object() {
            return Err(Error::parse(format!("Missing 'song' in {path} response"), None));
        }

        Ok(apply_song_details(track, song))
    }

    /// Fetch a public song page as HTML
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::provider_status(
                PROVIDER,
                format!("Page {url} returned {status}"),
                status.as_u16(),
            ));
        }

        resp.text().await
            .map_err(|e| Error::Network(format!("Failed to read page {url}: {e}")))
    }
}

/// Parse the `hits` of a search response into a page of tracks
pub(crate) fn parse_search_hits(json: &Value) -> Result<SearchPage> {
    let hits = json["response"]["hits"].as_array()
        .ok_or_else(|| Error::parse("Missing 'hits' array in search response", None))?;

    let tracks = hits.iter()
        .filter(|hit| hit["type"].as_str() == Some("song") || hit["result"]["_type"].as_str() == Some("song"))
        .filter_map(|hit| parse_song(&hit["result"]))
        .collect();

    Ok(SearchPage { hits: hits.len(), tracks })
}

/// First track whose primary artist and title both match, ignoring case
fn find_song(tracks: Vec<CatalogTrack>, artist: &str, title: &str) -> Option<CatalogTrack> {
    let artist = artist.trim().to_lowercase();
    let title = title.trim().to_lowercase();
    tracks
        .into_iter()
        .find(|t| t.artist.to_lowercase() == artist && t.title.to_lowercase() == title)
}

/// Parse a song object (search result or song detail)
fn parse_song(song: &Value) -> Option<CatalogTrack> {
    let id = song["id"].as_u64()?;
    let title = song["title"].as_str()?.to_string();
    let artist = song["primary_artist"]["name"].as_str()
        .or_else(|| song["artist_names"].as_str())?
        .to_string();
    let url = song["url"].as_str()?.to_string();
    let endpoint = song["api_path"].as_str()
        .map_or_else(|| format!("/songs/{id}"), String::from);

    Some(CatalogTrack {
        external: ExternalRef::new(ExternalSourceKind::Genius, id, endpoint),
        title,
        artist,
        lyrics_locator: url,
        release: None,
        writers: Vec::new(),
    })
}

/// Merge album and writer credits from a song detail object
fn apply_song_details(mut track: CatalogTrack, song: &Value) -> CatalogTrack {
    track.release = parse_album(&song["album"], song);
    track.writers = song["writer_artists"].as_array()
        .map(|writers| writers.iter().filter_map(parse_writer).collect())
        .unwrap_or_default();
    track
}

/// Parse a song's album, falling back to song-level dates and artist
fn parse_album(album: &Value, song: &Value) -> Option<ReleaseRecord> {
    let id = album["id"].as_u64()?;
    let title = album["name"].as_str()?.to_string();
    let endpoint = album["api_path"].as_str()
        .map_or_else(|| format!("/albums/{id}"), String::from);
    let artist = album["primary_artist_names"].as_str()
        .or_else(|| album["artist"]["name"].as_str())
        .or_else(|| song["primary_artist"]["name"].as_str())
        .unwrap_or_default()
        .to_string();
    let release_date = parse_release_date(album["release_date"].as_str())
        .or_else(|| parse_release_date(song["release_date"].as_str()));

    Some(ReleaseRecord {
        external: ExternalRef::new(ExternalSourceKind::Genius, id, endpoint),
        title,
        artist,
        release_date,
        label: album["label"].as_str().map(String::from),
    })
}

fn parse_writer(writer: &Value) -> Option<WriterRecord> {
    let id = writer["id"].as_u64()?;
    let name = writer["name"].as_str()?.to_string();
    let endpoint = writer["url"].as_str()
        .or_else(|| writer["api_path"].as_str())
        .unwrap_or_default()
        .to_string();

    Some(WriterRecord {
        external: ExternalRef::new(ExternalSourceKind::Genius, id, endpoint),
        name,
    })
}
