use reqwest::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;

use crate::config::Config;
use crate::constants::{http, musixmatch};
use crate::error::{Error, Result};
use crate::sources::types::parse_release_date;
use crate::sources::{CatalogTrack, ExternalRef, ReleaseRecord};
use crate::types::ExternalSourceKind;

const PROVIDER: &str = "Musixmatch";

/// Client for accessing the Musixmatch API
///
/// Every response is wrapped in a `message.header` envelope whose
/// `status_code` can fail independently of the HTTP status.
#[derive(Clone)]
pub struct MusixmatchClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl MusixmatchClient {
    /// Create a new Musixmatch client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, musixmatch::BASE_URL)
    }

    /// Create a client against a different API root (e.g. a local mock)
    pub fn with_base_url(config: &Config, base_url: impl Into<String>) -> Self {
        Self {
            api_key: config.musixmatch_api_key.clone(),
            base_url: base_url.into(),
            client: Client::builder()
                .timeout(StdDuration::from_secs(http::TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Call an API method, returning the raw envelope
    async fn call(&self, method: &str, query: &[(&str, &str)]) -> Result<Value> {
        if self.api_key.is_empty() {
            return Err(Error::config(
                "Musixmatch client not configured",
                "Set the MUSIXMATCH_API_KEY environment variable",
            ));
        }

        let url = format!("{}/{}", self.base_url, method);
        let resp = self.client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {method} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::provider_status(
                PROVIDER,
                format!("Request to {method} returned {status}"),
                status.as_u16(),
            ));
        }

        resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from {method}: {e}"), None))
    }

    /// Fetch one page of tracks credited to a writer
    ///
    /// A non-200 envelope ends discovery rather than failing it.
    pub async fn search_page(&self, writer: &str, page: usize) -> Result<Vec<CatalogTrack>> {
        let page = page.to_string();
        let page_size = musixmatch::PAGE_SIZE.to_string();
        let json = self.call("track.search", &[
            ("q_writer", writer),
            ("page", &page),
            ("page_size", &page_size),
        ]).await?;

        let status = envelope_status(&json);
        if status != 200 {
            tracing::warn!("Musixmatch track.search for '{writer}' returned status {status}");
            return Ok(Vec::new());
        }

        Ok(parse_track_list(&json))
    }

    /// Fetch full release details for an album id
    pub async fn release(&self, album_id: u64) -> Result<ReleaseRecord> {
        let id = album_id.to_string();
        let json = self.call("album.get", &[("album_id", &id)]).await?;

        let status = envelope_status(&json);
        if status != 200 {
            return Err(Error::provider_status(
                PROVIDER,
                format!("Invalid API response for album {album_id}"),
                status,
            ));
        }

        parse_album(&json["message"]["body"]["album"])
            .ok_or_else(|| Error::provider(PROVIDER, format!("Album {album_id} missing from response")))
    }

    /// Fetch the lyrics body for a track
    pub async fn lyrics(&self, track_id: &str) -> Result<Vec<String>> {
        let json = self.call("track.lyrics.get", &[("track_id", track_id)]).await?;

        let status = envelope_status(&json);
        if status != 200 {
            return Err(Error::provider_status(
                PROVIDER,
                format!("No lyrics for track {track_id}"),
                status,
            ));
        }

        let body = json["message"]["body"]["lyrics"]["lyrics_body"].as_str().unwrap_or_default();
        Ok(lyrics_body_lines(body))
    }
}

/// The `status_code` from a response envelope, 0 if absent
fn envelope_status(json: &Value) -> u16 {
    json["message"]["header"]["status_code"]
        .as_u64()
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0)
}

/// Parse `body.track_list[].track` into tracks
fn parse_track_list(json: &Value) -> Vec<CatalogTrack> {
    json["message"]["body"]["track_list"].as_array()
        .map(|list| list.iter().filter_map(|entry| parse_track(&entry["track"])).collect())
        .unwrap_or_default()
}

fn parse_track(track: &Value) -> Option<CatalogTrack> {
    let id = track["track_id"].as_u64()?;
    let title = track["track_name"].as_str()?.to_string();
    let artist = track["artist_name"].as_str()?.to_string();
    let endpoint = track["track_share_url"].as_str()
        .map_or_else(|| format!("track.get?track_id={id}"), String::from);

    // Only id and title are known until album.get is called
    let release = track["album_id"].as_u64().filter(|&a| a != 0).map(|album_id| ReleaseRecord {
        external: ExternalRef::new(
            ExternalSourceKind::Musixmatch,
            album_id,
            format!("album.get?album_id={album_id}"),
        ),
        title: track["album_name"].as_str().unwrap_or_default().to_string(),
        artist: artist.clone(),
        release_date: None,
        label: None,
    });

    Some(CatalogTrack {
        external: ExternalRef::new(ExternalSourceKind::Musixmatch, id, endpoint),
        title,
        artist,
        lyrics_locator: id.to_string(),
        release,
        writers: Vec::new(),
    })
}

fn parse_album(album: &Value) -> Option<ReleaseRecord> {
    let id = album["album_id"].as_u64()?;
    let title = album["album_name"].as_str()?.to_string();

    Some(ReleaseRecord {
        external: ExternalRef::new(
            ExternalSourceKind::Musixmatch,
            id,
            format!("album.get?album_id={id}"),
        ),
        title,
        artist: album["artist_name"].as_str().unwrap_or_default().to_string(),
        release_date: parse_release_date(album["album_release_date"].as_str()),
        label: album["album_label"].as_str().filter(|l| !l.is_empty()).map(String::from),
    })
}

/// Split a lyrics body into lines, dropping the trailing usage disclaimer.
///
/// Blank lines separate stanzas here, so they become `|` break markers.
fn lyrics_body_lines(body: &str) -> Vec<String> {
    let mut lines: Vec<&str> = body.lines().collect();
    if let Some(pos) = lines.iter().position(|l| l.trim_start().starts_with(musixmatch::DISCLAIMER_PREFIX)) {
        lines.truncate(pos);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|l| if l.trim().is_empty() { "|".to_string() } else { l.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_envelope_status() {
        assert_eq!(envelope_status(&json!({ "message": { "header": { "status_code": 401 } } })), 401);
        assert_eq!(envelope_status(&json!({})), 0);
    }

    #[test]
    fn test_parse_track_list() {
        let json = json!({
            "message": {
                "header": { "status_code": 200 },
                "body": {
                    "track_list": [
                        { "track": {
                            "track_id": 15445219,
                            "track_name": "Shake It Off",
                            "artist_name": "Taylor Swift",
                            "album_id": 20940133,
                            "album_name": "1989",
                            "track_share_url": "https://www.musixmatch.com/lyrics/Taylor-Swift/Shake-It-Off"
                        } },
                        { "track": { "track_id": 2, "track_name": "No album", "artist_name": "X", "album_id": 0 } },
                        { "track": { "track_name": "No id" } }
                    ]
                }
            }
        });

        let tracks = parse_track_list(&json);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].lyrics_locator, "15445219");
        assert_eq!(tracks[0].release_title(), Some("1989"));
        assert_eq!(tracks[0].external.source, ExternalSourceKind::Musixmatch);
        assert!(tracks[1].release.is_none());
        assert_eq!(tracks[1].external.endpoint, "track.get?track_id=2");
    }

    #[test]
    fn test_parse_album() {
        let album = json!({
            "album_id": 20940133,
            "album_name": "1989",
            "artist_name": "Taylor Swift",
            "album_release_date": "2014-10-27",
            "album_label": ""
        });
        let release = parse_album(&album).unwrap();
        assert_eq!(release.title, "1989");
        assert_eq!(release.release_date, NaiveDate::from_ymd_opt(2014, 10, 27));
        assert!(release.label.is_none());
    }

    #[test]
    fn test_lyrics_body_lines_strips_disclaimer() {
        let body = "I stay out too late\nGot nothing in my brain\n\n...\n\n******* This Lyrics is NOT for Commercial use *******\n(1409623046248)";
        assert_eq!(
            lyrics_body_lines(body),
            vec!["I stay out too late", "Got nothing in my brain", "|", "..."]
        );
        assert!(lyrics_body_lines("").is_empty());
    }
}
