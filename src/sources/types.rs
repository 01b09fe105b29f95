//! Provider-neutral catalog records.
//!
//! Each provider client converts its own JSON into these types, so the
//! ingest driver never touches a provider schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ExternalSourceKind;

/// Where a record came from and how to fetch it again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalRef {
    /// Provider the record was imported from.
    pub source: ExternalSourceKind,
    /// The provider's own identifier.
    pub external_id: u64,
    /// API path or URL of the record at the provider.
    pub endpoint: String,
}

impl ExternalRef {
    /// Create a new external reference.
    pub fn new(source: ExternalSourceKind, external_id: u64, endpoint: impl Into<String>) -> Self {
        Self {
            source,
            external_id,
            endpoint: endpoint.into(),
        }
    }
}

/// A song discovered in a provider catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    /// Provider reference for the song itself.
    pub external: ExternalRef,
    /// Song title.
    pub title: String,
    /// Primary artist name.
    pub artist: String,
    /// What the lyrics source needs to fetch this song's lyrics.
    pub lyrics_locator: String,
    /// Release (album) the song appears on, if known.
    pub release: Option<ReleaseRecord>,
    /// Credited songwriters.
    pub writers: Vec<WriterRecord>,
}

impl CatalogTrack {
    /// Title of the release, if any.
    pub fn release_title(&self) -> Option<&str> {
        self.release.as_ref().map(|r| r.title.as_str())
    }
}

/// A release (album, single, EP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Provider reference for the release.
    pub external: ExternalRef,
    /// Release title.
    pub title: String,
    /// Release artist.
    pub artist: String,
    /// Release date, when the provider knows it.
    pub release_date: Option<NaiveDate>,
    /// Record label.
    pub label: Option<String>,
}

/// A credited songwriter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterRecord {
    /// Provider reference for the writer.
    pub external: ExternalRef,
    /// Writer name as credited.
    pub name: String,
}

/// Parse a provider date, accepting `YYYY-MM-DD` only.
pub(crate) fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}
