//! Catalog persistence.
//!
//! Each capability the ingest driver needs is a narrow async trait. A
//! [`Catalog`] bundles one typed handle per capability and is built once at
//! startup. Identity, uniqueness and atomicity belong to the implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::sources::{ExternalRef, ReleaseRecord, WriterRecord};
use crate::types::{LineId, ReleaseId, SectionId, SectionType, SongId, WordId, WriterId};

/// In-memory catalog with JSON snapshots
pub mod memory;

pub use memory::MemoryCatalog;

/// A song row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    /// Provider reference for the song.
    pub external: ExternalRef,
    /// Song title.
    pub title: String,
    /// Primary artist.
    pub artist: String,
    /// Release the song belongs to, if known.
    pub release: Option<ReleaseId>,
}

/// Song lookup and insertion.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Whether a song with this title and artist (and release title, when
    /// given) is already stored. Comparison ignores case.
    async fn song_exists(&self, title: &str, artist: &str, release_title: Option<&str>) -> Result<bool>;

    /// Insert a song row.
    async fn save_song(&self, song: NewSong) -> Result<SongId>;
}

/// Release upserts.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Return the release with the same provider reference, inserting it first if needed.
    async fn save_release_if_not_exists(&self, release: &ReleaseRecord) -> Result<ReleaseId>;
}

/// Writer upserts and song credits.
#[async_trait]
pub trait WriterStore: Send + Sync {
    /// Return the writer with the same name (ignoring case), inserting it first if needed.
    async fn save_writer_if_not_exists(&self, writer: &WriterRecord) -> Result<WriterId>;

    /// Credit a writer on a song; crediting twice is a no-op.
    async fn link_writer(&self, writer: WriterId, song: SongId) -> Result<()>;
}

/// Section insertion.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Insert a section at a 1-based position within its song.
    async fn save_section(&self, song: SongId, order: u32, section_type: SectionType) -> Result<SectionId>;
}

/// Line insertion.
#[async_trait]
pub trait LineStore: Send + Sync {
    /// Insert a line at a 1-based position within its section.
    async fn save_line(&self, section: SectionId, order: u32, text: &str) -> Result<LineId>;
}

/// Catalog-wide word set.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Look up a word by exact text.
    async fn find_word(&self, text: &str) -> Result<Option<WordId>>;

    /// Create the word if new, then associate it with the line.
    async fn save_or_merge_word(&self, text: &str, line: LineId) -> Result<WordId>;
}

/// Typed handles to every persistence capability.
#[derive(Clone)]
pub struct Catalog {
    /// Songs
    pub songs: Arc<dyn SongStore>,
    /// Releases
    pub releases: Arc<dyn ReleaseStore>,
    /// Writers
    pub writers: Arc<dyn WriterStore>,
    /// Sections
    pub sections: Arc<dyn SectionStore>,
    /// Lines
    pub lines: Arc<dyn LineStore>,
    /// Words
    pub words: Arc<dyn WordStore>,
}

impl Catalog {
    /// Use one store for every capability.
    pub fn from_store<S>(store: &Arc<S>) -> Self
    where
        S: SongStore + ReleaseStore + WriterStore + SectionStore + LineStore + WordStore + 'static,
    {
        Self {
            songs: Arc::clone(store) as Arc<dyn SongStore>,
            releases: Arc::clone(store) as Arc<dyn ReleaseStore>,
            writers: Arc::clone(store) as Arc<dyn WriterStore>,
            sections: Arc::clone(store) as Arc<dyn SectionStore>,
            lines: Arc::clone(store) as Arc<dyn LineStore>,
            words: Arc::clone(store) as Arc<dyn WordStore>,
        }
    }
}

/// Names of the catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    /// `songs`
    Songs,
    /// `releases`
    Releases,
    /// `writers`
    Writers,
    /// `sections`
    Sections,
    /// `lines`
    Lines,
    /// `words`
    Words,
}

impl TableName {
    /// All tables, parents before children.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Releases, Self::Songs, Self::Writers, Self::Sections, Self::Lines, Self::Words]
    }

    /// The table's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Releases => "releases",
            Self::Writers => "writers",
            Self::Sections => "sections",
            Self::Lines => "lines",
            Self::Words => "words",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name() == wanted || t.name().strip_suffix('s') == Some(wanted.as_str()))
            .ok_or_else(|| Error::UnrecognizedTable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_table_name_parse() {
        assert_eq!("songs".parse::<TableName>().unwrap(), TableName::Songs);
        assert_eq!(" Word ".parse::<TableName>().unwrap(), TableName::Words);
        assert_eq!("SECTIONS".parse::<TableName>().unwrap(), TableName::Sections);
    }

    #[test]
    fn test_unknown_table_rejected() {
        match "external_source".parse::<TableName>() {
            Err(Error::UnrecognizedTable(name)) => assert_eq!(name, "external_source"),
            other => panic!("Expected UnrecognizedTable, got {other:?}"),
        }
    }
}
