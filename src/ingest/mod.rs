//! Song ingest pipeline.
//!
//! Pulls candidates from a [`SongFeed`], skips songs already in the catalog,
//! fetches lyrics from a [`LyricsSource`] and stores the song as
//! section → line → word rows. Any provider or storage failure aborts the
//! current song and is returned to the caller; atomicity is the catalog
//! implementation's concern.

use crate::catalog::{Catalog, NewSong};
use crate::error::{Error, Result};
use crate::lyrics::{segment, tokenize, Section};
use crate::sources::{CatalogTrack, LyricsSource, SongFeed};
use crate::types::SongId;

/// Save-time section type resolution
pub mod section_types;

pub use section_types::resolve_section_types;

/// Summary of one stored song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Catalog id of the new song.
    pub song: SongId,
    /// Song title.
    pub title: String,
    /// Primary artist.
    pub artist: String,
    /// Sections stored.
    pub sections: usize,
    /// Lines stored.
    pub lines: usize,
    /// Word associations made (one per distinct word per line).
    pub words: usize,
}

/// Counts from storing a song's lyrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LyricsCounts {
    /// Sections stored.
    pub sections: usize,
    /// Lines stored.
    pub lines: usize,
    /// Word associations made.
    pub words: usize,
}

/// Drives discovery, lyrics fetching and storage for one song at a time.
pub struct SongIngestor {
    feed: Box<dyn SongFeed>,
    lyrics: Box<dyn LyricsSource>,
    catalog: Catalog,
}

impl SongIngestor {
    /// Create an ingestor over the given collaborators
    pub fn new(feed: Box<dyn SongFeed>, lyrics: Box<dyn LyricsSource>, catalog: Catalog) -> Self {
        Self { feed, lyrics, catalog }
    }

    /// Ingest the next song the catalog does not have yet.
    ///
    /// Returns `Ok(None)` once the feed is exhausted.
    pub async fn ingest_next(&mut self) -> Result<Option<IngestReport>> {
        let Some(track) = self.select_song().await? else {
            tracing::info!("{} feed exhausted without a new song", self.feed.name());
            return Ok(None);
        };

        tracing::info!("Fetching lyrics for \"{}\" by {}", track.title, track.artist);
        let lines = self.lyrics.fetch_lyrics_lines(&track.lyrics_locator).await?;

        self.save_song(&track, &lines).await.map(Some)
    }

    /// Next candidate that is not already stored, with details filled in.
    pub async fn select_song(&mut self) -> Result<Option<CatalogTrack>> {
        while let Some(candidate) = self.feed.next_candidate().await? {
            let track = self.feed.enrich(candidate).await?;
            let exists = self.catalog.songs
                .song_exists(&track.title, &track.artist, track.release_title())
                .await?;

            if exists {
                tracing::debug!("Skipping \"{}\" by {}: already in catalog", track.title, track.artist);
                continue;
            }
            return Ok(Some(track));
        }
        Ok(None)
    }

    /// Validate and store a song with its release, writers and lyrics.
    pub async fn save_song(&self, track: &CatalogTrack, lines: &[String]) -> Result<IngestReport> {
        validate(track, lines)?;

        let sections = segment(lines);
        if sections.is_empty() {
            return Err(Error::EmptyLyrics { title: track.title.clone() });
        }

        let release = match &track.release {
            Some(record) => Some(self.catalog.releases.save_release_if_not_exists(record).await?),
            None => None,
        };

        let song = self.catalog.songs.save_song(NewSong {
            external: track.external.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            release,
        }).await?;

        for record in &track.writers {
            let writer = self.catalog.writers.save_writer_if_not_exists(record).await?;
            self.catalog.writers.link_writer(writer, song).await?;
        }

        let counts = self.save_lyrics(song, &sections).await?;
        tracing::info!(
            "Saved \"{}\" by {}: {} sections, {} lines, {} words",
            track.title, track.artist, counts.sections, counts.lines, counts.words
        );

        Ok(IngestReport {
            song,
            title: track.title.clone(),
            artist: track.artist.clone(),
            sections: counts.sections,
            lines: counts.lines,
            words: counts.words,
        })
    }

    /// Store sections, lines and words for an already saved song.
    pub async fn save_lyrics(&self, song: SongId, sections: &[Section]) -> Result<LyricsCounts> {
        let types = resolve_section_types(sections);
        let mut counts = LyricsCounts::default();

        for (section, section_type) in sections.iter().zip(types) {
            let section_id = self.catalog.sections
                .save_section(song, section.order, section_type)
                .await?;
            counts.sections += 1;

            for (order, text) in (1u32..).zip(&section.lines) {
                let line = self.catalog.lines.save_line(section_id, order, text).await?;
                counts.lines += 1;

                for word in tokenize(text) {
                    self.catalog.words.save_or_merge_word(&word, line).await?;
                    counts.words += 1;
                }
            }
        }

        Ok(counts)
    }
}

/// Fail fast when title, artist or lyrics are missing.
fn validate(track: &CatalogTrack, lines: &[String]) -> Result<()> {
    let mut missing = Vec::new();
    if track.title.trim().is_empty() {
        missing.push("title");
    }
    if track.artist.trim().is_empty() {
        missing.push("artist");
    }
    if lines.iter().all(|l| l.trim().is_empty()) {
        missing.push("lyrics");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::IncompleteSongData {
            title: track.title.clone(),
            missing: missing.join(", "),
        })
    }
}
