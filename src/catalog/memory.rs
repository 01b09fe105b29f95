//! In-memory catalog.
//!
//! Implements every store trait behind one lock and persists as a JSON
//! snapshot. Ids are row positions plus one, so they are stable across
//! save/load as long as rows are only appended.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    LineStore, NewSong, ReleaseStore, SectionStore, SongStore, TableName, WordStore, WriterStore,
};
use crate::error::{Error, Result};
use crate::sources::{ExternalRef, ReleaseRecord, WriterRecord};
use crate::types::{LineId, ReleaseId, SectionId, SectionType, SongId, WordId, WriterId};

/// Stored song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRow {
    /// Row id.
    pub id: SongId,
    /// Provider reference.
    pub external: ExternalRef,
    /// Title.
    pub title: String,
    /// Primary artist.
    pub artist: String,
    /// Release the song belongs to.
    pub release: Option<ReleaseId>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Stored release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRow {
    /// Row id.
    pub id: ReleaseId,
    /// Provider reference.
    pub external: ExternalRef,
    /// Title.
    pub title: String,
    /// Release artist.
    pub artist: String,
    /// Release date.
    pub release_date: Option<NaiveDate>,
    /// Record label.
    pub label: Option<String>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Stored writer and the songs they are credited on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterRow {
    /// Row id.
    pub id: WriterId,
    /// Provider reference.
    pub external: ExternalRef,
    /// Name as first credited.
    pub name: String,
    /// Credited songs.
    pub songs: Vec<SongId>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Stored section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRow {
    /// Row id.
    pub id: SectionId,
    /// Owning song.
    pub song: SongId,
    /// 1-based position within the song.
    pub order: u32,
    /// Resolved section type.
    #[serde(rename = "type")]
    pub section_type: SectionType,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Stored line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRow {
    /// Row id.
    pub id: LineId,
    /// Owning section.
    pub section: SectionId,
    /// 1-based position within the section.
    pub order: u32,
    /// Line text, verbatim.
    pub lyrics: String,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Stored word and every line it appears on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRow {
    /// Row id.
    pub id: WordId,
    /// Normalized word text.
    pub text: String,
    /// Lines containing the word, in association order.
    pub lines: Vec<LineId>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Time of the last association.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogState {
    songs: Vec<SongRow>,
    releases: Vec<ReleaseRow>,
    writers: Vec<WriterRow>,
    sections: Vec<SectionRow>,
    lines: Vec<LineRow>,
    words: Vec<WordRow>,
    /// Word text → row index (not serialized)
    #[serde(skip)]
    word_index: HashMap<String, usize>,
}

impl CatalogState {
    /// Rebuild lookup indexes (call after deserializing)
    fn reindex(&mut self) {
        self.word_index = self.words.iter()
            .enumerate()
            .map(|(idx, w)| (w.text.clone(), idx))
            .collect();
    }
}

/// Next 1-based id for a table of `len` rows.
fn next_id(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX).saturating_add(1)
}

/// Row index for a 1-based id, if it is in range.
fn row_index(id: u64, len: usize) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1).filter(|&idx| idx < len)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Thread-safe in-memory catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: RwLock<CatalogState>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot, or start empty if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No catalog snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let data = fs_err::read_to_string(path)?;
        let mut state: CatalogState = serde_json::from_str(&data)
            .map_err(|e| Error::parse(format!("Invalid catalog snapshot: {e}"), path.to_path_buf()))?;
        state.reindex();

        tracing::info!(
            "Loaded catalog from {}: {} songs, {} words",
            path.display(),
            state.songs.len(),
            state.words.len()
        );
        Ok(Self { state: RwLock::new(state) })
    }

    /// Write a snapshot, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = {
            let state = self.read()?;
            serde_json::to_string_pretty(&*state)
                .map_err(|e| Error::storage(format!("Failed to serialize catalog: {e}")))?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(path, json)?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>> {
        self.state.read().map_err(|_| Error::storage("catalog lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>> {
        self.state.write().map_err(|_| Error::storage("catalog lock poisoned"))
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: TableName) -> Result<usize> {
        let state = self.read()?;
        Ok(match table {
            TableName::Songs => state.songs.len(),
            TableName::Releases => state.releases.len(),
            TableName::Writers => state.writers.len(),
            TableName::Sections => state.sections.len(),
            TableName::Lines => state.lines.len(),
            TableName::Words => state.words.len(),
        })
    }

    /// All rows of a table as JSON.
    pub fn table_rows(&self, table: TableName) -> Result<Value> {
        let state = self.read()?;
        let rows = match table {
            TableName::Songs => serde_json::to_value(&state.songs),
            TableName::Releases => serde_json::to_value(&state.releases),
            TableName::Writers => serde_json::to_value(&state.writers),
            TableName::Sections => serde_json::to_value(&state.sections),
            TableName::Lines => serde_json::to_value(&state.lines),
            TableName::Words => serde_json::to_value(&state.words),
        };
        rows.map_err(|e| Error::storage(format!("Failed to serialize {table}: {e}")))
    }

    /// All stored songs.
    pub fn songs(&self) -> Result<Vec<SongRow>> {
        Ok(self.read()?.songs.clone())
    }

    /// All stored releases.
    pub fn releases(&self) -> Result<Vec<ReleaseRow>> {
        Ok(self.read()?.releases.clone())
    }

    /// All stored writers.
    pub fn writers(&self) -> Result<Vec<WriterRow>> {
        Ok(self.read()?.writers.clone())
    }

    /// Sections of a song, by order.
    pub fn sections_of(&self, song: SongId) -> Result<Vec<SectionRow>> {
        let state = self.read()?;
        let mut sections: Vec<_> = state.sections.iter().filter(|s| s.song == song).cloned().collect();
        sections.sort_by_key(|s| s.order);
        Ok(sections)
    }

    /// Lines of a section, by order.
    pub fn lines_of(&self, section: SectionId) -> Result<Vec<LineRow>> {
        let state = self.read()?;
        let mut lines: Vec<_> = state.lines.iter().filter(|l| l.section == section).cloned().collect();
        lines.sort_by_key(|l| l.order);
        Ok(lines)
    }

    /// A word row by exact text.
    pub fn word(&self, text: &str) -> Result<Option<WordRow>> {
        let state = self.read()?;
        Ok(state.word_index.get(text).and_then(|&idx| state.words.get(idx)).cloned())
    }

    /// Words associated with a line, sorted.
    pub fn words_of(&self, line: LineId) -> Result<Vec<String>> {
        let state = self.read()?;
        let mut words: Vec<_> = state.words.iter()
            .filter(|w| w.lines.contains(&line))
            .map(|w| w.text.clone())
            .collect();
        words.sort();
        Ok(words)
    }
}

#[async_trait]
impl SongStore for MemoryCatalog {
    async fn song_exists(&self, title: &str, artist: &str, release_title: Option<&str>) -> Result<bool> {
        let state = self.read()?;
        Ok(state.songs.iter().any(|song| {
            if !eq_ignore_case(&song.title, title) || !eq_ignore_case(&song.artist, artist) {
                return false;
            }
            match release_title {
                None => true,
                Some(wanted) => song.release
                    .and_then(|id| row_index(id.get(), state.releases.len()))
                    .is_some_and(|idx| eq_ignore_case(&state.releases[idx].title, wanted)),
            }
        }))
    }

    async fn save_song(&self, song: NewSong) -> Result<SongId> {
        let mut state = self.write()?;
        if let Some(release) = song.release {
            if row_index(release.get(), state.releases.len()).is_none() {
                return Err(Error::storage(format!("Release {release} does not exist")));
            }
        }

        let id = SongId(next_id(state.songs.len()));
        state.songs.push(SongRow {
            id,
            external: song.external,
            title: song.title,
            artist: song.artist,
            release: song.release,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl ReleaseStore for MemoryCatalog {
    async fn save_release_if_not_exists(&self, release: &ReleaseRecord) -> Result<ReleaseId> {
        let mut state = self.write()?;
        if let Some(existing) = state.releases.iter().find(|r| r.external == release.external) {
            return Ok(existing.id);
        }

        let id = ReleaseId(next_id(state.releases.len()));
        state.releases.push(ReleaseRow {
            id,
            external: release.external.clone(),
            title: release.title.clone(),
            artist: release.artist.clone(),
            release_date: release.release_date,
            label: release.label.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl WriterStore for MemoryCatalog {
    async fn save_writer_if_not_exists(&self, writer: &WriterRecord) -> Result<WriterId> {
        let mut state = self.write()?;
        if let Some(existing) = state.writers.iter().find(|w| eq_ignore_case(&w.name, &writer.name)) {
            return Ok(existing.id);
        }

        let id = WriterId(next_id(state.writers.len()));
        state.writers.push(WriterRow {
            id,
            external: writer.external.clone(),
            name: writer.name.clone(),
            songs: Vec::new(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn link_writer(&self, writer: WriterId, song: SongId) -> Result<()> {
        let mut state = self.write()?;
        if row_index(song.get(), state.songs.len()).is_none() {
            return Err(Error::storage(format!("Song {song} does not exist")));
        }
        let idx = row_index(writer.get(), state.writers.len())
            .ok_or_else(|| Error::storage(format!("Writer {writer} does not exist")))?;

        let songs = &mut state.writers[idx].songs;
        if !songs.contains(&song) {
            songs.push(song);
        }
        Ok(())
    }
}

#[async_trait]
impl SectionStore for MemoryCatalog {
    async fn save_section(&self, song: SongId, order: u32, section_type: SectionType) -> Result<SectionId> {
        if order == 0 {
            return Err(Error::storage("Section order must be positive"));
        }
        let mut state = self.write()?;
        if row_index(song.get(), state.songs.len()).is_none() {
            return Err(Error::storage(format!("Song {song} does not exist")));
        }

        let id = SectionId(next_id(state.sections.len()));
        state.sections.push(SectionRow {
            id,
            song,
            order,
            section_type,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl LineStore for MemoryCatalog {
    async fn save_line(&self, section: SectionId, order: u32, text: &str) -> Result<LineId> {
        if order == 0 {
            return Err(Error::storage("Line order must be positive"));
        }
        if text.is_empty() {
            return Err(Error::storage("Line text must not be empty"));
        }
        let mut state = self.write()?;
        if row_index(section.get(), state.sections.len()).is_none() {
            return Err(Error::storage(format!("Section {section} does not exist")));
        }

        let id = LineId(next_id(state.lines.len()));
        state.lines.push(LineRow {
            id,
            section,
            order,
            lyrics: text.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl WordStore for MemoryCatalog {
    async fn find_word(&self, text: &str) -> Result<Option<WordId>> {
        let state = self.read()?;
        Ok(state.word_index.get(text).and_then(|&idx| state.words.get(idx)).map(|w| w.id))
    }

    async fn save_or_merge_word(&self, text: &str, line: LineId) -> Result<WordId> {
        if text.is_empty() {
            return Err(Error::storage("Word text must not be empty"));
        }
        let mut state = self.write()?;
        if row_index(line.get(), state.lines.len()).is_none() {
            return Err(Error::storage(format!("Line {line} does not exist")));
        }

        let now = Utc::now();
        let idx = if let Some(&idx) = state.word_index.get(text) {
            idx
        } else {
            let idx = state.words.len();
            state.words.push(WordRow {
                id: WordId(next_id(idx)),
                text: text.to_string(),
                lines: Vec::new(),
                created_at: now,
                updated_at: now,
            });
            state.word_index.insert(text.to_string(), idx);
            idx
        };

        let word = &mut state.words[idx];
        if !word.lines.contains(&line) {
            word.lines.push(line);
            word.updated_at = now;
        }
        Ok(word.id)
    }
}
