//! End-to-end ingest tests against the in-memory catalog.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use songbase::catalog::{Catalog, MemoryCatalog, TableName};
use songbase::error::{Error, Result};
use songbase::ingest::SongIngestor;
use songbase::sources::{CatalogTrack, ExternalRef, LyricsSource, ReleaseRecord, SongFeed, WriterRecord};
use songbase::types::{ExternalSourceKind, SectionType};

struct QueueFeed {
    tracks: VecDeque<CatalogTrack>,
    release: Option<ReleaseRecord>,
}

#[async_trait]
impl SongFeed for QueueFeed {
    async fn next_candidate(&mut self) -> Result<Option<CatalogTrack>> {
        Ok(self.tracks.pop_front())
    }

    async fn enrich(&self, mut track: CatalogTrack) -> Result<CatalogTrack> {
        if track.release.is_none() {
            track.release = self.release.clone();
        }
        Ok(track)
    }

    fn name(&self) -> &'static str {
        "Queue"
    }
}

struct FixedLyrics(HashMap<String, Vec<String>>);

#[async_trait]
impl LyricsSource for FixedLyrics {
    async fn fetch_lyrics_lines(&self, locator: &str) -> Result<Vec<String>> {
        self.0
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::provider("Fixed", format!("no lyrics for {locator}")))
    }
}

fn track(id: u64, title: &str, artist: &str) -> CatalogTrack {
    CatalogTrack {
        external: ExternalRef::new(ExternalSourceKind::Genius, id, format!("/songs/{id}")),
        title: title.to_string(),
        artist: artist.to_string(),
        lyrics_locator: format!("lyrics-{id}"),
        release: None,
        writers: Vec::new(),
    }
}

fn release(title: &str) -> ReleaseRecord {
    ReleaseRecord {
        external: ExternalRef::new(ExternalSourceKind::Genius, 900, "/albums/900"),
        title: title.to_string(),
        artist: "Guided by Voices".to_string(),
        release_date: None,
        label: Some("Matador".to_string()),
    }
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| (*s).to_string()).collect()
}

fn sample_lyrics() -> Vec<String> {
    lines(&[
        "[Verse 1]",
        "Hello world",
        "It's me",
        "|",
        "[Chorus]",
        "La la la",
        " ",
        "Hello again",
    ])
}

fn ingestor(
    store: &Arc<MemoryCatalog>,
    tracks: Vec<CatalogTrack>,
    release: Option<ReleaseRecord>,
    lyrics: Vec<(&str, Vec<String>)>,
) -> SongIngestor {
    let feed = QueueFeed { tracks: tracks.into(), release };
    let lyrics = FixedLyrics(lyrics.into_iter().map(|(k, v)| (k.to_string(), v)).collect());
    SongIngestor::new(Box::new(feed), Box::new(lyrics), Catalog::from_store(store))
}

#[tokio::test]
async fn test_sample_song_is_stored_as_sections_lines_and_words() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Game of Pricks", "Guided by Voices")],
        None,
        vec![("lyrics-1", sample_lyrics())],
    );

    let report = ingestor.ingest_next().await.unwrap().expect("song stored");
    assert_eq!(report.sections, 3);
    assert_eq!(report.lines, 4);

    let sections = store.sections_of(report.song).unwrap();
    let types: Vec<_> = sections.iter().map(|s| s.section_type).collect();
    assert_eq!(types, vec![SectionType::Verse, SectionType::Chorus, SectionType::Verse]);
    let orders: Vec<_> = sections.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);

    let first = store.lines_of(sections[0].id).unwrap();
    let texts: Vec<_> = first.iter().map(|l| l.lyrics.as_str()).collect();
    assert_eq!(texts, vec!["Hello world", "It's me"]);
    assert_eq!(first[1].order, 2);

    assert_eq!(store.words_of(first[1].id).unwrap(), vec!["it", "it's", "me"]);
}

#[tokio::test]
async fn test_words_are_shared_across_lines() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Game of Pricks", "Guided by Voices")],
        None,
        vec![("lyrics-1", sample_lyrics())],
    );
    ingestor.ingest_next().await.unwrap().expect("song stored");

    let hello = store.word("hello").unwrap().expect("word stored");
    assert_eq!(hello.lines.len(), 2);
    assert_eq!(store.row_count(TableName::Words).unwrap(), 7);
}

#[tokio::test]
async fn test_known_song_is_skipped() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![
            track(1, "Game of Pricks", "Guided by Voices"),
            track(2, "GAME OF PRICKS", "guided by voices"),
            track(3, "Tractor Rape Chain", "Guided by Voices"),
        ],
        Some(release("Alien Lanes")),
        vec![("lyrics-1", sample_lyrics()), ("lyrics-3", lines(&["Parallel lines"]))],
    );

    let first = ingestor.ingest_next().await.unwrap().expect("first song");
    assert_eq!(first.title, "Game of Pricks");

    let second = ingestor.ingest_next().await.unwrap().expect("second song");
    assert_eq!(second.title, "Tractor Rape Chain");

    assert!(ingestor.ingest_next().await.unwrap().is_none());
    assert_eq!(store.row_count(TableName::Songs).unwrap(), 2);
    assert_eq!(store.row_count(TableName::Releases).unwrap(), 1);
}

#[tokio::test]
async fn test_same_title_on_another_release_is_new() {
    let store = Arc::new(MemoryCatalog::new());
    let mut first = ingestor(
        &store,
        vec![track(1, "Game of Pricks", "Guided by Voices")],
        Some(release("Alien Lanes")),
        vec![("lyrics-1", sample_lyrics())],
    );
    first.ingest_next().await.unwrap().expect("stored");

    let mut other = track(2, "Game of Pricks", "Guided by Voices");
    other.release = Some(ReleaseRecord {
        external: ExternalRef::new(ExternalSourceKind::Genius, 901, "/albums/901"),
        ..release("Tigerbomb")
    });
    let mut second = ingestor(&store, vec![other], None, vec![("lyrics-2", sample_lyrics())]);

    let report = second.ingest_next().await.unwrap().expect("different release is a new song");
    assert_eq!(report.song.get(), 2);
    assert_eq!(store.row_count(TableName::Releases).unwrap(), 2);
}

#[tokio::test]
async fn test_ingest_runs_on_spawned_task() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Game of Pricks", "Guided by Voices")],
        None,
        vec![("lyrics-1", sample_lyrics())],
    );

    let report = tokio::spawn(async move { ingestor.ingest_next().await })
        .await
        .unwrap()
        .unwrap()
        .expect("song stored");
    assert_eq!(report.sections, 3);
}

#[tokio::test]
async fn test_empty_feed_returns_none() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(&store, Vec::new(), None, Vec::new());
    assert!(ingestor.ingest_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_headers_only_lyrics_are_rejected() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Instrumental", "Guided by Voices")],
        None,
        vec![("lyrics-1", lines(&["[Intro]", "|", "[Outro]"]))],
    );

    match ingestor.ingest_next().await {
        Err(Error::EmptyLyrics { title }) => assert_eq!(title, "Instrumental"),
        other => panic!("Expected EmptyLyrics, got {other:?}"),
    }
    assert_eq!(store.row_count(TableName::Songs).unwrap(), 0);
}

#[tokio::test]
async fn test_missing_artist_is_rejected_before_storage() {
    let store = Arc::new(MemoryCatalog::new());
    let ingestor = ingestor(&store, Vec::new(), None, Vec::new());

    match ingestor.save_song(&track(1, "Untitled", ""), &[]).await {
        Err(Error::IncompleteSongData { missing, .. }) => assert_eq!(missing, "artist, lyrics"),
        other => panic!("Expected IncompleteSongData, got {other:?}"),
    }
    assert_eq!(store.row_count(TableName::Songs).unwrap(), 0);
}

#[tokio::test]
async fn test_lyrics_source_failure_aborts_song() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(&store, vec![track(1, "Lost", "Guided by Voices")], None, Vec::new());

    assert!(matches!(ingestor.ingest_next().await, Err(Error::Provider { .. })));
    assert_eq!(store.row_count(TableName::Songs).unwrap(), 0);
}

#[tokio::test]
async fn test_unstructured_song_is_one_verse() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Motor Away", "Guided by Voices")],
        None,
        vec![("lyrics-1", lines(&["Motor away", "Go on and motor away"]))],
    );

    let report = ingestor.ingest_next().await.unwrap().expect("stored");
    let sections = store.sections_of(report.song).unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].section_type, SectionType::Verse);
}

#[tokio::test]
async fn test_structured_song_without_verse_uses_other() {
    let store = Arc::new(MemoryCatalog::new());
    let mut ingestor = ingestor(
        &store,
        vec![track(1, "Hook Song", "Guided by Voices")],
        None,
        vec![("lyrics-1", lines(&["[Hook]", "Hey", "|", "[Chorus]", "Ho"]))],
    );

    let report = ingestor.ingest_next().await.unwrap().expect("stored");
    let types: Vec<_> = store
        .sections_of(report.song)
        .unwrap()
        .iter()
        .map(|s| s.section_type)
        .collect();
    assert_eq!(types, vec![SectionType::Other, SectionType::Chorus]);
}

#[tokio::test]
async fn test_writers_are_credited_once() {
    let store = Arc::new(MemoryCatalog::new());
    let mut song = track(1, "Game of Pricks", "Guided by Voices");
    song.writers = vec![
        WriterRecord {
            external: ExternalRef::new(ExternalSourceKind::Genius, 50, "/artists/50"),
            name: "Robert Pollard".to_string(),
        },
        WriterRecord {
            external: ExternalRef::new(ExternalSourceKind::Genius, 50, "/artists/50"),
            name: "robert pollard".to_string(),
        },
    ];
    let mut ingestor = ingestor(&store, vec![song], None, vec![("lyrics-1", sample_lyrics())]);

    let report = ingestor.ingest_next().await.unwrap().expect("stored");
    let writers = store.writers().unwrap();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].songs, vec![report.song]);
}

#[tokio::test]
async fn test_snapshot_round_trip_keeps_word_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let store = Arc::new(MemoryCatalog::new());
    let mut first = ingestor(
        &store,
        vec![track(1, "Game of Pricks", "Guided by Voices")],
        None,
        vec![("lyrics-1", sample_lyrics())],
    );
    first.ingest_next().await.unwrap().expect("stored");
    store.save(&path).unwrap();

    let reloaded = Arc::new(MemoryCatalog::load(&path).unwrap());
    let mut second = ingestor(
        &reloaded,
        vec![
            track(1, "Game of Pricks", "Guided by Voices"),
            track(2, "Hello", "Guided by Voices"),
        ],
        None,
        vec![("lyrics-2", lines(&["Hello"]))],
    );

    let report = second.ingest_next().await.unwrap().expect("second song stored");
    assert_eq!(report.title, "Hello");
    assert_eq!(reloaded.word("hello").unwrap().expect("merged").lines.len(), 3);
}
