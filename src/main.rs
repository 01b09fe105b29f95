//! `songbase` - ingest new songs and their lyrics into the catalog.
//!
//! Meant to be run from cron: each run pulls up to `--count` songs the
//! catalog does not have yet and saves the snapshot after every song.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songbase::catalog::{Catalog, MemoryCatalog, TableName};
use songbase::config::Config;
use songbase::error::{Error, Result};
use songbase::genius::{GeniusClient, GeniusFeed, GeniusLyrics};
use songbase::ingest::SongIngestor;
use songbase::musixmatch::{MusixmatchClient, MusixmatchFeed, MusixmatchLyrics};
use songbase::sources::{LyricsSource, SongFeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Genius,
    Musixmatch,
}

#[derive(Parser, Debug)]
#[command(version, about = "Ingest songs and their lyrics into the catalog")]
struct Args {
    /// Provider used for discovery and lyrics
    #[arg(short, long, value_enum, default_value = "genius")]
    source: Source,

    /// Number of new songs to ingest
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Catalog snapshot path
    #[arg(short, long, env = "SONGBASE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Print a catalog table as JSON instead of ingesting
    #[arg(long, value_name = "TABLE")]
    show: Option<String>,
}

type Collaborators = (Box<dyn SongFeed>, Box<dyn LyricsSource>);

fn build_sources(source: Source, config: &Config) -> Result<Collaborators> {
    match source {
        Source::Genius => {
            if !config.has_genius_credentials() {
                return Err(Error::config(
                    "Genius access token missing",
                    "Set GENIUS_ACCESS_TOKEN in the environment or .env",
                ));
            }
            let client = GeniusClient::new(config);
            let feed: Box<dyn SongFeed> = Box::new(GeniusFeed::for_random_writer(client.clone(), &config.writers)?);
            let lyrics: Box<dyn LyricsSource> = Box::new(GeniusLyrics::new(client));
            Ok((feed, lyrics))
        }
        Source::Musixmatch => {
            if !config.has_musixmatch_credentials() {
                return Err(Error::config(
                    "Musixmatch API key missing",
                    "Set MUSIXMATCH_API_KEY in the environment or .env",
                ));
            }
            let client = MusixmatchClient::new(config);
            let feed: Box<dyn SongFeed> = Box::new(MusixmatchFeed::for_random_writer(client.clone(), &config.writers)?);
            let lyrics: Box<dyn LyricsSource> = Box::new(MusixmatchLyrics::new(client));
            Ok((feed, lyrics))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songbase=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load()?;
    tracing::debug!("{} {} starting", config.app_name(), config.app_version());
    if let Some(path) = args.catalog {
        config.catalog_path = path;
    }

    let store = Arc::new(MemoryCatalog::load(&config.catalog_path)?);

    if let Some(table) = args.show {
        let table: TableName = table.parse()?;
        let rows = store.table_rows(table)?;
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| Error::Msg(format!("Failed to render {table}: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let (feed, lyrics) = build_sources(args.source, &config)?;
    let mut ingestor = SongIngestor::new(feed, lyrics, Catalog::from_store(&store));

    let mut saved = 0usize;
    while saved < args.count {
        // A failed song leaves partial rows in memory; they are dropped by
        // not saving the snapshot again.
        let Some(report) = ingestor.ingest_next().await? else {
            break;
        };
        store.save(&config.catalog_path)?;
        saved += 1;
        println!(
            "#{} \"{}\" by {}: {} sections, {} lines, {} words",
            report.song, report.title, report.artist, report.sections, report.lines, report.words
        );
    }

    tracing::info!("Ingested {saved} new songs into {}", config.catalog_path.display());
    Ok(())
}
