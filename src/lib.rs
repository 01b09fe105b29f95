//! `songbase` - song catalog ingester.
//!
//! Discovers songs through the Genius or Musixmatch APIs and stores their
//! lyrics as a song → section → line → word hierarchy for searching.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod genius;
pub mod ingest;
pub mod lyrics;
pub mod musixmatch;
pub mod sources;
pub mod types;
