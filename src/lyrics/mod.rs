//! Lyrics processing.
//!
//! Breaks raw lyric text into labeled sections and each line into a set of
//! searchable words. Both steps are pure and never fail: malformed input
//! degrades to empty labels and empty word sets.

/// Section segmentation of raw lines
pub mod segment;
/// Word tokenization of a single line
pub mod tokenize;

pub use segment::{segment, Section};
pub use tokenize::tokenize;
