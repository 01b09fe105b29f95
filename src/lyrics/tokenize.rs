//! Word tokenization of a single lyric line.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Regex matching exactly two word runs joined by one hyphen.
#[allow(clippy::expect_used)]
static RE_HYPHENATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+-\w+$").expect("valid regex: RE_HYPHENATED")
});

/// Characters that separate raw tokens.
const SEPARATORS: [char; 3] = [' ', '/', '&'];

/// Possessive suffixes, straight and typographic apostrophe.
const POSSESSIVE_SUFFIXES: [&str; 2] = ["'s", "\u{2019}s"];

/// Split a line into its sorted, deduplicated set of searchable words.
///
/// Each token is lowercased with edge punctuation stripped. Possessives
/// (`app's`) also contribute their base (`app`), and a single hyphenated
/// compound (`test-line`) also contributes each side. The base of a
/// possessive goes through the same rules, so the output tokenizes to itself.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = BTreeSet::new();
    for raw in line.split(SEPARATORS) {
        expand(&raw.to_lowercase(), &mut words);
    }
    words.into_iter().collect()
}

/// Add the stripped form of `token` and every form derived from it.
fn expand(token: &str, words: &mut BTreeSet<String>) {
    let stripped = token.trim_matches(|c: char| !is_word_char(c));
    if stripped.is_empty() || words.contains(stripped) {
        return;
    }

    if let Some(base) = possessive_base(stripped) {
        expand(base, words);
    }

    // Both halves are plain word runs, nothing further to derive
    if RE_HYPHENATED.is_match(stripped) {
        words.extend(stripped.split('-').map(String::from));
    }

    words.insert(stripped.to_string());
}

/// Word character: alphanumeric or underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The word with its `'s` removed, if it is a possessive.
fn possessive_base(word: &str) -> Option<&str> {
    POSSESSIVE_SUFFIXES
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
}
