//! Lyrics extraction from a Genius song page.
//!
//! This is a tag-level scan rather than a DOM parse: it finds each
//! `Lyrics__Container` block by balancing `<div>` tags and flattens it to
//! text. A double `<br>` becomes a `|` break line for the segmenter.

// Allow expect for compile-time constant regex patterns in LazyLock blocks
#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::{Captures, Regex};

static RE_LYRICS_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*class="[^"]*Lyrics__Container[^"]*"[^>]*>"#)
        .expect("valid regex: RE_LYRICS_OPEN")
});
static RE_HEADER_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*class="[^"]*LyricsHeader__Container[^"]*"[^>]*>"#)
        .expect("valid regex: RE_HEADER_OPEN")
});
static RE_DIV_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)div\b[^>]*>").expect("valid regex: RE_DIV_TAG")
});
static RE_DOUBLE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>\s*<br\s*/?>").expect("valid regex: RE_DOUBLE_BREAK")
});
static RE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("valid regex: RE_BREAK")
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("valid regex: RE_TAG")
});
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex: RE_ENTITY")
});

/// Extract the raw lyric lines from a song page.
pub fn lyrics_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut consumed = 0;

    for open in RE_LYRICS_OPEN.find_iter(html) {
        // Containers nested in one already taken are part of its text
        if open.start() < consumed {
            continue;
        }
        let (body, end) = div_body(html, open.end());
        consumed = end;

        let text = html_to_text(&strip_headers(body));
        lines.extend(text.split('\n').map(String::from));
    }

    lines
}

/// Inner HTML of the div whose opening tag ends at `start`, and the offset
/// just past its closing tag. An unclosed div runs to the end of input.
fn div_body(html: &str, start: usize) -> (&str, usize) {
    let rest = &html[start..];
    let mut depth = 1usize;

    for caps in RE_DIV_TAG.captures_iter(rest) {
        let Some(tag) = caps.get(0) else { continue };
        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            depth -= 1;
            if depth == 0 {
                return (&rest[..tag.start()], start + tag.end());
            }
        } else {
            depth += 1;
        }
    }

    (rest, html.len())
}

/// Remove embedded `LyricsHeader__Container` blocks.
fn strip_headers(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut cursor = 0;

    while let Some(open) = RE_HEADER_OPEN.find_at(body, cursor) {
        out.push_str(&body[cursor..open.start()]);
        let (_, end) = div_body(body, open.end());
        cursor = end;
    }
    out.push_str(&body[cursor..]);
    out
}

/// Flatten lyric markup to newline-separated plain text.
fn html_to_text(html: &str) -> String {
    let text = RE_DOUBLE_BREAK.replace_all(html, "\n|\n");
    let text = RE_BREAK.replace_all(&text, "\n");
    let text = RE_TAG.replace_all(&text, "");
    decode_entities(&text)
}

/// Decode numeric and the common named HTML entities.
fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
