//! Section segmentation of raw lyric lines.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Regex capturing the label of a `[Verse 2: Artist]` style header.
#[allow(clippy::expect_used)]
static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([\w-]+).*\]$").expect("valid regex: RE_HEADER")
});

/// A labeled group of lyric lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Raw label taken from the header, e.g. `Verse` or `Pre-Chorus`.
    pub label: String,
    /// 1-based position among the emitted sections.
    pub order: u32,
    /// Non-empty lyric lines in song order.
    pub lines: Vec<String>,
}

/// Accumulates lines until a break or header closes the section.
#[derive(Default)]
struct Segmenter {
    sections: Vec<Section>,
    label: String,
    lines: Vec<String>,
}

impl Segmenter {
    /// Emit the pending section if it has content; empty ones vanish.
    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let order = u32::try_from(self.sections.len() + 1).unwrap_or(u32::MAX);
        self.sections.push(Section {
            label: std::mem::take(&mut self.label),
            order,
            lines: std::mem::take(&mut self.lines),
        });
    }

    fn push_line(&mut self, line: &str) {
        if is_break(line) {
            self.flush();
        } else if line.starts_with('[') {
            self.flush();
            self.label = header_label(line);
        } else if !line.is_empty() {
            self.lines.push(line.to_string());
        }
    }
}

/// Split raw lyric lines into ordered, non-empty sections.
///
/// Content format:
/// - Lines starting with `[` are headers; the label is the leading run of
///   word characters and hyphens (`[Verse 1]` gives `Verse`)
/// - Whitespace-only lines and a lone `|` close the current section
/// - Empty strings are dropped without closing anything
///
/// A section is only emitted once it holds a line, so a header directly
/// followed by another header is overridden and order numbers stay gapless.
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Vec<Section> {
    let mut segmenter = Segmenter::default();
    for line in lines {
        segmenter.push_line(line.as_ref());
    }
    segmenter.flush();
    segmenter.sections
}

/// Explicit section break: a lone `|` or a non-empty whitespace-only line.
fn is_break(line: &str) -> bool {
    line == "|" || (!line.is_empty() && line.chars().all(char::is_whitespace))
}

/// Extract the header label, or an empty string for malformed headers.
fn header_label(line: &str) -> String {
    RE_HEADER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn sample_song() -> Vec<&'static str> {
        vec![
            "[Verse 1]",
            "First line of verse",
            "Second line of verse",
            "",
            "[Chorus]",
            "First line of chorus",
            "Second line of chorus",
            "",
            "Third line of chorus",
            "",
            "[Solo]",
            "",
            "[Verse 2]",
            "Line in second verse",
            "",
            "[Outro]",
        ]
    }

    #[test]
    fn test_segment_sample_song() {
        let sections = segment(&sample_song());
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].label, "Verse");
        assert_eq!(sections[0].order, 1);
        assert_eq!(sections[0].lines, vec!["First line of verse", "Second line of verse"]);

        assert_eq!(sections[1].label, "Chorus");
        assert_eq!(sections[1].order, 2);
        assert_eq!(sections[1].lines.len(), 3);
        assert_eq!(sections[1].lines[2], "Third line of chorus");

        assert_eq!(sections[2].label, "Verse");
        assert_eq!(sections[2].order, 3);
        assert_eq!(sections[2].lines, vec!["Line in second verse"]);
    }

    #[test]
    fn test_segment_empty_input() {
        let lines: Vec<String> = Vec::new();
        assert!(segment(&lines).is_empty());
    }

    #[test]
    fn test_pipe_and_whitespace_break() {
        let sections = segment(&["one", "|", "two", "   ", "three", "\t", "|", "four"]);
        let lines: Vec<_> = sections.iter().map(|s| s.lines.join("/")).collect();
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
        let orders: Vec<_> = sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert!(sections.iter().all(|s| s.label.is_empty()));
    }

    #[test]
    fn test_break_clears_label() {
        let sections = segment(&["[Chorus]", "la la", "|", "after break"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, "Chorus");
        assert_eq!(sections[1].label, "");
    }

    #[test]
    fn test_consecutive_headers_last_wins() {
        let sections = segment(&["[Intro]", "[Guitar Solo]", "[Pre-Chorus: Both]", "Here we go"]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, "Pre-Chorus");
        assert_eq!(sections[0].order, 1);
    }

    #[test]
    fn test_header_without_word_label() {
        assert_eq!(header_label("[?]"), "");
        assert_eq!(header_label("[Verse 1"), "");
        assert_eq!(header_label("[Hook: Artist & Friend]"), "Hook");
        let sections = segment(&["[!!]", "line"]);
        assert_eq!(sections[0].label, "");
    }

    #[test]
    fn test_headers_only_yield_nothing() {
        assert!(segment(&["[Intro]", "", "|", "[Outro]", "   "]).is_empty());
    }

    #[test]
    fn test_lines_kept_verbatim() {
        let sections = segment(&["  indented line  "]);
        assert_eq!(sections[0].lines, vec!["  indented line  "]);
    }

    #[test]
    fn test_sections_never_empty_and_gapless() {
        let inputs: Vec<Vec<&str>> = vec![
            vec!["|", "|", "a", "|", "|", "[X]", "[Y]", "b", "", "c", " ", "[Z]"],
            vec!["[A]", "[B]", "[C]"],
            vec!["", "", "x"],
            sample_song(),
        ];
        for input in inputs {
            let sections = segment(&input);
            for (idx, section) in sections.iter().enumerate() {
                assert!(!section.lines.is_empty());
                assert_eq!(section.order as usize, idx + 1);
            }
        }
    }
}
