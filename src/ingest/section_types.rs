//! Save-time mapping of raw header labels onto [`SectionType`].

use crate::lyrics::Section;
use crate::types::SectionType;

/// Resolve every section's raw label, in order.
///
/// Labels are normalized (uppercase, letters only) and matched against the
/// closed vocabulary. Unrecognized labels become `Other` when the song has
/// several sections and none of them is a verse; otherwise the song is
/// treated as unstructured and they become `Verse`.
pub fn resolve_section_types(sections: &[Section]) -> Vec<SectionType> {
    let labels: Vec<String> = sections
        .iter()
        .map(|s| SectionType::normalize_label(&s.label))
        .collect();

    let has_verse = labels.iter().any(|l| l == SectionType::Verse.code());
    let fallback = if sections.len() > 1 && !has_verse {
        SectionType::Other
    } else {
        SectionType::Verse
    };

    labels
        .iter()
        .map(|label| SectionType::from_code(label).unwrap_or(fallback))
        .collect()
}
