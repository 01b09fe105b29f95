//! Core type definitions for compile-time safety.
//!
//! Catalog identifiers are newtype wrappers so a line id can never be passed
//! where a section id is expected. Identity itself is assigned by the
//! persistence layer.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the inner numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

catalog_id!(
    /// Catalog song identifier.
    SongId
);
catalog_id!(
    /// Catalog section identifier.
    SectionId
);
catalog_id!(
    /// Catalog line identifier.
    LineId
);
catalog_id!(
    /// Catalog word identifier.
    WordId
);
catalog_id!(
    /// Catalog release (album) identifier.
    ReleaseId
);
catalog_id!(
    /// Catalog writer identifier.
    WriterId
);

/// Closed vocabulary of section types stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SectionType {
    /// Instrumental or spoken lead-in.
    Intro,
    /// Verse; also the fallback for unstructured songs.
    #[default]
    Verse,
    /// Build-up before a chorus.
    PreChorus,
    /// Chorus / refrain.
    Chorus,
    /// Tag after a chorus.
    PostChorus,
    /// Bridge.
    Bridge,
    /// Breakdown.
    Breakdown,
    /// Spoken word passage.
    Spoken,
    /// Coda.
    Coda,
    /// Closing section.
    Outro,
    /// Anything else in a song that has real structure.
    Other,
}

impl SectionType {
    /// Returns all section types in catalog order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Intro,
            Self::Verse,
            Self::PreChorus,
            Self::Chorus,
            Self::PostChorus,
            Self::Bridge,
            Self::Breakdown,
            Self::Spoken,
            Self::Coda,
            Self::Outro,
            Self::Other,
        ]
    }

    /// Returns the human-readable name of this section type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Intro => "Intro",
            Self::Verse => "Verse",
            Self::PreChorus => "Pre-Chorus",
            Self::Chorus => "Chorus",
            Self::PostChorus => "Post-Chorus",
            Self::Bridge => "Bridge",
            Self::Breakdown => "Breakdown",
            Self::Spoken => "Spoken",
            Self::Coda => "Coda",
            Self::Outro => "Outro",
            Self::Other => "Other",
        }
    }

    /// Returns the stored code: uppercase letters only, e.g. `PRECHORUS`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Intro => "INTRO",
            Self::Verse => "VERSE",
            Self::PreChorus => "PRECHORUS",
            Self::Chorus => "CHORUS",
            Self::PostChorus => "POSTCHORUS",
            Self::Bridge => "BRIDGE",
            Self::Breakdown => "BREAKDOWN",
            Self::Spoken => "SPOKEN",
            Self::Coda => "CODA",
            Self::Outro => "OUTRO",
            Self::Other => "OTHER",
        }
    }

    /// Look up a type by its normalized code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.code() == code)
    }

    /// Normalize a free-form header label: uppercase, letters only.
    ///
    /// `"Pre-Chorus"` becomes `"PRECHORUS"`, `"verse_2"` becomes `"VERSE"`.
    #[must_use]
    pub fn normalize_label(label: &str) -> String {
        label
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External provider a catalog row was imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExternalSourceKind {
    /// genius.com
    Genius,
    /// musixmatch.com
    Musixmatch,
}

impl ExternalSourceKind {
    /// Returns the provider display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Genius => "Genius",
            Self::Musixmatch => "Musixmatch",
        }
    }
}

impl fmt::Display for ExternalSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
