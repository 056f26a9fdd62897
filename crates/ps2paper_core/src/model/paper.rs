//! Paper definition record.
//!
//! # Responsibility
//! - Hold one named paper size and its provenance.
//! - Derive the snippet file key used to locate the PostScript page-size file.
//!
//! # Invariants
//! - `width` and `height` are millidots (1/1000 point) and nonzero for parsed
//!   records.
//! - `snippet_key` is the lowercase whitespace-free prefix of `name`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Layered origin of a paper definition.
///
/// Provenance only: the registry does not order or override by source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    /// The printer system's master definitions.
    Master,
    /// The PostScript device definitions.
    Device,
    /// The user's own definitions.
    User,
}

impl PaperSource {
    /// Sources in the order the list display groups them.
    pub const DISPLAY_ORDER: [PaperSource; 3] =
        [PaperSource::Master, PaperSource::Device, PaperSource::User];

    /// Sources in the order the registry reads them.
    pub const LOAD_ORDER: [PaperSource; 3] =
        [PaperSource::Master, PaperSource::User, PaperSource::Device];

    /// Heading shown above the group of definitions from this source.
    pub fn label(self) -> &'static str {
        match self {
            Self::Master => "Master definitions",
            Self::Device => "Device definitions",
            Self::User => "User definitions",
        }
    }

    /// Stable short identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Device => "device",
            Self::User => "user",
        }
    }
}

impl Display for PaperSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Whether a definition's snippet key is shared with a conflicting size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeStatus {
    /// Not classified yet.
    Unscanned,
    /// Every definition sharing the key agrees on size.
    Ok,
    /// Another definition with the same key has a different size.
    Ambiguous,
}

impl SizeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unscanned => "Unknown",
            Self::Ok => "OK",
            Self::Ambiguous => "Ambiguous",
        }
    }
}

impl Display for SizeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// State of the on-disk snippet file for a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// No snippet file exists (or the definition has no snippet key).
    Missing,
    /// A file exists but was not generated by this tool.
    Unknown,
    /// Our file exists and describes the definition's size.
    Correct,
    /// Our file exists but describes a different size.
    Incorrect,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Unknown => "Unknown",
            Self::Correct => "OK",
            Self::Incorrect => "Incorrect",
        }
    }

    /// Returns whether a file is present on disk, whatever its content.
    pub fn exists(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

impl Display for FileStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// One named paper size read from a definition source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperDefinition {
    /// Name exactly as read, surrounding whitespace removed.
    pub name: String,
    /// Width in millidots.
    pub width: u32,
    /// Height in millidots.
    pub height: u32,
    pub source: PaperSource,
    /// Expected snippet filename stem; empty when no file is associated.
    pub snippet_key: String,
    pub size_status: SizeStatus,
    pub file_status: FileStatus,
}

impl PaperDefinition {
    /// Creates an unclassified definition, deriving the snippet key from `name`.
    ///
    /// # Invariants
    /// - `size_status` starts as `Unscanned`.
    /// - `file_status` starts as `Missing` until probed.
    pub fn new(name: impl Into<String>, width: u32, height: u32, source: PaperSource) -> Self {
        let name = name.into();
        let snippet_key = snippet_file_key(name.as_str());
        Self {
            name,
            width,
            height,
            source,
            snippet_key,
            size_status: SizeStatus::Unscanned,
            file_status: FileStatus::Missing,
        }
    }

    /// Returns whether this definition maps onto a snippet file at all.
    pub fn has_snippet_file(&self) -> bool {
        !self.snippet_key.is_empty()
    }

    /// Returns the `(width, height)` pair used for size comparisons.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Derives the snippet filename stem for a paper name.
///
/// Takes the prefix up to the first whitespace character and lowercases it,
/// so `"A4 Rotated"` maps to `"a4"`. A name that starts with whitespace
/// yields an empty key.
pub fn snippet_file_key(name: &str) -> String {
    name.split(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{snippet_file_key, FileStatus, PaperDefinition, PaperSource, SizeStatus};

    #[test]
    fn snippet_key_takes_lowercase_prefix() {
        assert_eq!(snippet_file_key("A4"), "a4");
        assert_eq!(snippet_file_key("Letter Rotated"), "letter");
        assert_eq!(snippet_file_key("US\tLegal"), "us");
    }

    #[test]
    fn snippet_key_is_empty_for_leading_whitespace() {
        assert_eq!(snippet_file_key(" A4"), "");
        assert_eq!(snippet_file_key(""), "");
    }

    #[test]
    fn new_definition_starts_unclassified() {
        let paper = PaperDefinition::new("A5 special", 419_528, 595_276, PaperSource::User);
        assert_eq!(paper.snippet_key, "a5");
        assert_eq!(paper.size_status, SizeStatus::Unscanned);
        assert_eq!(paper.file_status, FileStatus::Missing);
        assert!(paper.has_snippet_file());
    }

    #[test]
    fn status_labels_match_list_display() {
        assert_eq!(FileStatus::Correct.to_string(), "OK");
        assert_eq!(FileStatus::Incorrect.to_string(), "Incorrect");
        assert_eq!(SizeStatus::Ambiguous.to_string(), "Ambiguous");
        assert_eq!(PaperSource::Device.to_string(), "Device definitions");
    }
}
