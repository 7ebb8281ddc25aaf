//! The manuscript root type and its format flag

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Metadata, Segment};

/// Manuscript format.
///
/// `Short` forbids chapter segments entirely; `Chapter` requires the
/// first segment to be a chapter heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Short,
    Chapter,
}

impl Format {
    /// The wire name used in the STF signature and the metadata block
    pub fn name(&self) -> &'static str {
        match self {
            Format::Short => "short",
            Format::Chapter => "chapter",
        }
    }

    /// Look up a format by wire name, case-insensitively
    pub fn from_name(name: &str) -> Option<Format> {
        match name.trim().to_ascii_lowercase().as_str() {
            "short" => Some(Format::Short),
            "chapter" => Some(Format::Chapter),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete manuscript: format, metadata, and the ordered segment
/// sequence. Both codec directions produce and consume this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manuscript {
    pub format: Format,
    pub metadata: Metadata,
    pub segments: Vec<Segment>,
}

impl Manuscript {
    /// Create an empty manuscript
    pub fn new(format: Format, metadata: Metadata) -> Self {
        Self {
            format,
            metadata,
            segments: Vec::new(),
        }
    }

    /// Append a segment
    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Number of image segments
    pub fn image_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Image { .. }))
            .count()
    }

    /// Number of chapter segments
    pub fn chapter_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Chapter { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(Format::from_name("short"), Some(Format::Short));
        assert_eq!(Format::from_name("CHAPTER"), Some(Format::Chapter));
        assert_eq!(Format::from_name("novel"), None);
        assert_eq!(Format::Chapter.name(), "chapter");
    }
}
