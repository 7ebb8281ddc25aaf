//! Segment-sequence rules shared by the scanner, the encoder, and the
//! container decoder.
//!
//! Both codec directions run every segment through the same gate, so a
//! container the encoder would refuse to produce is also refused on
//! decode rather than silently repaired.

use crate::error::GrammarError;
use crate::types::{Format, Segment};

/// Admission gate for one pass over a segment sequence
#[derive(Debug)]
pub struct SequenceGate {
    format: Format,
    seen_chapter: bool,
}

impl SequenceGate {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            seen_chapter: false,
        }
    }

    /// Check the next segment against the format rules
    pub fn admit(&mut self, segment: &Segment) -> Result<(), GrammarError> {
        match (self.format, segment) {
            (Format::Short, Segment::Chapter { .. }) => Err(GrammarError::IllegalChapter),
            (Format::Chapter, Segment::Chapter { .. }) => {
                self.seen_chapter = true;
                Ok(())
            }
            (Format::Chapter, _) if !self.seen_chapter => Err(GrammarError::MissingFirstChapter),
            _ => Ok(()),
        }
    }

    /// End-of-input check: a chapter-format sequence must contain at
    /// least one chapter
    pub fn finish(&self) -> Result<(), GrammarError> {
        if self.format == Format::Chapter && !self.seen_chapter {
            return Err(GrammarError::MissingFirstChapter);
        }
        Ok(())
    }

    /// Reset for another pass over the same sequence
    pub fn reset(&mut self) {
        self.seen_chapter = false;
    }
}
