//! Vellum Core Library
//!
//! Bidirectional codec between STF manuscript source text and the
//! multi-part transport container. The encode path scans STF markup
//! into a [`Manuscript`] and packs it, together with its embedded
//! illustrations and bibliographic metadata, into one container. The
//! decode path walks a container back into the ordered segment
//! sequence through a stateful [`ContainerSession`] that manages the
//! extracted image files for the life of the session.

pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod grammar;
pub mod resources;
pub mod types;

pub use decoder::{scan, ContainerSession};
pub use encoder::{encode, write_stf};
pub use error::{
    ContainerError, EncodeError, GrammarError, MetadataError, Result, ScanError, VellumError,
};
pub use types::{
    Format, ImageKind, Manuscript, Metadata, MetadataBuilder, Person, PubDate, Role, Segment,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manuscript_creation() {
        let manuscript = Manuscript::new(
            Format::Short,
            Metadata::new("Test", "https://example.org/test"),
        );
        assert_eq!(manuscript.metadata.title, "Test");
        assert!(manuscript.segments.is_empty());
    }
}
