//! Core types for manuscripts, metadata, and narrative segments

mod date;
mod manuscript;
mod metadata;
mod person;
mod segment;

pub use date::PubDate;
pub use manuscript::{Format, Manuscript};
pub use metadata::{Metadata, MetadataBuilder};
pub use person::{Person, Role};
pub use segment::{ImageKind, Segment};
