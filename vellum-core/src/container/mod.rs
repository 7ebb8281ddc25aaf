//! The multi-part transport container.
//!
//! A container is MIME `multipart/mixed`: part 0 is the JSON metadata
//! block, parts 1..N alternate narrative text parts and image parts.

mod reader;
mod writer;

pub use reader::read_parts;
pub use writer::ContainerWriter;

/// Media type of the metadata block (part 0)
pub const METADATA_MEDIA_TYPE: &str = "application/json";

/// Media type of narrative text parts
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// One container part: its declared media type and decoded body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Lowercase media type without parameters, e.g. `image/png`
    pub media_type: String,
    pub body: Vec<u8>,
}

impl Part {
    pub fn is_text(&self) -> bool {
        self.media_type == TEXT_MEDIA_TYPE
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}
