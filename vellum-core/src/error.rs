//! Error types for Vellum Core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using VellumError
pub type Result<T> = std::result::Result<T, VellumError>;

/// Top-level error type for all Vellum operations
#[derive(Debug, Error)]
pub enum VellumError {
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Sequence error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating or assembling manuscript metadata
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Unknown metadata field: {0}")]
    UnknownField(String),

    #[error("Metadata field declared more than once: {0}")]
    DuplicateField(String),

    #[error("Metadata field has an empty value: {0}")]
    EmptyField(String),

    #[error("Missing required metadata field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Malformed person declaration {value:?}: expected `role; name; sort-name`")]
    MalformedPerson { value: String },

    #[error("Unknown person role: {0:?}")]
    UnknownRole(String),

    #[error("Person names must not contain line breaks")]
    NameLineBreak,

    #[error("Invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: &'static str },

    #[error("Metadata field {field} has the wrong shape: {reason}")]
    InvalidFieldValue { field: String, reason: &'static str },
}

/// Violations of the segment-sequence rules shared by the scanner,
/// the encoder, and the decoder
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Chapter headings are not allowed in short format")]
    IllegalChapter,

    #[error("Chapter format requires a chapter heading before any other content")]
    MissingFirstChapter,
}

/// Errors raised while scanning STF source text
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Line {line}: malformed signature, expected `%stf <short|chapter>;`")]
    MalformedSignature { line: usize },

    #[error("Line {line}: malformed header field: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("Line {line}: carriage return not followed by a line feed")]
    StrayCarriageReturn { line: usize },

    #[error("Line {line}: scene break takes no text")]
    MalformedScene { line: usize },

    #[error("Line {line}: image reference requires a file path")]
    MalformedImage { line: usize },

    #[error("Line {line}: unsupported image type: {path}")]
    UnsupportedImageType { line: usize, path: String },

    #[error("Line {line}: image reference must be followed immediately by a `>` caption line")]
    MissingCaption { line: usize },

    #[error("Line {line}: caption line without a preceding image reference")]
    StrayCaption { line: usize },
}

/// Errors raised while encoding a manuscript to the transport container
/// or back to STF source text
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{kind} text must be a single line")]
    SegmentLineBreak { kind: &'static str },

    #[error("Failed to read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize metadata block: {0}")]
    MetadataBlock(#[from] serde_json::Error),

    #[error("Empty paragraphs cannot be written in source form")]
    EmptyParagraph,

    #[error("Paragraph starting with {sigil:?} would scan as markup in source form")]
    MarkerCollision { sigil: char },

    #[error("Person name contains the `;` separator and cannot be written in composite form")]
    PersonSeparator,

    #[error("Image path {} does not match its declared type", path.display())]
    ImageExtension { path: PathBuf },

    #[error("Image path {} is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },
}

/// Errors raised while reading a transport container
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Unreadable container: {0}")]
    Mime(#[from] mailparse::MailParseError),

    #[error("Container has no parts")]
    Empty,

    #[error("Malformed container: {reason}")]
    Malformed { reason: String },

    #[error("Malformed metadata block: {reason}")]
    MetadataBlock { reason: String },

    #[error("Part {part}: image marker is not followed by its caption")]
    MissingCaption { part: usize },

    #[error("Part {part}: unsupported image type: {media_type}")]
    UnsupportedImageType { part: usize, media_type: String },
}

impl ContainerError {
    /// Shorthand for a `Malformed` error with a formatted reason
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ContainerError::Malformed {
            reason: reason.into(),
        }
    }
}
