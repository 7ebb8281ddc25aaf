//! Container decoder: a stateful cursor over the transport parts.
//!
//! The session walks parts in order and never backtracks within a
//! pass: all output for part *n* is exhausted before part *n + 1* is
//! opened. Segments are materialized lazily; a later grammar violation
//! fails the whole decode without retracting segments already yielded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::container::{read_parts, Part, METADATA_MEDIA_TYPE};
use crate::error::{ContainerError, Result, VellumError};
use crate::grammar::SequenceGate;
use crate::resources::TempStore;
use crate::types::{Format, ImageKind, Manuscript, Metadata, MetadataBuilder, Segment};

/// Decode cursor state
#[derive(Debug)]
enum Cursor {
    BeforeFirstPart,
    InTextPart {
        part: usize,
        lines: Vec<String>,
        next: usize,
    },
    AtEof,
}

/// One decode session over one transport container.
///
/// Image parts are extracted into a session-private temporary
/// directory; the extracted files stay valid for the whole session
/// (across [`rewind`](Self::rewind) passes) and are removed when the
/// session is closed or dropped.
#[derive(Debug)]
pub struct ContainerSession {
    parts: Vec<Part>,
    format: Format,
    metadata: Metadata,
    cursor: Cursor,
    gate: SequenceGate,
    temp: TempStore,
    /// Extracted image files, keyed by part index
    images: HashMap<usize, PathBuf>,
}

impl ContainerSession {
    /// Parse container bytes and validate the metadata block (part 0)
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let parts = read_parts(bytes)?;
        let (format, metadata) = decode_metadata_block(&parts[0])?;
        let temp = TempStore::new()?;
        Ok(Self {
            parts,
            format,
            metadata,
            cursor: Cursor::BeforeFirstPart,
            gate: SequenceGate::new(format),
            temp,
            images: HashMap::new(),
        })
    }

    /// Read and open a container file
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Yield the next segment, or `None` at the end of the container.
    ///
    /// Any structural violation is terminal for the decode; segments
    /// already yielded are not retracted.
    pub fn next_segment(&mut self) -> Result<Option<Segment>> {
        loop {
            // Errors leave the cursor parked at EOF; they are terminal
            // for the session anyway.
            match std::mem::replace(&mut self.cursor, Cursor::AtEof) {
                Cursor::AtEof => return Ok(None),
                Cursor::BeforeFirstPart => {
                    if self.parts.len() == 1 {
                        if self.format != Format::Short {
                            return Err(ContainerError::malformed(
                                "a single-part container is only valid for short format",
                            )
                            .into());
                        }
                        self.gate.finish()?;
                        return Ok(None);
                    }
                    self.cursor = self.text_cursor(1)?;
                }
                Cursor::InTextPart {
                    part,
                    lines,
                    mut next,
                } => {
                    if next >= lines.len() {
                        if part + 1 == self.parts.len() {
                            self.gate.finish()?;
                            return Ok(None);
                        }
                        return Err(ContainerError::malformed(format!(
                            "part {part}: non-terminal text part does not end with an image reference"
                        ))
                        .into());
                    }

                    let line = lines[next].trim_start().to_string();
                    next += 1;

                    if line.trim().is_empty() {
                        self.cursor = Cursor::InTextPart { part, lines, next };
                        continue;
                    }

                    let segment = match line.as_bytes()[0] {
                        b'>' => Segment::paragraph(&line[1..]),
                        b'@' => Segment::chapter(&line[1..]),
                        b'#' => {
                            if !line[1..].trim().is_empty() {
                                return Err(ContainerError::malformed(format!(
                                    "part {part}: scene break takes no text"
                                ))
                                .into());
                            }
                            Segment::Scene
                        }
                        b'^' => {
                            let segment = self.image_segment(part, &lines, &mut next)?;
                            self.gate.admit(&segment)?;
                            self.advance_past_image(part + 1)?;
                            return Ok(Some(segment));
                        }
                        b'?' => {
                            return Err(ContainerError::malformed(format!(
                                "part {part}: caption without a preceding image marker"
                            ))
                            .into());
                        }
                        _ => {
                            return Err(ContainerError::malformed(format!(
                                "part {part}: unrecognized line {line:?}"
                            ))
                            .into());
                        }
                    };

                    self.gate.admit(&segment)?;
                    self.cursor = Cursor::InTextPart { part, lines, next };
                    return Ok(Some(segment));
                }
            }
        }
    }

    /// Drain the rest of the walk
    pub fn segments(&mut self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        while let Some(segment) = self.next_segment()? {
            segments.push(segment);
        }
        Ok(segments)
    }

    /// Drain the rest of the walk into a manuscript.
    ///
    /// Image paths in the result point into the session's temporary
    /// storage and are only valid until the session ends.
    pub fn manuscript(&mut self) -> Result<Manuscript> {
        let segments = self.segments()?;
        Ok(Manuscript {
            format: self.format,
            metadata: self.metadata.clone(),
            segments,
        })
    }

    /// Reset the cursor for another pass. Image files already
    /// extracted stay valid and are reused.
    pub fn rewind(&mut self) {
        self.cursor = Cursor::BeforeFirstPart;
        self.gate.reset();
    }

    /// Remove the session's temporary storage, reporting failures.
    /// Dropping the session performs the same removal best-effort.
    pub fn close(mut self) -> Result<()> {
        self.temp.close().map_err(VellumError::Io)
    }

    /// Open the text part at `index` as the new cursor position
    fn text_cursor(&self, index: usize) -> Result<Cursor> {
        let part = &self.parts[index];
        if !part.is_text() {
            return Err(ContainerError::malformed(format!(
                "part {index}: expected a text part, found {}",
                part.media_type
            ))
            .into());
        }
        let text = std::str::from_utf8(&part.body).map_err(|_| {
            ContainerError::malformed(format!("part {index}: text part is not valid UTF-8"))
        })?;
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Ok(Cursor::InTextPart {
            part: index,
            lines,
            next: 0,
        })
    }

    /// Handle an image marker: read the caption on the very next line,
    /// require the rest of the part to be blank, and extract the image
    /// part at `part + 1`.
    fn image_segment(
        &mut self,
        part: usize,
        lines: &[String],
        next: &mut usize,
    ) -> Result<Segment> {
        let caption = lines
            .get(*next)
            .map(|l| l.trim_start())
            .and_then(|l| l.strip_prefix('?'))
            .ok_or(ContainerError::MissingCaption { part })?;
        *next += 1;
        for rest in &lines[*next..] {
            if !rest.trim().is_empty() {
                return Err(ContainerError::malformed(format!(
                    "part {part}: text after the final image caption"
                ))
                .into());
            }
        }

        let image_index = part + 1;
        let image_part = self.parts.get(image_index).ok_or_else(|| {
            ContainerError::malformed(format!("part {part}: no image part follows the caption"))
        })?;
        if !image_part.is_image() {
            return Err(ContainerError::malformed(format!(
                "part {image_index}: expected an image part, found {}",
                image_part.media_type
            ))
            .into());
        }
        let kind = ImageKind::from_media_type(&image_part.media_type).ok_or_else(|| {
            ContainerError::UnsupportedImageType {
                part: image_index,
                media_type: image_part.media_type.clone(),
            }
        })?;

        let path = match self.images.get(&image_index) {
            // Already extracted on an earlier pass; reuse read-only
            Some(path) => path.clone(),
            None => {
                let bytes = image_part.body.clone();
                let path = self.temp.materialize(image_index, kind, &bytes)?;
                self.images.insert(image_index, path.clone());
                path
            }
        };

        Ok(Segment::image(path, kind, caption))
    }

    /// Move the cursor past the image part at `image_index`
    fn advance_past_image(&mut self, image_index: usize) -> Result<()> {
        let following = image_index + 1;
        if following < self.parts.len() {
            self.cursor = self.text_cursor(following)?;
        } else {
            self.gate.finish()?;
        }
        Ok(())
    }
}

/// Decode part 0: `{"stf": <format>, "meta": <field map>}`
fn decode_metadata_block(part: &Part) -> Result<(Format, Metadata)> {
    let block = |reason: String| ContainerError::MetadataBlock { reason };
    if part.media_type != METADATA_MEDIA_TYPE {
        return Err(block(format!(
            "part 0 must be {METADATA_MEDIA_TYPE}, found {}",
            part.media_type
        ))
        .into());
    }
    let value: serde_json::Value =
        serde_json::from_slice(&part.body).map_err(|e| block(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| block("metadata block is not an object".to_string()))?;

    let format_name = object
        .get("stf")
        .and_then(|v| v.as_str())
        .ok_or_else(|| block("missing `stf` format key".to_string()))?;
    let format = Format::from_name(format_name)
        .ok_or_else(|| block(format!("unknown format {format_name:?}")))?;

    let fields = object
        .get("meta")
        .and_then(|v| v.as_object())
        .ok_or_else(|| block("missing `meta` field map".to_string()))?;
    let mut builder = MetadataBuilder::new();
    for (name, value) in fields {
        builder.declare_json(name, value)?;
    }
    Ok((format, builder.finish()?))
}
