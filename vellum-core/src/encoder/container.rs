//! Container encoder: a manuscript to transport container bytes.
//!
//! The whole container is built in memory before any byte is returned;
//! a validation failure never leaves partial output behind. Caller
//! image files are read, never written or moved.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::container::ContainerWriter;
use crate::error::{EncodeError, Result};
use crate::grammar::SequenceGate;
use crate::types::{ImageKind, Manuscript, Segment};

/// Encode a manuscript into transport container bytes.
///
/// The segment sequence is re-validated through the same grammar gate
/// the scanner and decoder use, so a sequence the decoder would reject
/// cannot be encoded in the first place.
pub fn encode(manuscript: &Manuscript) -> Result<Vec<u8>> {
    let mut gate = SequenceGate::new(manuscript.format);
    let mut writer = ContainerWriter::new();

    let block = json!({
        "stf": manuscript.format.name(),
        "meta": manuscript.metadata.wire_map(),
    });
    writer.push_json(&block).map_err(EncodeError::MetadataBlock)?;

    // Lines of the text part currently being assembled; an image
    // segment closes it and opens a fresh one after the image part
    let mut pending: Vec<String> = Vec::new();

    for segment in &manuscript.segments {
        gate.admit(segment)?;
        match segment {
            Segment::Paragraph { text } => {
                single_line("paragraph", text)?;
                pending.push(format!(">{text}"));
            }
            Segment::Chapter { title } => {
                single_line("chapter title", title)?;
                pending.push(format!("@{title}"));
            }
            Segment::Scene => pending.push("#".to_string()),
            Segment::Image {
                path,
                kind,
                caption,
            } => {
                single_line("caption", caption)?;
                let name = image_name(path, *kind)?;
                pending.push(format!("^{name}"));
                pending.push(format!("?{caption}"));
                writer.push_text(&pending.join("\n"));
                pending.clear();

                let bytes = fs::read(path).map_err(|source| EncodeError::ImageRead {
                    path: path.clone(),
                    source,
                })?;
                writer.push_image(*kind, &bytes);
            }
        }
    }
    gate.finish()?;

    if !pending.is_empty() {
        writer.push_text(&pending.join("\n"));
    }
    Ok(writer.finish())
}

fn single_line(kind: &'static str, text: &str) -> Result<()> {
    if text.contains('\n') || text.contains('\r') {
        return Err(EncodeError::SegmentLineBreak { kind }.into());
    }
    Ok(())
}

/// The informational name written on the `^` marker line: the image's
/// file name, which must agree with its declared kind.
fn image_name(path: &Path, kind: ImageKind) -> Result<String> {
    if ImageKind::from_path(path) != Some(kind) {
        return Err(EncodeError::ImageExtension {
            path: path.to_path_buf(),
        }
        .into());
    }
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| EncodeError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::read_parts;
    use crate::error::{GrammarError, VellumError};
    use crate::types::{Format, Metadata};

    fn sample(format: Format) -> Manuscript {
        Manuscript::new(format, Metadata::new("T", "https://example.org/t"))
    }

    #[test]
    fn test_metadata_part_comes_first() {
        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::paragraph("Hello."));
        let parts = read_parts(&encode(&manuscript).unwrap()).unwrap();
        assert_eq!(parts[0].media_type, "application/json");
        let block: serde_json::Value = serde_json::from_slice(&parts[0].body).unwrap();
        assert_eq!(block["stf"], "short");
        assert_eq!(block["meta"]["title"], "T");
    }

    #[test]
    fn test_text_parts_alternate_with_images() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("map.png");
        fs::write(&image, b"png-bytes").unwrap();

        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::paragraph("Before."));
        manuscript.push_segment(Segment::image(&image, ImageKind::Png, "The map"));
        manuscript.push_segment(Segment::paragraph("After."));

        let parts = read_parts(&encode(&manuscript).unwrap()).unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts[1].is_text());
        let text = String::from_utf8(parts[1].body.clone()).unwrap();
        assert_eq!(text.trim_end(), ">Before.\n^map.png\n?The map");
        assert_eq!(parts[2].media_type, "image/png");
        assert_eq!(parts[2].body, b"png-bytes");
        assert!(parts[3].is_text());
    }

    #[test]
    fn test_trailing_image_leaves_no_text_part() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("end.jpg");
        fs::write(&image, b"jpg").unwrap();

        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::image(&image, ImageKind::Jpeg, "Fin"));
        let parts = read_parts(&encode(&manuscript).unwrap()).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.last().unwrap().is_image());
    }

    #[test]
    fn test_empty_short_manuscript_is_metadata_only() {
        let parts = read_parts(&encode(&sample(Format::Short)).unwrap()).unwrap();
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_grammar_enforced_on_encode() {
        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::chapter("Nope"));
        let err = encode(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Grammar(GrammarError::IllegalChapter)
        ));

        let mut manuscript = sample(Format::Chapter);
        manuscript.push_segment(Segment::paragraph("too early"));
        let err = encode(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Grammar(GrammarError::MissingFirstChapter)
        ));

        let err = encode(&sample(Format::Chapter)).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Grammar(GrammarError::MissingFirstChapter)
        ));
    }

    #[test]
    fn test_multi_line_text_rejected() {
        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::paragraph("two\nlines"));
        let err = encode(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::SegmentLineBreak { .. })
        ));
    }

    #[test]
    fn test_image_extension_must_match_kind() {
        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::image("map.png", ImageKind::Jpeg, "cap"));
        let err = encode(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::ImageExtension { .. })
        ));
    }

    #[test]
    fn test_missing_image_file() {
        let mut manuscript = sample(Format::Short);
        manuscript.push_segment(Segment::image(
            "/definitely/not/here.png",
            ImageKind::Png,
            "cap",
        ));
        let err = encode(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::ImageRead { .. })
        ));
    }
}
