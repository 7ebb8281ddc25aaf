//! STF source scanner: line-oriented manuscript markup to a
//! [`Manuscript`].
//!
//! Input contract: UTF-8 with an optional leading BOM, LF or CR+LF
//! line endings. Line 1 is the signature `%stf <short|chapter>;`,
//! followed by `Key: value` header fields (indented lines continue the
//! preceding field) up to the first blank line, then the body. Body
//! lines classify by their first non-whitespace character: `@` chapter,
//! `#` scene, `^` image reference, `>` caption, blank gap; everything
//! else is paragraph text joined across soft wraps with single spaces.

use std::path::PathBuf;

use crate::error::{Result, ScanError};
use crate::grammar::SequenceGate;
use crate::types::{Format, ImageKind, Manuscript, Metadata, MetadataBuilder, Segment};

/// Scan STF source text into a manuscript
pub fn scan(source: &str) -> Result<Manuscript> {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);
    check_carriage_returns(text)?;

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut scanner = Scanner { lines, pos: 0 };
    let format = scanner.signature()?;
    let metadata = scanner.header()?;
    let segments = scanner.body(format)?;

    Ok(Manuscript {
        format,
        metadata,
        segments,
    })
}

/// Reject any CR not immediately followed by LF
fn check_carriage_returns(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut line = 1;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\n' => line += 1,
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                return Err(ScanError::StrayCarriageReturn { line }.into());
            }
            _ => {}
        }
    }
    Ok(())
}

struct Scanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// 1-based number of the line at `pos`
    fn line_number(&self) -> usize {
        self.pos + 1
    }

    /// Parse the signature line `%stf <short|chapter>;`
    fn signature(&mut self) -> Result<Format> {
        let malformed = ScanError::MalformedSignature { line: 1 };
        let line = self.lines.first().copied().ok_or(malformed)?.trim();
        let rest = line
            .strip_prefix("%stf")
            .ok_or(ScanError::MalformedSignature { line: 1 })?;
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            return Err(ScanError::MalformedSignature { line: 1 }.into());
        }
        let word = rest
            .trim()
            .strip_suffix(';')
            .ok_or(ScanError::MalformedSignature { line: 1 })?;
        let format =
            Format::from_name(word).ok_or(ScanError::MalformedSignature { line: 1 })?;
        self.pos = 1;
        Ok(format)
    }

    /// Parse header fields up to the first blank line (or EOF)
    fn header(&mut self) -> Result<Metadata> {
        let mut builder = MetadataBuilder::new();
        // The field currently being collected, so indented continuation
        // lines can extend it before it is declared
        let mut pending: Option<(String, Vec<String>)> = None;

        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if line.trim().is_empty() {
                self.pos += 1;
                break;
            }
            if line.starts_with([' ', '\t']) {
                let Some((_, values)) = pending.as_mut() else {
                    return Err(ScanError::MalformedHeader {
                        line: self.line_number(),
                        reason: "continuation line without a preceding field".to_string(),
                    }
                    .into());
                };
                values.push(line.trim().to_string());
            } else {
                let Some((key, value)) = line.split_once(':') else {
                    return Err(ScanError::MalformedHeader {
                        line: self.line_number(),
                        reason: "expected `Key: value`".to_string(),
                    }
                    .into());
                };
                flush_field(&mut builder, pending.take())?;
                pending = Some((key.trim().to_string(), vec![value.trim().to_string()]));
            }
            self.pos += 1;
        }

        flush_field(&mut builder, pending)?;
        Ok(builder.finish()?)
    }

    /// Scan the body into the segment sequence
    fn body(&mut self, format: Format) -> Result<Vec<Segment>> {
        let mut gate = SequenceGate::new(format);
        let mut segments = Vec::new();
        let mut paragraph: Option<String> = None;
        // An image reference waiting for its caption on the very next line
        let mut pending_image: Option<(PathBuf, ImageKind, usize)> = None;

        while self.pos < self.lines.len() {
            let ln = self.line_number();
            let line = self.lines[self.pos].trim();
            self.pos += 1;

            if let Some((path, kind, marker_line)) = pending_image.take() {
                let Some(caption) = line.strip_prefix('>') else {
                    return Err(ScanError::MissingCaption { line: marker_line }.into());
                };
                emit(
                    &mut gate,
                    &mut segments,
                    Segment::image(path, kind, caption.trim()),
                )?;
                continue;
            }

            if line.is_empty() {
                flush_paragraph(&mut gate, &mut segments, &mut paragraph)?;
                continue;
            }

            match line.as_bytes()[0] {
                b'@' => {
                    flush_paragraph(&mut gate, &mut segments, &mut paragraph)?;
                    emit(&mut gate, &mut segments, Segment::chapter(line[1..].trim()))?;
                }
                b'#' => {
                    flush_paragraph(&mut gate, &mut segments, &mut paragraph)?;
                    if !line[1..].trim().is_empty() {
                        return Err(ScanError::MalformedScene { line: ln }.into());
                    }
                    emit(&mut gate, &mut segments, Segment::Scene)?;
                }
                b'^' => {
                    flush_paragraph(&mut gate, &mut segments, &mut paragraph)?;
                    let path = line[1..].trim();
                    if path.is_empty() {
                        return Err(ScanError::MalformedImage { line: ln }.into());
                    }
                    let path = PathBuf::from(path);
                    let kind = ImageKind::from_path(&path).ok_or_else(|| {
                        ScanError::UnsupportedImageType {
                            line: ln,
                            path: path.display().to_string(),
                        }
                    })?;
                    pending_image = Some((path, kind, ln));
                }
                b'>' => {
                    return Err(ScanError::StrayCaption { line: ln }.into());
                }
                _ => match paragraph.as_mut() {
                    Some(text) => {
                        text.push(' ');
                        text.push_str(line);
                    }
                    None => paragraph = Some(line.to_string()),
                },
            }
        }

        if let Some((_, _, marker_line)) = pending_image {
            return Err(ScanError::MissingCaption { line: marker_line }.into());
        }
        flush_paragraph(&mut gate, &mut segments, &mut paragraph)?;
        gate.finish()?;
        Ok(segments)
    }
}

fn flush_field(
    builder: &mut MetadataBuilder,
    pending: Option<(String, Vec<String>)>,
) -> Result<()> {
    let Some((key, values)) = pending else {
        return Ok(());
    };
    if key.eq_ignore_ascii_case("mailing") {
        // Each physical line is one address line
        for value in values {
            builder.declare(&key, &value)?;
        }
    } else {
        builder.declare(&key, &values.join(" "))?;
    }
    Ok(())
}

fn emit(gate: &mut SequenceGate, segments: &mut Vec<Segment>, segment: Segment) -> Result<()> {
    gate.admit(&segment)?;
    segments.push(segment);
    Ok(())
}

fn flush_paragraph(
    gate: &mut SequenceGate,
    segments: &mut Vec<Segment>,
    paragraph: &mut Option<String>,
) -> Result<()> {
    if let Some(text) = paragraph.take() {
        emit(gate, segments, Segment::Paragraph { text })?;
    }
    Ok(())
}
