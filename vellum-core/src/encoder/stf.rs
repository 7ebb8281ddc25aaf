//! STF writer: a manuscript back to source-format text.
//!
//! The inverse of the scanner. Values that would re-scan as something
//! else (a paragraph opening with a marker sigil, a person name
//! containing the composite separator) are rejected as unrepresentable
//! rather than silently corrupted.

use crate::error::{EncodeError, Result};
use crate::grammar::SequenceGate;
use crate::types::{ImageKind, Manuscript, Person, Segment};

/// Characters that classify a body line as something other than
/// paragraph text
const MARKER_SIGILS: [char; 4] = ['@', '#', '^', '>'];

/// Write a manuscript as STF source text
pub fn write_stf(manuscript: &Manuscript) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("%stf {};\n", manuscript.format.name()));
    header(&mut out, manuscript)?;
    out.push('\n');
    body(&mut out, manuscript)?;
    Ok(out)
}

fn header(out: &mut String, manuscript: &Manuscript) -> Result<()> {
    let m = &manuscript.metadata;
    field(out, "Title", &m.title)?;
    field(out, "Unique-URL", &m.unique_url)?;
    let scalars = [
        ("Description", &m.description),
        ("Publisher", &m.publisher),
        ("Rights", &m.rights),
        ("Email", &m.email),
        ("Website", &m.website),
        ("Phone", &m.phone),
    ];
    for (name, value) in scalars {
        if let Some(v) = value {
            field(out, name, v)?;
        }
    }
    if let Some(date) = &m.date {
        field(out, "Date", &date.to_string())?;
    }
    for person in &m.creator {
        field(out, "Creator", &composite(person)?)?;
    }
    for person in &m.contributor {
        field(out, "Contributor", &composite(person)?)?;
    }
    if let Some((first, rest)) = m.mailing.split_first() {
        field(out, "Mailing", first)?;
        for line in rest {
            single_line("mailing line", line)?;
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(())
}

fn body(out: &mut String, manuscript: &Manuscript) -> Result<()> {
    let mut gate = SequenceGate::new(manuscript.format);
    for (i, segment) in manuscript.segments.iter().enumerate() {
        gate.admit(segment)?;
        if i > 0 {
            // Gap between segments; adjacent paragraphs would
            // otherwise re-scan as one
            out.push('\n');
        }
        match segment {
            Segment::Paragraph { text } => {
                single_line("paragraph", text)?;
                if text.is_empty() {
                    return Err(EncodeError::EmptyParagraph.into());
                }
                let first = text.chars().next().unwrap_or(' ');
                if MARKER_SIGILS.contains(&first) {
                    return Err(EncodeError::MarkerCollision { sigil: first }.into());
                }
                out.push_str(text);
                out.push('\n');
            }
            Segment::Chapter { title } => {
                single_line("chapter title", title)?;
                out.push_str(&format!("@{title}\n"));
            }
            Segment::Scene => out.push_str("#\n"),
            Segment::Image {
                path,
                kind,
                caption,
            } => {
                single_line("caption", caption)?;
                if ImageKind::from_path(path) != Some(*kind) {
                    return Err(EncodeError::ImageExtension {
                        path: path.clone(),
                    }
                    .into());
                }
                let shown = path.to_str().ok_or_else(|| EncodeError::NonUtf8Path {
                    path: path.clone(),
                })?;
                out.push_str(&format!("^{shown}\n>{caption}\n"));
            }
        }
    }
    gate.finish()?;
    Ok(())
}

/// Write one `Key: value` header line
fn field(out: &mut String, name: &'static str, value: &str) -> Result<()> {
    single_line(name, value)?;
    out.push_str(&format!("{name}: {value}\n"));
    Ok(())
}

/// The composite header form of a person, compacted to the bare name
/// when the role is author and both names coincide
fn composite(person: &Person) -> Result<String> {
    if person.name.contains(';') || person.sort_name.contains(';') {
        return Err(EncodeError::PersonSeparator.into());
    }
    if person.is_bare_author() {
        Ok(person.name.clone())
    } else {
        Ok(format!(
            "{}; {}; {}",
            person.role, person.name, person.sort_name
        ))
    }
}

fn single_line(kind: &'static str, text: &str) -> Result<()> {
    if text.contains('\n') || text.contains('\r') {
        return Err(EncodeError::SegmentLineBreak { kind }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::scan;
    use crate::error::VellumError;
    use crate::types::{Format, Metadata, PubDate, Role};

    fn sample() -> Manuscript {
        let metadata = Metadata::new("A Tale", "https://example.org/tale")
            .with_creator(Person::new(Role::AUTHOR, "Jim Smith", "Jim Smith").unwrap())
            .with_date(PubDate::parse("1999-12-31").unwrap());
        Manuscript::new(Format::Short, metadata)
    }

    #[test]
    fn test_written_source_rescans_identically() {
        let mut manuscript = sample();
        manuscript.push_segment(Segment::paragraph("One *two* three."));
        manuscript.push_segment(Segment::Scene);
        manuscript.push_segment(Segment::paragraph("Four."));
        manuscript.push_segment(Segment::image("art/map.png", ImageKind::Png, "The map"));

        let text = write_stf(&manuscript).unwrap();
        let rescanned = scan(&text).unwrap();
        assert_eq!(rescanned, manuscript);
    }

    #[test]
    fn test_bare_author_compacts() {
        let text = write_stf(&sample()).unwrap();
        assert!(text.contains("Creator: Jim Smith\n"));
        assert!(!text.contains("aut;"));
    }

    #[test]
    fn test_non_bare_person_writes_composite() {
        let mut manuscript = sample();
        manuscript.metadata.contributor.push(
            Person::new(Role::ILLUSTRATOR, "Pat Doe", "Doe, Pat").unwrap(),
        );
        let text = write_stf(&manuscript).unwrap();
        assert!(text.contains("Contributor: ill; Pat Doe; Doe, Pat\n"));
        let rescanned = scan(&text).unwrap();
        assert_eq!(rescanned.metadata, manuscript.metadata);
    }

    #[test]
    fn test_mailing_uses_continuation_lines() {
        let mut manuscript = sample();
        manuscript.metadata.mailing = vec!["1 High Street".into(), "Springfield".into()];
        let text = write_stf(&manuscript).unwrap();
        assert!(text.contains("Mailing: 1 High Street\n    Springfield\n"));
        let rescanned = scan(&text).unwrap();
        assert_eq!(rescanned.metadata.mailing, manuscript.metadata.mailing);
    }

    #[test]
    fn test_separator_in_name_unrepresentable() {
        let mut manuscript = sample();
        manuscript.metadata.creator =
            vec![Person::new(Role::AUTHOR, "a; b", "a; b").unwrap()];
        let err = write_stf(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::PersonSeparator)
        ));
    }

    #[test]
    fn test_marker_collision_unrepresentable() {
        let mut manuscript = sample();
        manuscript.push_segment(Segment::paragraph("@looks like a chapter"));
        let err = write_stf(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::MarkerCollision { sigil: '@' })
        ));
    }

    #[test]
    fn test_empty_paragraph_unrepresentable() {
        let mut manuscript = sample();
        manuscript.push_segment(Segment::paragraph(""));
        let err = write_stf(&manuscript).unwrap_err();
        assert!(matches!(
            err,
            VellumError::Encode(EncodeError::EmptyParagraph)
        ));
    }

    #[test]
    fn test_chapter_manuscript_round_trips() {
        let mut manuscript = sample();
        manuscript.format = Format::Chapter;
        manuscript.push_segment(Segment::chapter("One"));
        manuscript.push_segment(Segment::paragraph("Content."));
        let text = write_stf(&manuscript).unwrap();
        assert!(text.starts_with("%stf chapter;\n"));
        assert_eq!(scan(&text).unwrap(), manuscript);
    }
}
