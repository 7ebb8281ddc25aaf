//! Info command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use vellum_core::{scan, ContainerSession, Manuscript, Segment};

use super::{input_kind, InputKind};

/// Manuscript info output
#[derive(Serialize)]
struct ManuscriptInfo {
    title: String,
    unique_url: String,
    format: String,
    creators: Vec<String>,
    date: Option<String>,
    segments: usize,
    chapters: usize,
    images: usize,
}

impl From<&Manuscript> for ManuscriptInfo {
    fn from(m: &Manuscript) -> Self {
        Self {
            title: m.metadata.title.clone(),
            unique_url: m.metadata.unique_url.clone(),
            format: m.format.name().to_string(),
            creators: m.metadata.creator.iter().map(|p| p.name.clone()).collect(),
            date: m.metadata.date.map(|d| d.to_string()),
            segments: m.segments.len(),
            chapters: m.chapter_count(),
            images: m.image_count(),
        }
    }
}

/// Display information about a manuscript or container
pub fn info(input: &str, json: bool) -> Result<()> {
    let manuscript = load(input)?;
    let info = ManuscriptInfo::from(&manuscript);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:      {}", info.title);
        println!("Unique URL: {}", info.unique_url);
        println!("Format:     {}", info.format);
        if !info.creators.is_empty() {
            println!("Creators:   {}", info.creators.join(", "));
        }
        if let Some(date) = &info.date {
            println!("Date:       {}", date);
        }
        println!("Segments:   {}", info.segments);
        println!("Chapters:   {}", info.chapters);
        println!("Images:     {}", info.images);
    }

    Ok(())
}

/// Decode either input form into a manuscript
pub(crate) fn load(input: &str) -> Result<Manuscript> {
    let path = Path::new(input);
    match input_kind(path)? {
        InputKind::Source => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {input}"))?;
            scan(&source).with_context(|| format!("Failed to scan {input}"))
        }
        InputKind::Container => {
            let mut session = ContainerSession::open_file(path)
                .with_context(|| format!("Failed to open container: {input}"))?;
            let mut manuscript = session
                .manuscript()
                .with_context(|| format!("Failed to decode {input}"))?;
            // The temporary image files die with the session; keep only
            // their names for reporting
            for segment in &mut manuscript.segments {
                if let Segment::Image { path, .. } = segment {
                    if let Some(name) = path.file_name().map(PathBuf::from) {
                        *path = name;
                    }
                }
            }
            session
                .close()
                .context("Failed to clean up temporary storage")?;
            Ok(manuscript)
        }
    }
}
