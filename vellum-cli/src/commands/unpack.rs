//! Unpack command implementation

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use vellum_core::{write_stf, ContainerSession, Manuscript, Segment};

use super::{input_kind, InputKind};

/// Unpack a transport container into `manuscript.stf` plus its
/// extracted images, written into the output directory.
pub fn unpack(input: &str, output: &str) -> Result<()> {
    let input_path = Path::new(input);
    if input_kind(input_path)? != InputKind::Container {
        bail!("unpack expects an .stfpack input file");
    }

    let mut session = ContainerSession::open_file(input_path)
        .with_context(|| format!("Failed to open container: {input}"))?;
    let segments = session
        .segments()
        .with_context(|| format!("Failed to decode {input}"))?;

    let out_dir = Path::new(output);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {output}"))?;

    // Copy images out of the session's temporary storage and rewrite
    // the references to the copies
    let mut image_index = 0usize;
    let mut rewritten = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Image {
                path,
                kind,
                caption,
            } => {
                image_index += 1;
                let name = format!("img-{image_index:03}.{}", kind.extension());
                fs::copy(&path, out_dir.join(&name))
                    .with_context(|| format!("Failed to extract image {name}"))?;
                rewritten.push(Segment::Image {
                    path: PathBuf::from(name),
                    kind,
                    caption,
                });
            }
            other => rewritten.push(other),
        }
    }

    let manuscript = Manuscript {
        format: session.format(),
        metadata: session.metadata().clone(),
        segments: rewritten,
    };
    let text = write_stf(&manuscript).with_context(|| format!("Failed to render {input}"))?;
    fs::write(out_dir.join("manuscript.stf"), text)
        .with_context(|| format!("Failed to write manuscript.stf in {output}"))?;

    tracing::info!(
        "Unpacked '{}' with {} segments ({} images)",
        manuscript.metadata.title,
        manuscript.segments.len(),
        image_index
    );
    session
        .close()
        .context("Failed to clean up temporary storage")?;

    println!(
        "Unpacked '{}' -> {} ({} images)",
        manuscript.metadata.title, output, image_index
    );
    Ok(())
}
