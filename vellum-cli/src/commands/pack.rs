//! Pack command implementation

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use vellum_core::{encode, scan, Segment};

use super::{input_kind, InputKind};

/// Pack an STF manuscript into a transport container.
///
/// Image paths in the source resolve relative to the STF file's
/// directory. The container is built fully in memory, so a failure
/// leaves no partial output file behind.
pub fn pack(input: &str, output: &str) -> Result<()> {
    let input_path = Path::new(input);
    if input_kind(input_path)? != InputKind::Source {
        bail!("pack expects an .stf input file");
    }

    let source = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input file: {input}"))?;
    let mut manuscript = scan(&source).with_context(|| format!("Failed to scan {input}"))?;

    // Resolve image references against the manuscript's own directory
    if let Some(base) = input_path.parent() {
        for segment in &mut manuscript.segments {
            if let Segment::Image { path, .. } = segment {
                if path.is_relative() {
                    let resolved = base.join(path.as_path());
                    *path = resolved;
                }
            }
        }
    }

    tracing::info!(
        "Scanned '{}' with {} segments ({} images)",
        manuscript.metadata.title,
        manuscript.segments.len(),
        manuscript.image_count()
    );

    let container = encode(&manuscript).with_context(|| format!("Failed to pack {input}"))?;
    fs::write(output, container)
        .with_context(|| format!("Failed to write output file: {output}"))?;

    println!("Packed '{}' -> {}", manuscript.metadata.title, output);
    Ok(())
}
