//! Validate command implementation

use anyhow::{bail, Result};

/// Validate a manuscript or container by running the full decode
pub fn validate(input: &str) -> Result<()> {
    match super::info::load(input) {
        Ok(manuscript) => {
            println!("Valid {} manuscript", manuscript.format);
            println!("  Title: {}", manuscript.metadata.title);
            println!("  Segments: {}", manuscript.segments.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid manuscript: {e:#}");
            bail!("Validation failed for {input}");
        }
    }
}
