//! Session-scoped temporary storage for extracted images.
//!
//! Each codec session owns one temporary directory, so concurrent
//! sessions never collide on filenames. The directory and everything
//! materialized into it are removed when the store is closed or
//! dropped, on success and error paths alike.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::types::ImageKind;

/// Tracks the files a codec session extracts from image parts
#[derive(Debug)]
pub struct TempStore {
    dir: Option<TempDir>,
    files: Vec<PathBuf>,
}

impl TempStore {
    /// Create the session's private temporary directory
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vellum-").tempdir()?;
        Ok(Self {
            dir: Some(dir),
            files: Vec::new(),
        })
    }

    /// The directory path, while the store is open
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Write one image part's bytes to `part-<index>.<ext>`, with the
    /// extension dictated by the declared media type, and return the
    /// file's path.
    pub fn materialize(&mut self, index: usize, kind: ImageKind, bytes: &[u8]) -> io::Result<PathBuf> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| io::Error::other("temp store already closed"))?;
        let path = dir
            .path()
            .join(format!("part-{index}.{}", kind.extension()));
        fs::write(&path, bytes)?;
        self.files.push(path.clone());
        Ok(path)
    }

    /// Paths materialized so far
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Remove the directory and everything in it, reporting failures.
    /// Dropping the store performs the same removal best-effort.
    pub fn close(&mut self) -> io::Result<()> {
        self.files.clear();
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}
