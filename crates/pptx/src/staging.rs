//! Scratch storage owned by a single numbering run.

use pagenum_core::{Error, Result, StagingMode};
use std::fs::OpenOptions;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tempfile::TempDir;

/// Prefix of staging directory names.
const STAGING_PREFIX: &str = "pptx_temp_";

/// Readable, writable, seekable scratch space.
pub trait Scratch: Read + Write + Seek {}

impl<T: Read + Write + Seek> Scratch for T {}

/// Where a run keeps its intermediate copies.
///
/// On disk this is a fresh directory that is removed when the area is
/// released or dropped, so every exit path cleans up.
pub struct StagingArea {
    dir: Option<TempDir>,
}

impl StagingArea {
    /// Set up staging for one run.
    pub fn acquire(mode: &StagingMode) -> Result<Self> {
        let dir = match mode {
            StagingMode::Memory => None,
            StagingMode::Disk { root } => {
                let mut builder = tempfile::Builder::new();
                builder.prefix(STAGING_PREFIX);
                let dir = match root {
                    Some(root) => builder.tempdir_in(root),
                    None => builder.tempdir(),
                }
                .map_err(|e| Error::Unexpected(format!("Failed to create staging directory: {}", e)))?;
                log::debug!("Staging in {}", dir.path().display());
                Some(dir)
            }
        };

        Ok(Self { dir })
    }

    /// Directory backing this area, if it is on disk.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(|d| d.path())
    }

    /// Open an empty scratch file named `name`.
    pub fn scratch(&self, name: &str) -> Result<Box<dyn Scratch>> {
        let Some(dir) = &self.dir else {
            return Ok(Box::new(Cursor::new(Vec::new())));
        };

        let path = dir.path().join(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                Error::Unexpected(format!("Failed to create {}: {}", path.display(), e))
            })?;

        Ok(Box::new(file))
    }

    /// Remove the staging directory now, logging if that fails.
    pub fn release(self) {
        if let Some(dir) = self.dir {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::warn!("Failed to remove staging directory {}: {}", path.display(), e);
            }
        }
    }
}
