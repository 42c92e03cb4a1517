//! Domain types for representing an extracted presentation package.

use crate::error::SlideMutationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether an entry is a directory placeholder or a file with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    File,
}

/// How an entry's payload is compressed inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

/// A single named entry of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Forward-slash separated path, without a trailing slash.
    pub path: String,

    /// Directory or file.
    pub kind: EntryKind,

    /// Decompressed payload. Always empty for directories.
    pub data: Vec<u8>,

    /// Compression to use when the entry is written back.
    pub compression: Compression,
}

impl PackageEntry {
    /// Create a file entry.
    pub fn file(path: impl Into<String>, data: Vec<u8>, compression: Compression) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            data,
            compression,
        }
    }

    /// Create a directory placeholder.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            data: Vec::new(),
            compression: Compression::Stored,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// An extracted presentation container: entries in the order they were read.
///
/// Paths are unique. Only the payload of existing file entries can change
/// after insertion, so the set of paths survives extract, mutate and repack.
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<PackageEntry>,
    index: HashMap<String, usize>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns the entry back if its path is already taken.
    pub fn insert(&mut self, entry: PackageEntry) -> std::result::Result<(), PackageEntry> {
        if self.index.contains_key(&entry.path) {
            return Err(entry);
        }
        self.index.insert(entry.path.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Look up an entry by path.
    pub fn get(&self, path: &str) -> Option<&PackageEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    /// Replace the payload of a file entry.
    ///
    /// Returns `false` if there is no file entry at `path`.
    pub fn set_data(&mut self, path: &str, data: Vec<u8>) -> bool {
        match self.index.get(path) {
            Some(&i) if !self.entries[i].is_dir() => {
                self.entries[i].data = data;
                true
            }
            _ => false,
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    /// Paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A slide part selected for numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePart {
    /// Path of the part within the package.
    pub path: String,

    /// 1-based position in filename order.
    pub index: usize,
}

/// Where the page-number shape went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertionPoint {
    /// Before `</p:spTree>`.
    ShapeTree,
    /// Before `</p:cSld>`.
    SlideContent,
}

/// What happened to one slide part.
#[derive(Debug, Clone)]
pub struct SlideOutcome {
    pub slide: SlidePart,
    pub result: std::result::Result<InsertionPoint, SlideMutationError>,
}

impl SlideOutcome {
    pub fn is_numbered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-slide outcomes of one numbering run.
///
/// Skipped slides do not make the run fail; they are kept here for
/// diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct NumberingReport {
    outcomes: Vec<SlideOutcome>,
}

impl NumberingReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: SlideOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SlideOutcome] {
        &self.outcomes
    }

    /// Number of slide parts that were located.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of slides that received a page-number shape.
    pub fn numbered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_numbered()).count()
    }

    /// Slides left unmodified.
    pub fn skipped(&self) -> impl Iterator<Item = &SlideOutcome> {
        self.outcomes.iter().filter(|o| !o.is_numbered())
    }
}

/// The single result reported for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    Completed { slides: usize },
    Failed { message: String },
}

impl ProcessingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The message delivered with the completion notification.
    pub fn message(&self) -> String {
        match self {
            Self::Completed { slides } => {
                format!("Successfully added slide numbers to {} slides", slides)
            }
            Self::Failed { message } => message.clone(),
        }
    }
}
