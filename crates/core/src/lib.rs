//! Core domain types, errors, and caller contracts for adding page
//! numbers to presentations.

pub mod error;
pub mod options;
pub mod progress;
pub mod types;

pub use error::{Error, Result, SlideMutationError};
pub use options::{NumberingOptions, ShapeStyle, StagingMode};
pub use progress::{InputProvider, NoopListener, OutputSink, ProgressEvent, ProgressListener, Stage};
pub use types::{
    Compression, EntryKind, InsertionPoint, NumberingReport, Package, PackageEntry,
    ProcessingOutcome, SlideOutcome, SlidePart,
};
