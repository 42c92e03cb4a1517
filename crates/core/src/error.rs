//! Error types for adding page numbers to presentations.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a numbering run.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller-chosen input could not be opened or read.
    #[error("Input unavailable: {0}")]
    SourceUnavailable(String),

    /// The input is not a readable ZIP container.
    #[error("Invalid presentation package: {0}")]
    ArchiveFormat(String),

    /// A single slide could not be numbered.
    ///
    /// The pipeline records these per slide and keeps going; this variant
    /// exists so the failure can still be expressed as an [`Error`].
    #[error("Slide mutation error: {0}")]
    SlideMutation(#[from] SlideMutationError),

    /// The caller-chosen output could not be opened or written.
    #[error("Output unavailable: {0}")]
    SinkUnavailable(String),

    /// Anything else, typically staging I/O.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Why a slide part was left unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlideMutationError {
    /// Neither `</p:spTree>` nor `</p:cSld>` occurs in the part.
    #[error("no </p:spTree> or </p:cSld> closing tag")]
    MissingInsertionPoint,

    /// The part is not valid UTF-8.
    #[error("slide part is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// No file entry exists at the slide's path.
    #[error("slide part not found in package")]
    PartNotFound,
}
