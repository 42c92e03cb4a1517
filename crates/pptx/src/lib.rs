//! PPTX (Office Open XML) backend for adding page numbers to presentations.
//!
//! A .pptx file is a ZIP archive of XML parts. This crate extracts it,
//! inserts a page-number shape into each slide part, and packs it again.

pub mod adapter;
pub mod archive;
pub mod locator;
pub mod mutator;
pub mod pipeline;
pub mod staging;

#[cfg(test)]
mod test_support;

pub use adapter::{spawn_numbering, ChannelListener, FileInput, FileOutput, MemoryInput, MemorySink, NumberingJob};
pub use locator::locate;
pub use mutator::SlideMutator;
pub use pipeline::SlideNumberer;
