//! Contracts between the numbering pipeline and its caller.
//!
//! The caller supplies where bytes come from ([`InputProvider`]), where they
//! go ([`OutputSink`]), and who hears about progress ([`ProgressListener`]).
//! None of these assume a particular threading model.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Opening,
    Extracting,
    LocatingSlides,
    Numbering,
    Repackaging,
    Saving,
    Done,
}

impl Stage {
    /// Percentage reported when the stage starts.
    pub fn percent(self) -> u8 {
        match self {
            Self::Opening => 10,
            Self::Extracting => 20,
            Self::LocatingSlides => 40,
            Self::Numbering => 50,
            Self::Repackaging => 80,
            Self::Saving => 90,
            Self::Done => 100,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Opening => "Opening presentation...",
            Self::Extracting => "Extracting presentation...",
            Self::LocatingSlides => "Processing slides...",
            Self::Numbering => "Adding slide numbers...",
            Self::Repackaging => "Rebuilding presentation...",
            Self::Saving => "Saving file...",
            Self::Done => "Processing complete!",
        }
    }

    /// Progress after numbering the slide at 0-based `position` of `total`.
    ///
    /// Starts at 50 and stays below 80.
    pub fn numbering_percent(position: usize, total: usize) -> u8 {
        if total == 0 {
            return Self::Numbering.percent();
        }
        let span = (Self::Repackaging.percent() - Self::Numbering.percent()) as usize;
        Self::Numbering.percent() + (position.min(total - 1) * span / total) as u8
    }
}

/// Receives progress and exactly one completion per run.
pub trait ProgressListener {
    /// Called with non-decreasing percentages.
    fn on_progress(&self, percent: u8, message: &str);

    /// Called once, last.
    fn on_complete(&self, success: bool, message: &str);
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ProgressListener for NoopListener {
    fn on_progress(&self, _percent: u8, _message: &str) {}
    fn on_complete(&self, _success: bool, _message: &str) {}
}

/// Opens the caller's input.
///
/// Fails with [`Error::SourceUnavailable`](crate::Error::SourceUnavailable).
pub trait InputProvider {
    fn open(&self) -> Result<Box<dyn Read + '_>>;
}

/// Opens the caller's output.
///
/// Fails with [`Error::SinkUnavailable`](crate::Error::SinkUnavailable).
/// Not called at all unless the run reaches [`Stage::Saving`].
pub trait OutputSink {
    fn open(&self) -> Result<Box<dyn Write + '_>>;
}

/// A progress notification as a value, for handing across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    Progress { percent: u8, message: String },
    Complete { success: bool, message: String },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}
