//! Sequences extraction, numbering and repackaging of a presentation.

use crate::archive;
use crate::locator::locate;
use crate::mutator::SlideMutator;
use crate::staging::{Scratch, StagingArea};
use pagenum_core::{
    Error, InputProvider, InsertionPoint, NumberingOptions, NumberingReport, OutputSink, Package,
    ProcessingOutcome, ProgressListener, Result, SlideMutationError, SlideOutcome, SlidePart, Stage,
};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Adds a page-number shape to every slide of a presentation.
pub struct SlideNumberer {
    options: NumberingOptions,
    mutator: SlideMutator,
}

impl SlideNumberer {
    /// Create a numberer with default options.
    pub fn new() -> Self {
        Self::with_options(NumberingOptions::default())
    }

    pub fn with_options(options: NumberingOptions) -> Self {
        let mutator = SlideMutator::with_style(options.style.clone());
        Self { options, mutator }
    }

    pub fn options(&self) -> &NumberingOptions {
        &self.options
    }

    /// Run the whole pipeline and report completion exactly once.
    ///
    /// Nothing is written to `output` unless every earlier stage succeeded.
    pub fn process(
        &self,
        input: &dyn InputProvider,
        output: &dyn OutputSink,
        listener: &dyn ProgressListener,
    ) -> ProcessingOutcome {
        let outcome = match self.run(input, output, listener) {
            Ok(report) => {
                for skipped in report.skipped() {
                    log::debug!("Slide {} left unnumbered", skipped.slide.path);
                }
                ProcessingOutcome::Completed {
                    slides: report.total(),
                }
            }
            Err(e) => {
                log::warn!("Numbering failed: {}", e);
                ProcessingOutcome::Failed {
                    message: format!("Error: {}", e),
                }
            }
        };

        listener.on_complete(outcome.is_success(), &outcome.message());
        outcome
    }

    /// Run the pipeline, reporting progress but not completion.
    pub fn run(
        &self,
        input: &dyn InputProvider,
        output: &dyn OutputSink,
        listener: &dyn ProgressListener,
    ) -> Result<NumberingReport> {
        enter(listener, Stage::Opening);
        let staging = StagingArea::acquire(&self.options.staging)?;
        let staged = stage_input(&staging, input)?;

        enter(listener, Stage::Extracting);
        let mut package = archive::extract(staged)?;

        enter(listener, Stage::LocatingSlides);
        let slides = locate(&package);

        enter(listener, Stage::Numbering);
        let report = self.number_package(&mut package, &slides, listener);

        enter(listener, Stage::Repackaging);
        let packed = archive::pack(&package, staging.scratch("output.pptx")?)?;
        drop(package);

        enter(listener, Stage::Saving);
        save(packed, output)?;
        staging.release();

        enter(listener, Stage::Done);
        Ok(report)
    }

    /// Number the given slides of an extracted package in place.
    ///
    /// A slide that cannot be numbered keeps its original bytes; its
    /// failure is logged and recorded in the report.
    pub fn number_package(
        &self,
        package: &mut Package,
        slides: &[SlidePart],
        listener: &dyn ProgressListener,
    ) -> NumberingReport {
        let mut report = NumberingReport::new();
        let total = slides.len();

        for (position, slide) in slides.iter().enumerate() {
            let result = self.number_slide(package, slide);
            if let Err(e) = &result {
                log::warn!("Could not number {}: {}", slide.path, e);
            }
            report.push(SlideOutcome {
                slide: slide.clone(),
                result,
            });

            listener.on_progress(
                Stage::numbering_percent(position, total),
                &format!("Processing slide {}...", slide.index),
            );
        }

        report
    }

    fn number_slide(
        &self,
        package: &mut Package,
        slide: &SlidePart,
    ) -> std::result::Result<InsertionPoint, SlideMutationError> {
        let entry = package
            .get(&slide.path)
            .filter(|e| !e.is_dir())
            .ok_or(SlideMutationError::PartNotFound)?;
        let xml = std::str::from_utf8(&entry.data)
            .map_err(|e| SlideMutationError::InvalidEncoding(e.to_string()))?;

        let (mutated, point) = self.mutator.insert(xml, slide.index)?;
        package.set_data(&slide.path, mutated.into_bytes());

        Ok(point)
    }
}

impl Default for SlideNumberer {
    fn default() -> Self {
        Self::new()
    }
}

fn enter(listener: &dyn ProgressListener, stage: Stage) {
    log::debug!("Stage {:?}", stage);
    listener.on_progress(stage.percent(), stage.message());
}

/// Copy the caller's input into staging, rewound and ready to read.
fn stage_input(staging: &StagingArea, input: &dyn InputProvider) -> Result<Box<dyn Scratch>> {
    let mut staged = staging.scratch("input.pptx")?;
    let mut source = input.open()?;

    let copied = copy_between(
        &mut source,
        &mut staged,
        |e| Error::SourceUnavailable(format!("Failed to read input: {}", e)),
        |e| Error::Unexpected(format!("Failed to stage input: {}", e)),
    )?;
    staged
        .seek(SeekFrom::Start(0))
        .map_err(|e| Error::Unexpected(format!("Failed to rewind staged input: {}", e)))?;

    log::debug!("Staged {} input bytes", copied);
    Ok(staged)
}

/// Copy the packed output to the caller's sink.
fn save(mut packed: Box<dyn Scratch>, output: &dyn OutputSink) -> Result<()> {
    packed
        .seek(SeekFrom::Start(0))
        .map_err(|e| Error::Unexpected(format!("Failed to rewind packed output: {}", e)))?;

    let mut sink = output.open()?;
    let write_error = |e: io::Error| Error::SinkUnavailable(format!("Failed to write output: {}", e));
    copy_between(
        &mut packed,
        &mut sink,
        |e| Error::Unexpected(format!("Failed to read packed output: {}", e)),
        write_error,
    )?;
    sink.flush().map_err(write_error)?;

    Ok(())
}

/// Like `io::copy`, but tells read failures from write failures.
fn copy_between(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    read_error: impl Fn(io::Error) -> Error,
    write_error: impl Fn(io::Error) -> Error,
) -> Result<u64> {
    let mut buf = vec![0u8; 64 * 1024];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(e)),
        };
        writer.write_all(&buf[..n]).map_err(&write_error)?;
        copied += n as u64;
    }
}
