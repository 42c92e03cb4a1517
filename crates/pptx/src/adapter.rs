//! Ready-made inputs, outputs and listeners for callers of the pipeline.

use crate::pipeline::SlideNumberer;
use pagenum_core::{
    Error, InputProvider, OutputSink, ProcessingOutcome, ProgressEvent, ProgressListener, Result,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Reads the presentation from a file.
#[derive(Debug, Clone)]
pub struct FileInput {
    path: PathBuf,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputProvider for FileInput {
    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::SourceUnavailable(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Writes the result to a file, created (or truncated) only when saving.
#[derive(Debug, Clone)]
pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileOutput {
    fn open(&self) -> Result<Box<dyn Write + '_>> {
        let file = File::create(&self.path).map_err(|e| {
            Error::SinkUnavailable(format!("Failed to create {}: {}", self.path.display(), e))
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Reads the presentation from bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemoryInput {
    data: Vec<u8>,
}

impl MemoryInput {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl InputProvider for MemoryInput {
    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }
}

/// Collects the result in a shared buffer.
///
/// Clones share the same buffer, so one clone can be handed to a worker
/// thread while another is kept to read the result.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
    opened: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pipeline ever opened this sink.
    pub fn was_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// A copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OutputSink for MemorySink {
    fn open(&self) -> Result<Box<dyn Write + '_>> {
        self.opened.store(true, Ordering::SeqCst);
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| Error::SinkUnavailable("Output buffer is poisoned".to_string()))?;
        buffer.clear();
        Ok(Box::new(SharedWriter(Arc::clone(&self.buffer))))
    }
}

struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output buffer is poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Forwards notifications over a channel as [`ProgressEvent`]s.
///
/// The receiving side can drain events on its own thread, such as a UI
/// loop. Events sent after the receiver is gone are dropped.
pub struct ChannelListener {
    tx: Sender<ProgressEvent>,
}

impl ChannelListener {
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressListener for ChannelListener {
    fn on_progress(&self, percent: u8, message: &str) {
        let _ = self.tx.send(ProgressEvent::Progress {
            percent,
            message: message.to_string(),
        });
    }

    fn on_complete(&self, success: bool, message: &str) {
        let _ = self.tx.send(ProgressEvent::Complete {
            success,
            message: message.to_string(),
        });
    }
}

/// A numbering run on a worker thread.
pub struct NumberingJob {
    handle: JoinHandle<ProcessingOutcome>,
    events: Receiver<ProgressEvent>,
}

impl NumberingJob {
    /// Progress events, ending with one [`ProgressEvent::Complete`].
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Wait for the run to finish.
    pub fn join(self) -> Result<ProcessingOutcome> {
        self.handle
            .join()
            .map_err(|_| Error::Unexpected("Numbering thread panicked".to_string()))
    }
}

/// Start a numbering run off the caller's thread.
pub fn spawn_numbering<I, O>(numberer: SlideNumberer, input: I, output: O) -> Result<NumberingJob>
where
    I: InputProvider + Send + 'static,
    O: OutputSink + Send + 'static,
{
    let (tx, events) = mpsc::channel();

    let handle = thread::Builder::new()
        .name("pptx-pagenum".to_string())
        .spawn(move || {
            let listener = ChannelListener::new(tx);
            numberer.process(&input, &output, &listener)
        })
        .map_err(|e| Error::Unexpected(format!("Failed to start numbering thread: {}", e)))?;

    Ok(NumberingJob { handle, events })
}
