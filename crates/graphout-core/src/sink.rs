//! # Output Sinks
//!
//! The byte destination a serialization session writes to.
//!
//! Four kinds of sink exist, matching the four ways of starting a session:
//! - a caller-supplied byte stream (handed over, closed on end)
//! - a filesystem path (opened here, closed on end)
//! - an in-memory buffer (read back through a [`MemoryBuffer`] handle)
//! - an externally owned open file (written through a duplicate handle,
//!   so the caller's own handle is never closed)

use crate::GraphoutError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

// =============================================================================
// MEMORY BUFFER
// =============================================================================

/// Shared handle to the bytes produced by an in-memory sink.
///
/// Cloning the handle shares the same buffer. Read it after the session
/// ends to get the final output.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the bytes written so far.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bytes as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    fn append(&self, buf: &[u8]) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
    }
}

// =============================================================================
// SINK
// =============================================================================

enum Target {
    Stream(Box<dyn Write + Send>),
    File(BufWriter<File>),
    Memory(MemoryBuffer),
    Handle(BufWriter<File>),
}

/// A bound output destination.
pub struct Sink {
    target: Target,
    written: u64,
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("kind", &self.kind())
            .field("written", &self.written)
            .finish()
    }
}

impl Sink {
    fn with_target(target: Target) -> Self {
        Self { target, written: 0 }
    }

    /// Take ownership of an open byte stream.
    #[must_use]
    pub fn from_stream(stream: Box<dyn Write + Send>) -> Self {
        Self::with_target(Target::Stream(stream))
    }

    /// Create (or truncate) the file at `path`.
    pub fn create_file(path: impl AsRef<Path>) -> Result<Self, GraphoutError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            GraphoutError::SinkOpen(format!("Cannot create '{}': {}", path.display(), e))
        })?;
        Ok(Self::with_target(Target::File(BufWriter::new(file))))
    }

    /// Accumulate output in memory.
    #[must_use]
    pub fn memory() -> (Self, MemoryBuffer) {
        let buffer = MemoryBuffer::new();
        (Self::with_target(Target::Memory(buffer.clone())), buffer)
    }

    /// Write through a duplicate of an externally owned file handle.
    ///
    /// Closing the sink closes only the duplicate.
    pub fn borrow_file(file: &File) -> Result<Self, GraphoutError> {
        let dup = file
            .try_clone()
            .map_err(|e| GraphoutError::SinkOpen(format!("Cannot duplicate file handle: {}", e)))?;
        Ok(Self::with_target(Target::Handle(BufWriter::new(dup))))
    }

    /// Short name of the sink kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.target {
            Target::Stream(_) => "stream",
            Target::File(_) => "file",
            Target::Memory(_) => "memory",
            Target::Handle(_) => "handle",
        }
    }

    /// Bytes written through this sink.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush and release the sink.
    ///
    /// Owned files and streams are dropped after flushing. For a borrowed
    /// handle only the duplicate is released.
    pub fn close(mut self) -> Result<(), GraphoutError> {
        self.flush()?;
        if let Target::File(writer) | Target::Handle(writer) = self.target {
            writer
                .into_inner()
                .map_err(|e| GraphoutError::Io(e.error().to_string()))?;
        }
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.target {
            Target::Stream(w) => w.write(buf)?,
            Target::File(w) | Target::Handle(w) => w.write(buf)?,
            Target::Memory(m) => {
                m.append(buf);
                buf.len()
            }
        };
        self.written = self.written.saturating_add(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::Stream(w) => w.flush(),
            Target::File(w) | Target::Handle(w) => w.flush(),
            Target::Memory(_) => Ok(()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
