//! Byte destinations for serialized query log entries.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A writable, closable destination for encoded entries.
///
/// Owned exclusively by the logger's worker thread once logging starts.
/// `close` is called exactly once, after the last write.
pub trait QuerySink: Send {
    /// Write one complete encoded entry.
    fn write_record(&mut self, record: &[u8]) -> io::Result<()>;

    /// Flush and release the destination.
    fn close(&mut self) -> io::Result<()>;
}

impl<S: QuerySink + ?Sized> QuerySink for Box<S> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts any `Write` into a [`QuerySink`].
///
/// `close` flushes and drops the writer, which closes files and sockets.
/// Writes after `close` fail with [`io::ErrorKind::BrokenPipe`].
pub struct WriterSink<W: Write + Send> {
    writer: Option<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    /// Whether [`close`](QuerySink::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Recover the writer, or `None` if the sink was closed.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl WriterSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path` and write to it buffered.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> QuerySink for WriterSink<W> {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(record),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "query sink is closed")),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// Accepts and discards everything. Used when query logging is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl QuerySink for NullSink {
    fn write_record(&mut self, _record: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
