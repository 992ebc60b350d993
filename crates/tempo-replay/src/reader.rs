//! Buffered, resumable line reader.
//!
//! [`RecordReader`] yields raw lines from any `Read + Seek` source.
//! Lines may be arbitrarily long: the line buffer grows instead of
//! truncating. End of input is `Ok(None)`, never an error.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Reads newline-delimited records from a seekable byte stream.
///
/// Generic over `R: Read + Seek` so tests can use `Cursor<Vec<u8>>` and
/// production code can use `File`.
pub struct RecordReader<R: Read + Seek> {
    reader: BufReader<R>,
    line: Vec<u8>,
    lines_read: u64,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Wrap `inner`, reading from its current position.
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            line: Vec::new(),
            lines_read: 0,
        }
    }

    /// Read the next line, without its `\n` or `\r\n` terminator.
    ///
    /// Returns `None` at end of input. A final line with no terminator
    /// is still returned.
    pub fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        if !self.fill_line()? {
            return Ok(None);
        }
        self.lines_read += 1;
        Ok(Some(&self.line))
    }

    /// Read and discard the rest of the current line.
    ///
    /// Returns `false` if the reader was already at end of input.
    pub fn skip_line(&mut self) -> io::Result<bool> {
        self.fill_line()
    }

    /// Reposition to `offset` bytes from the start of the stream.
    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Reposition to the start of the stream.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.seek_to(0)
    }

    /// Total length of the underlying stream in bytes.
    ///
    /// The read position is left unchanged.
    pub fn stream_len(&mut self) -> io::Result<u64> {
        let pos = self.reader.stream_position()?;
        let end = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }

    /// Number of lines returned by [`next_line`](Self::next_line) so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Convert into an iterator of owned lines.
    pub fn lines(self) -> LineIter<R> {
        LineIter {
            reader: self,
            done: false,
        }
    }

    fn fill_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        if self.line.last() == Some(&b'\n') {
            self.line.pop();
            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
        }
        Ok(true)
    }
}

/// Iterator adapter over owned lines.
pub struct LineIter<R: Read + Seek> {
    reader: RecordReader<R>,
    done: bool,
}

impl<R: Read + Seek> Iterator for LineIter<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_line() {
            Ok(Some(line)) => Some(Ok(line.to_vec())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
