//! Decoded records and the decoder seam.
//!
//! The replay loop never inspects raw lines itself: every line goes
//! through a [`RecordDecoder`], so alternate record formats can be
//! substituted without touching the loop.

use std::error::Error;
use std::fmt;

/// One decoded input line.
///
/// Records are transient: the replay loop builds one per line and drops
/// it once the consumer returns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// The query to replay. Empty when the query field is absent.
    pub query: String,
    /// Ordered query parameters. Empty when parameters are disabled or absent.
    pub params: Vec<String>,
}

impl Record {
    /// Create a record with the given query and parameters.
    pub fn new(query: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}

/// Decodes one raw line into a [`Record`].
///
/// Implementations must be tolerant: missing or mistyped fields decode
/// to empty values. The only failure is a line that is not a valid
/// record at all.
pub trait RecordDecoder {
    /// Decode `line` (without its trailing newline).
    fn decode(&self, line: &[u8]) -> Result<Record, DecodeError>;
}

impl<D: RecordDecoder + ?Sized> RecordDecoder for &D {
    fn decode(&self, line: &[u8]) -> Result<Record, DecodeError> {
        (**self).decode(line)
    }
}

impl<D: RecordDecoder + ?Sized> RecordDecoder for Box<D> {
    fn decode(&self, line: &[u8]) -> Result<Record, DecodeError> {
        (**self).decode(line)
    }
}

/// A line could not be decoded as a structured record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    /// Human-readable description of what went wrong.
    pub reason: String,
}

impl DecodeError {
    /// Create a decode error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record: {}", self.reason)
    }
}

impl Error for DecodeError {}
