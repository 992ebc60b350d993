//! Background query-timing logger for Tempo replays.
//!
//! Consumers call [`AsyncLogger::log`] with the query they executed and
//! how long it took. Entries are queued and written by a dedicated
//! worker thread, so serialization and sink I/O never sit on the
//! replay loop's pacing path.
//!
//! # Architecture
//!
//! - [`QueryLogEntry`] is one serialized JSON line
//! - [`QuerySink`] is the byte destination; [`WriterSink`] wraps any
//!   `Write`, [`NullSink`] discards everything
//! - [`AsyncLogger`] owns the worker; [`QueryLogHandle`] lets other
//!   threads log into the same queue
//!
//! Logging is best-effort: a failed entry is counted and skipped, and
//! never reaches a producer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod entry;
pub mod logger;
pub mod sink;

pub use entry::QueryLogEntry;
pub use logger::{AsyncLogger, DrainReport, QueryLogHandle};
pub use sink::{NullSink, QuerySink, WriterSink};
