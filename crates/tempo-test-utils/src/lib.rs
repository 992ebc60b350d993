//! Test fixtures for Tempo development.
//!
//! Provides on-disk input files ([`InputFile`]), a scripted
//! [`RecordingConsumer`], and sinks that record what the query logger
//! did ([`RecordingSink`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{InputFile, RecordingConsumer, RecordingSink, SinkEvent};
