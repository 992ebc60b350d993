//! Core types and traits for the Tempo workload replayer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the replay loop, the query logger, and any
//! harness that wires them together: replay configuration, the decoded
//! [`Record`], the [`RecordDecoder`] and [`RecordConsumer`] seams, and
//! the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod consumer;
pub mod error;
pub mod record;

pub use config::{ConfigError, ReplayConfig};
pub use consumer::{BoxError, Flow, RecordConsumer};
pub use error::{RecordContext, ReplayError};
pub use record::{DecodeError, Record, RecordDecoder};
