//! Rate-controlled replay of newline-delimited query logs.
//!
//! Reads one record per line, decodes it, hands the query and its
//! parameters to a consumer, and paces delivery toward a target rate
//! with a feedback-corrected delay.
//!
//! # Architecture
//!
//! - [`RecordReader`] yields raw lines from any `Read + Seek` source
//! - [`JsonRecordDecoder`] extracts the query and parameters from a JSON line
//! - [`ThrottleController`] converges the achieved rate toward the target
//! - [`ReplayLoop`] orchestrates read → decode → consume → throttle → loop
//!
//! A run is single-threaded and owns its file handle and throttle state.
//! Run several [`ReplayLoop`]s on separate threads for parallel replay;
//! they share nothing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decoder;
pub mod reader;
pub mod replay;
pub mod throttle;

pub use decoder::JsonRecordDecoder;
pub use reader::RecordReader;
pub use replay::{run, ReplayLoop, ReplaySummary, StopReason};
pub use throttle::ThrottleController;
