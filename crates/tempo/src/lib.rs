//! Tempo: replay a recorded query workload at a controlled rate.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tempo sub-crates. For most users, adding `tempo` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use tempo::prelude::*;
//!
//! tempo::logging::init();
//!
//! let config = ReplayConfig::new("queries.jsonl", "query")
//!     .with_params_field("params")
//!     .with_target_rate(500)
//!     .with_max_count(10_000);
//!
//! let logger = AsyncLogger::spawn(WriterSink::create("timings.jsonl")?)?;
//! let timings = logger.handle();
//!
//! let summary = tempo::replay::run(config, |query: &str, params: &[String]| {
//!     let started = Instant::now();
//!     // Execute `query` with `params` against the system under test.
//!     let _ = params;
//!     timings.log(query, started.elapsed());
//!     Ok(Flow::Continue)
//! })?;
//!
//! let report = logger.close();
//! println!("replayed {} records, logged {}", summary.records, report.written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tempo-core` | Config, records, consumer trait, errors |
//! | [`replay`] | `tempo-replay` | Line reader, JSON decoder, throttle, replay loop |
//! | [`log`] | `tempo-log` | Query log entries, sinks, background logger |
//! | [`logging`] | | Diagnostic `tracing` subscriber setup |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Configuration, records, and the consumer seam (`tempo-core`).
pub use tempo_core as types;

/// The rate-controlled replay loop (`tempo-replay`).
///
/// Start with [`replay::ReplayLoop`] or the one-shot [`replay::run`].
pub use tempo_replay as replay;

/// Background query-timing logger (`tempo-log`).
///
/// [`log::AsyncLogger`] owns a worker thread writing to a
/// [`log::QuerySink`].
pub use tempo_log as log;

pub mod logging;

/// Common imports for typical Tempo usage.
///
/// ```rust
/// use tempo::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tempo_core::{
        BoxError, Flow, Record, RecordConsumer, RecordDecoder, ReplayConfig, ReplayError,
    };

    // Replay
    pub use tempo_replay::{JsonRecordDecoder, ReplayLoop, ReplaySummary, StopReason};

    // Query log
    pub use tempo_log::{AsyncLogger, DrainReport, QueryLogHandle, QuerySink, WriterSink};
}
