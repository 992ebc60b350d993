//! Reusable replay and logging fixtures.
//!
//! - [`InputFile`]: a temporary newline-delimited input file.
//! - [`RecordingConsumer`]: records every call, optionally stops or fails
//!   on a given call, optionally logs into a query logger.
//! - [`RecordingSink`]: a [`QuerySink`] that records writes and the close.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tempfile::NamedTempFile;
use tempo_core::{BoxError, Flow, RecordConsumer, ReplayConfig};
use tempo_log::{QueryLogHandle, QuerySink};

/// A temporary input file, deleted on drop.
pub struct InputFile {
    file: NamedTempFile,
}

impl InputFile {
    /// Write each line followed by `\n`.
    pub fn with_lines(lines: &[&str]) -> Self {
        let mut bytes = Vec::new();
        for line in lines {
            bytes.extend_from_slice(line.as_bytes());
            bytes.push(b'\n');
        }
        Self::with_bytes(&bytes)
    }

    /// Write `bytes` verbatim.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut file = NamedTempFile::new().expect("create temp input file");
        file.write_all(bytes).expect("write temp input file");
        file.flush().expect("flush temp input file");
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// A single-pass, unthrottled config reading `query_field`.
    pub fn config(&self, query_field: &str) -> ReplayConfig {
        ReplayConfig::new(self.path(), query_field)
    }
}

/// Consumer that records `(query, params)` for every call.
#[derive(Default)]
pub struct RecordingConsumer {
    calls: Vec<(String, Vec<String>)>,
    stop_after: Option<usize>,
    fail_at: Option<usize>,
    logger: Option<QueryLogHandle>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return [`Flow::Stop`] from the `n`th call (1-based).
    pub fn stop_after(mut self, n: usize) -> Self {
        self.stop_after = Some(n);
        self
    }

    /// Return an error from the `n`th call (1-based).
    pub fn fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Log every call's query and measured duration into `handle`.
    pub fn logging_to(mut self, handle: QueryLogHandle) -> Self {
        self.logger = Some(handle);
        self
    }

    /// Every call so far, including a failing one.
    pub fn calls(&self) -> &[(String, Vec<String>)] {
        &self.calls
    }

    pub fn queries(&self) -> Vec<&str> {
        self.calls.iter().map(|(q, _)| q.as_str()).collect()
    }
}

impl RecordConsumer for RecordingConsumer {
    fn consume(&mut self, query: &str, params: &[String]) -> Result<Flow, BoxError> {
        let started = Instant::now();
        self.calls.push((query.to_string(), params.to_vec()));
        let call = self.calls.len();
        if let Some(logger) = &self.logger {
            logger.log(query, started.elapsed());
        }
        if self.fail_at == Some(call) {
            return Err(format!("consumer failed on call {call}").into());
        }
        if self.stop_after == Some(call) {
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }
}

/// One observed sink operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Write(Vec<u8>),
    FailedWrite,
    Close,
}

/// Sink that records every write and the close, in order.
///
/// Clones share state, so keep one clone for assertions and hand the
/// other to the logger.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
    fail_writes: Arc<Vec<usize>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given write attempts (1-based) with an I/O error.
    pub fn failing_writes(writes: &[usize]) -> Self {
        Self {
            events: Arc::default(),
            fail_writes: Arc::new(writes.to_vec()),
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().expect("sink state poisoned").clone()
    }

    /// Successfully written records as UTF-8 lines.
    pub fn records(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Write(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                SinkEvent::FailedWrite | SinkEvent::Close => None,
            })
            .collect()
    }

    /// Whether the sink was closed exactly once, as the final event.
    pub fn closed_last(&self) -> bool {
        let events = self.events();
        let closes = events.iter().filter(|e| **e == SinkEvent::Close).count();
        closes == 1 && events.last() == Some(&SinkEvent::Close)
    }
}

impl QuerySink for RecordingSink {
    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        let mut events = self.events.lock().expect("sink state poisoned");
        let attempt = events.len() + 1;
        if self.fail_writes.contains(&attempt) {
            events.push(SinkEvent::FailedWrite);
            return Err(io::Error::other(format!("write {attempt} failed")));
        }
        events.push(SinkEvent::Write(record.to_vec()));
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.events
            .lock()
            .expect("sink state poisoned")
            .push(SinkEvent::Close);
        Ok(())
    }
}
