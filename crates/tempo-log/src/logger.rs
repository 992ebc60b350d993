//! The background logger and its worker thread.
//!
//! Producers push [`QueryLogEntry`] values into a crossbeam channel; a
//! single worker thread owns the sink, encodes entries in FIFO order,
//! and writes them. Closing the logger signals the worker on a separate
//! shutdown channel: the worker drains whatever is already queued,
//! drops its receiver so later `log` calls are rejected, closes the
//! sink, and exits. Outstanding [`QueryLogHandle`]s do not hold the
//! worker open.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};

use crate::entry::QueryLogEntry;
use crate::sink::{NullSink, QuerySink};

/// What the worker did over the logger's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries encoded and written to the sink.
    pub written: u64,
    /// Entries skipped because encoding or writing failed.
    pub failed: u64,
    /// Whether the sink closed without error.
    pub sink_closed: bool,
}

/// Queue-decoupled query logger.
///
/// [`log`](Self::log) never touches the sink: it only enqueues. With an
/// unbounded queue ([`spawn`](Self::spawn)) producers never block; with
/// a bounded one ([`spawn_bounded`](Self::spawn_bounded)) they block
/// while the queue is full. Entries enqueued before [`close`](Self::close)
/// are never dropped and are written in the order they were enqueued.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tempo_log::{AsyncLogger, WriterSink};
///
/// let logger = AsyncLogger::spawn(WriterSink::new(Vec::new())).unwrap();
/// let handle = logger.handle();
/// logger.log("SELECT 1", Duration::from_micros(250));
/// handle.log("SELECT 2", Duration::from_micros(310));
/// let report = logger.close();
/// assert_eq!(report.written, 2);
/// assert!(report.sink_closed);
/// ```
pub struct AsyncLogger {
    tx: Sender<QueryLogEntry>,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<DrainReport>>,
}

impl AsyncLogger {
    /// Start a worker writing to `sink` behind an unbounded queue.
    pub fn spawn<S: QuerySink + 'static>(sink: S) -> io::Result<Self> {
        Self::start(crossbeam_channel::unbounded(), sink)
    }

    /// Start a worker writing to `sink` behind a queue of `capacity`
    /// entries. A capacity of `0` makes every `log` a rendezvous with
    /// the worker.
    pub fn spawn_bounded<S: QuerySink + 'static>(sink: S, capacity: usize) -> io::Result<Self> {
        Self::start(crossbeam_channel::bounded(capacity), sink)
    }

    /// A logger that accepts entries and discards them.
    pub fn discard() -> io::Result<Self> {
        Self::spawn(NullSink)
    }

    fn start<S: QuerySink + 'static>(
        (tx, rx): (Sender<QueryLogEntry>, Receiver<QueryLogEntry>),
        sink: S,
    ) -> io::Result<Self> {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);
        let worker = thread::Builder::new()
            .name("tempo-query-log".into())
            .spawn(move || drain_loop(rx, shutdown_rx, sink))?;
        Ok(Self {
            tx,
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
        })
    }

    /// Enqueue one entry.
    pub fn log(&self, query: impl Into<String>, elapsed: Duration) {
        enqueue(&self.tx, QueryLogEntry::new(query, elapsed));
    }

    /// A cloneable producer handle for other threads.
    ///
    /// Entries logged through a handle after [`close`](Self::close) are
    /// rejected with a warning.
    pub fn handle(&self) -> QueryLogHandle {
        QueryLogHandle {
            tx: self.tx.clone(),
        }
    }

    /// Stop accepting entries, wait for the worker to drain the queue and
    /// close the sink, and report what it did.
    ///
    /// Does not wait for outstanding [`QueryLogHandle`]s to be dropped.
    pub fn close(mut self) -> DrainReport {
        self.shutdown()
    }

    fn shutdown(&mut self) -> DrainReport {
        // Disconnecting the shutdown channel wakes the worker.
        drop(self.shutdown.take());
        let Some(worker) = self.worker.take() else {
            return DrainReport::default();
        };
        match worker.join() {
            Ok(report) => report,
            Err(_) => {
                tracing::error!("query log worker panicked");
                DrainReport::default()
            }
        }
    }
}

impl Drop for AsyncLogger {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown();
        }
    }
}

/// Producer side of an [`AsyncLogger`], for use from other threads.
#[derive(Clone)]
pub struct QueryLogHandle {
    tx: Sender<QueryLogEntry>,
}

impl QueryLogHandle {
    /// Enqueue one entry.
    pub fn log(&self, query: impl Into<String>, elapsed: Duration) {
        enqueue(&self.tx, QueryLogEntry::new(query, elapsed));
    }
}

fn enqueue(tx: &Sender<QueryLogEntry>, entry: QueryLogEntry) {
    // Fails once the logger is closed or its worker panicked.
    if let Err(e) = tx.send(entry) {
        tracing::warn!(query = %e.into_inner().query, "query logger closed, entry rejected");
    }
}

/// Worker body. Runs until the shutdown channel disconnects (or every
/// producer is gone), drains what is already queued, then closes the sink.
fn drain_loop<S: QuerySink>(
    rx: Receiver<QueryLogEntry>,
    shutdown: Receiver<()>,
    mut sink: S,
) -> DrainReport {
    tracing::debug!("query log worker started");
    let mut report = DrainReport::default();
    let mut buf = Vec::with_capacity(256);

    loop {
        select! {
            recv(rx) -> entry => match entry {
                Ok(entry) => write_entry(&mut sink, &mut buf, &entry, &mut report),
                Err(_) => break,
            },
            recv(shutdown) -> _ => {
                while let Ok(entry) = rx.try_recv() {
                    write_entry(&mut sink, &mut buf, &entry, &mut report);
                }
                break;
            },
        }
    }
    // Later sends now fail instead of queueing.
    drop(rx);

    report.sink_closed = match sink.close() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "query log sink failed to close");
            false
        }
    };
    tracing::debug!(
        written = report.written,
        failed = report.failed,
        "query log drained"
    );
    report
}

fn write_entry<S: QuerySink>(
    sink: &mut S,
    buf: &mut Vec<u8>,
    entry: &QueryLogEntry,
    report: &mut DrainReport,
) {
    buf.clear();
    let result = entry
        .encode_into(&mut *buf)
        .map_err(io::Error::from)
        .and_then(|()| sink.write_record(buf.as_slice()));
    match result {
        Ok(()) => report.written += 1,
        Err(e) => {
            report.failed += 1;
            tracing::warn!(error = %e, query = %entry.query, "dropped query log entry");
        }
    }
}
