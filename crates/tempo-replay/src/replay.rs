//! The replay loop.
//!
//! [`ReplayLoop`] owns the input file, the decoder, the random-start
//! generator, and the throttle state for one run. A run cycles through
//!
//! ```text
//! Opening → [Seeking] → Reading ⇄ Decoding ⇄ Consuming ⇄ Throttling
//!         → (Rewinding → Reading) | Closed
//! ```
//!
//! and reaches `Closed` on an I/O error, a decode error, a consumer
//! error, a consumer stop, the max-count cutoff, end of input with
//! looping disabled, or an empty looping input. The file handle is
//! owned by the run and released on every one of those paths.

use std::fs::File;
use std::io::{Read, Seek};
use std::thread;
use std::time::Instant;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempo_core::{
    BoxError, Flow, RecordConsumer, RecordContext, RecordDecoder, ReplayConfig, ReplayError,
};

use crate::decoder::JsonRecordDecoder;
use crate::reader::RecordReader;
use crate::throttle::ThrottleController;

/// Why a run ended cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// End of input reached with looping disabled.
    EndOfInput,
    /// The consumer returned [`Flow::Stop`].
    ConsumerStopped,
    /// The configured `max_count` was reached.
    MaxCount,
    /// Looping was enabled but a full pass from the start of the file
    /// produced no records.
    EmptyInput,
}

/// Outcome of a clean run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Successful consumer invocations across all passes.
    pub records: u64,
    /// Passes started, including the first.
    pub passes: u64,
    /// Why the run ended.
    pub stop: StopReason,
}

/// Rate-controlled replay over one input file.
///
/// Generic over the record decoder and the random-start generator so
/// tests can inject both. [`ReplayLoop::new`] uses
/// [`JsonRecordDecoder`] and a ChaCha8 generator seeded from
/// [`ReplayConfig::seed`].
///
/// # Examples
///
/// ```no_run
/// use tempo_core::{Flow, ReplayConfig};
/// use tempo_replay::ReplayLoop;
///
/// let config = ReplayConfig::new("queries.jsonl", "query")
///     .with_params_field("params")
///     .with_target_rate(500)
///     .with_max_count(10_000);
/// let mut replay = ReplayLoop::new(config).unwrap();
/// let summary = replay
///     .run(|query, params| {
///         println!("{query} {params:?}");
///         Ok(Flow::Continue)
///     })
///     .unwrap();
/// println!("replayed {} records", summary.records);
/// ```
pub struct ReplayLoop<D = JsonRecordDecoder, G = ChaCha8Rng> {
    config: ReplayConfig,
    decoder: D,
    rng: G,
}

impl ReplayLoop {
    /// Validate `config` and build a loop with the JSON decoder.
    pub fn new(config: ReplayConfig) -> Result<Self, ReplayError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let decoder = JsonRecordDecoder::from_config(&config);
        Ok(Self {
            config,
            decoder,
            rng,
        })
    }
}

impl<D: RecordDecoder, G: RngCore> ReplayLoop<D, G> {
    /// Replace the random-start generator.
    pub fn with_rng<G2: RngCore>(self, rng: G2) -> ReplayLoop<D, G2> {
        ReplayLoop {
            config: self.config,
            decoder: self.decoder,
            rng,
        }
    }

    /// Replace the record decoder.
    pub fn with_decoder<D2: RecordDecoder>(self, decoder: D2) -> ReplayLoop<D2, G> {
        ReplayLoop {
            config: self.config,
            decoder,
            rng: self.rng,
        }
    }

    /// The configuration this loop runs with.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay the input, calling `callback(query, params)` once per record.
    pub fn run<F>(&mut self, mut callback: F) -> Result<ReplaySummary, ReplayError>
    where
        F: FnMut(&str, &[String]) -> Result<Flow, BoxError>,
    {
        self.run_consumer(&mut callback)
    }

    /// Replay the input into `consumer`.
    pub fn run_consumer<C>(&mut self, consumer: &mut C) -> Result<ReplaySummary, ReplayError>
    where
        C: RecordConsumer + ?Sized,
    {
        let file = File::open(&self.config.path)?;
        let size = file.metadata()?.len();
        let mut reader = RecordReader::new(file);

        tracing::info!(
            path = %self.config.path.display(),
            target_rate = self.config.target_rate,
            loop_input = self.config.loop_input,
            random_start = self.config.random_start,
            max_count = self.config.max_count,
            "starting replay"
        );

        let mut from_start = true;
        if self.config.random_start {
            self.enter_at_random(&mut reader, size)?;
            from_start = false;
        }

        let mut throttle = ThrottleController::new(self.config.target_rate, Instant::now());
        let mut records = 0u64;
        let mut passes = 1u64;

        let stop = loop {
            let before = records;
            let outcome = self.replay_pass(&mut reader, &mut throttle, &mut *consumer, &mut records)?;
            if let Some(stop) = outcome {
                break stop;
            }
            if !self.config.loop_input {
                break StopReason::EndOfInput;
            }
            if from_start && records == before {
                tracing::warn!(path = %self.config.path.display(), "input has no records, not looping");
                break StopReason::EmptyInput;
            }
            reader.rewind()?;
            passes += 1;
            from_start = true;
            tracing::debug!(pass = passes, "rewound input");
        };

        tracing::info!(records, passes, stop = ?stop, "replay finished");
        Ok(ReplaySummary {
            records,
            passes,
            stop,
        })
    }

    /// Seek to a uniformly drawn offset and drop the (possibly partial)
    /// line there, so the first delivered record starts on a line
    /// boundary. Landing in the final line leaves the reader at end of
    /// input, and the first pass then delivers nothing.
    fn enter_at_random<R: Read + Seek>(
        &mut self,
        reader: &mut RecordReader<R>,
        size: u64,
    ) -> Result<(), ReplayError> {
        let offset = if size > 0 {
            self.rng.random_range(0..size)
        } else {
            0
        };
        tracing::debug!(offset, size, "random start");
        reader.seek_to(offset)?;
        reader.skip_line()?;
        Ok(())
    }

    /// One pass until end of input. Returns `Some` when the run should
    /// stop before end of input.
    fn replay_pass<R, C>(
        &self,
        reader: &mut RecordReader<R>,
        throttle: &mut ThrottleController,
        consumer: &mut C,
        records: &mut u64,
    ) -> Result<Option<StopReason>, ReplayError>
    where
        R: Read + Seek,
        C: RecordConsumer + ?Sized,
    {
        while let Some(line) = reader.next_line()? {
            let record = self
                .decoder
                .decode(line)
                .map_err(|source| ReplayError::Decode {
                    source,
                    context: RecordContext::new(&self.config, line),
                })?;

            let flow = consumer
                .consume(&record.query, &record.params)
                .map_err(|source| ReplayError::Consumer {
                    source,
                    context: RecordContext::new(&self.config, line),
                })?;
            *records += 1;
            if flow == Flow::Stop {
                return Ok(Some(StopReason::ConsumerStopped));
            }

            if self.config.max_count > 0 && *records >= self.config.max_count {
                return Ok(Some(StopReason::MaxCount));
            }

            let now = Instant::now();
            throttle.record(now);
            if let Some(pause) = throttle.pause(now) {
                thread::sleep(pause);
            }
            throttle.resume(Instant::now());
        }
        Ok(None)
    }
}

/// Replay `config` once, calling `callback(query, params)` per record.
///
/// Shorthand for [`ReplayLoop::new`] followed by [`ReplayLoop::run`].
pub fn run<F>(config: ReplayConfig, callback: F) -> Result<ReplaySummary, ReplayError>
where
    F: FnMut(&str, &[String]) -> Result<Flow, BoxError>,
{
    ReplayLoop::new(config)?.run(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::{ConfigError, DecodeError, Record};
    use tempo_test_utils::{InputFile, RecordingConsumer};

    #[test]
    fn invalid_config_never_opens_file() {
        let err = ReplayLoop::new(ReplayConfig::new("", "q")).err().unwrap();
        assert!(matches!(err, ReplayError::Config(ConfigError::EmptyPath)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let config = ReplayConfig::new("/nonexistent/tempo/q.jsonl", "q");
        let mut replay = ReplayLoop::new(config).unwrap();
        let err = replay.run(|_, _| Ok(Flow::Continue)).unwrap_err();
        assert!(matches!(err, ReplayError::Io(_)));
    }

    #[test]
    fn scenario_three_lines() {
        let input = InputFile::with_lines(&[r#"{"q":"a"}"#, r#"{"q":"b"}"#, r#"{"q":"c"}"#]);
        let mut consumer = RecordingConsumer::new();
        let summary = ReplayLoop::new(input.config("q"))
            .unwrap()
            .run_consumer(&mut consumer)
            .unwrap();
        assert_eq!(consumer.queries(), vec!["a", "b", "c"]);
        assert!(consumer.calls().iter().all(|(_, params)| params.is_empty()));
        assert_eq!(
            summary,
            ReplaySummary {
                records: 3,
                passes: 1,
                stop: StopReason::EndOfInput,
            }
        );
    }

    #[test]
    fn custom_decoder_is_used() {
        struct Raw;
        impl RecordDecoder for Raw {
            fn decode(&self, line: &[u8]) -> Result<Record, DecodeError> {
                Ok(Record::new(String::from_utf8_lossy(line), vec![]))
            }
        }

        let input = InputFile::with_lines(&["plain one", "plain two"]);
        let mut seen = Vec::new();
        ReplayLoop::new(input.config("unused"))
            .unwrap()
            .with_decoder(Raw)
            .run(|q, _| {
                seen.push(q.to_string());
                Ok(Flow::Continue)
            })
            .unwrap();
        assert_eq!(seen, vec!["plain one", "plain two"]);
    }

    #[test]
    fn injected_rng_makes_random_start_reproducible() {
        let lines: Vec<String> = (0..50).map(|i| format!(r#"{{"q":"q{i}"}}"#)).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let input = InputFile::with_lines(&refs);

        let first_query = |seed: u64| {
            let mut first = None;
            ReplayLoop::new(input.config("q").with_random_start(true))
                .unwrap()
                .with_rng(ChaCha8Rng::seed_from_u64(seed))
                .run(|q, _| {
                    first = Some(q.to_string());
                    Ok(Flow::Stop)
                })
                .unwrap();
            first
        };
        assert_eq!(first_query(7), first_query(7));
    }
}
