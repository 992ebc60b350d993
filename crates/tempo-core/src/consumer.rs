//! The consumer seam: whatever executes a replayed query.

use std::error::Error;

/// Error type returned by consumers.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// What the replay loop should do after a consumer call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Deliver the next record.
    Continue,
    /// Stop the run cleanly.
    Stop,
}

/// Receives each decoded record from the replay loop.
///
/// Implemented for every `FnMut(&str, &[String]) -> Result<Flow, BoxError>`,
/// so plain closures work. Returning `Err` aborts the run; the loop
/// wraps the error with the record that triggered it.
pub trait RecordConsumer {
    /// Execute one replayed query.
    fn consume(&mut self, query: &str, params: &[String]) -> Result<Flow, BoxError>;
}

impl<F> RecordConsumer for F
where
    F: FnMut(&str, &[String]) -> Result<Flow, BoxError>,
{
    fn consume(&mut self, query: &str, params: &[String]) -> Result<Flow, BoxError> {
        self(query, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<C: RecordConsumer>(consumer: &mut C, queries: &[&str]) -> Vec<Flow> {
        queries
            .iter()
            .map(|q| consumer.consume(q, &[]).unwrap())
            .collect()
    }

    #[test]
    fn closure_is_a_consumer() {
        let mut seen = Vec::new();
        let mut consumer = |q: &str, _: &[String]| -> Result<Flow, BoxError> {
            seen.push(q.to_string());
            Ok(if seen.len() < 2 { Flow::Continue } else { Flow::Stop })
        };
        let flows = drive(&mut consumer, &["a", "b"]);
        assert_eq!(flows, vec![Flow::Continue, Flow::Stop]);
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn closure_errors_convert_from_str() {
        let mut consumer = |_: &str, _: &[String]| -> Result<Flow, BoxError> { Err("boom".into()) };
        let err = consumer.consume("q", &[]).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
