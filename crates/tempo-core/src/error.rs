//! Error types for a replay run.
//!
//! Every variant is fatal to the run that produced it. Clean stops
//! (consumer stop, max count, end of input) are not errors.

use std::error::Error;
use std::fmt;
use std::io;

use crate::config::{ConfigError, ReplayConfig};
use crate::consumer::BoxError;
use crate::record::DecodeError;

/// Diagnostic context attached to decode and consumer failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordContext {
    /// Configured query field name.
    pub query_field: String,
    /// Configured parameter field name (empty when disabled).
    pub params_field: String,
    /// The raw offending line, decoded lossily as UTF-8.
    pub line: String,
}

impl RecordContext {
    /// Capture the field names of `config` and the raw `line`.
    pub fn new(config: &ReplayConfig, line: &[u8]) -> Self {
        Self {
            query_field: config.query_field.clone(),
            params_field: config.params_field.clone(),
            line: String::from_utf8_lossy(line).into_owned(),
        }
    }
}

impl fmt::Display for RecordContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "query_field={}, params_field={}, record={}",
            self.query_field, self.params_field, self.line
        )
    }
}

/// Errors that abort a replay run.
#[derive(Debug)]
pub enum ReplayError {
    /// The configuration was rejected before the input was opened.
    Config(ConfigError),
    /// Opening, sizing, seeking, or reading the input failed.
    Io(io::Error),
    /// A line could not be decoded as a record.
    Decode {
        /// The decoder's failure.
        source: DecodeError,
        /// Field names and the offending line.
        context: RecordContext,
    },
    /// The consumer returned an error.
    Consumer {
        /// The consumer's failure.
        source: BoxError,
        /// Field names and the line being consumed.
        context: RecordContext,
    },
}

impl ReplayError {
    /// The diagnostic context, for decode and consumer failures.
    pub fn context(&self) -> Option<&RecordContext> {
        match self {
            Self::Decode { context, .. } | Self::Consumer { context, .. } => Some(context),
            _ => None,
        }
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid replay config: {e}"),
            Self::Io(e) => write!(f, "{e}"),
            Self::Decode { source, context } => write!(f, "{source}: {context}"),
            Self::Consumer { source, context } => write!(f, "{source}: {context}"),
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Decode { source, .. } => Some(source),
            Self::Consumer { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for ReplayError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RecordContext {
        let config = ReplayConfig::new("q.jsonl", "q").with_params_field("args");
        RecordContext::new(&config, b"{\"q\":")
    }

    #[test]
    fn decode_error_names_fields_and_line() {
        let err = ReplayError::Decode {
            source: DecodeError::new("EOF while parsing"),
            context: context(),
        };
        let msg = err.to_string();
        assert!(msg.contains("query_field=q"), "{msg}");
        assert!(msg.contains("params_field=args"), "{msg}");
        assert!(msg.contains("record={\"q\":"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn consumer_error_keeps_source() {
        let err = ReplayError::Consumer {
            source: "target unavailable".into(),
            context: context(),
        };
        assert!(err.to_string().starts_with("target unavailable: "));
        assert_eq!(err.source().unwrap().to_string(), "target unavailable");
        assert_eq!(err.context().unwrap().query_field, "q");
    }

    #[test]
    fn io_error_is_verbatim() {
        let io = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = ReplayError::from(io);
        assert_eq!(err.to_string(), "no such file");
        assert!(err.context().is_none());
    }

    #[test]
    fn lossy_line_capture() {
        let config = ReplayConfig::new("q.jsonl", "q");
        let ctx = RecordContext::new(&config, &[b'a', 0xff, b'b']);
        assert_eq!(ctx.line, "a\u{fffd}b");
        assert_eq!(ctx.params_field, "");
    }
}
