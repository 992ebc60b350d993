//! Replay configuration, validation, and error types.
//!
//! [`ReplayConfig`] is the input for constructing a replay loop.
//! [`validate()`](ReplayConfig::validate) checks structural invariants
//! before any file is opened. The configuration is read-only for the
//! lifetime of a run.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ReplayConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The input path is empty.
    EmptyPath,
    /// The query field name is empty.
    EmptyQueryField,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "input path must not be empty"),
            Self::EmptyQueryField => write!(f, "query field name must not be empty"),
        }
    }
}

impl Error for ConfigError {}

// ── ReplayConfig ───────────────────────────────────────────────────

/// Configuration for one replay run over one input file.
///
/// Field semantics:
///
/// - `params_field`: empty means "no parameters"; every record then
///   yields an empty parameter list.
/// - `target_rate`: records per second, `0` = unlimited.
/// - `max_count`: lifetime cap on consumer invocations across all
///   passes, `0` = unlimited.
/// - `seed`: seed for the random-start generator. `None` seeds from
///   the thread-local generator, so random starts differ between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Newline-delimited record file to replay.
    pub path: PathBuf,
    /// Name of the field holding the query string.
    pub query_field: String,
    /// Name of the field holding the parameter array.
    #[serde(default)]
    pub params_field: String,
    /// Rewind to the start of the file on end-of-file.
    #[serde(default, rename = "loop")]
    pub loop_input: bool,
    /// Begin the first pass at a random line of the file.
    #[serde(default)]
    pub random_start: bool,
    /// Target records per second.
    #[serde(default)]
    pub target_rate: u64,
    /// Maximum number of consumer invocations.
    #[serde(default)]
    pub max_count: u64,
    /// Seed for the random-start offset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ReplayConfig {
    /// Create a configuration that replays `path` once, unthrottled,
    /// reading queries from `query_field`.
    pub fn new(path: impl Into<PathBuf>, query_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_field: query_field.into(),
            params_field: String::new(),
            loop_input: false,
            random_start: false,
            target_rate: 0,
            max_count: 0,
            seed: None,
        }
    }

    /// Read parameters from `field`.
    pub fn with_params_field(mut self, field: impl Into<String>) -> Self {
        self.params_field = field.into();
        self
    }

    /// Rewind and replay again on end-of-file.
    pub fn with_loop(mut self, enabled: bool) -> Self {
        self.loop_input = enabled;
        self
    }

    /// Start the first pass at a random line.
    pub fn with_random_start(mut self, enabled: bool) -> Self {
        self.random_start = enabled;
        self
    }

    /// Pace delivery at `rate` records per second (`0` = unlimited).
    pub fn with_target_rate(mut self, rate: u64) -> Self {
        self.target_rate = rate;
        self
    }

    /// Stop after `count` records (`0` = unlimited).
    pub fn with_max_count(mut self, count: u64) -> Self {
        self.max_count = count;
        self
    }

    /// Seed the random-start generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The parameter field name, or `None` when parameters are disabled.
    pub fn params_field(&self) -> Option<&str> {
        if self.params_field.is_empty() {
            None
        } else {
            Some(&self.params_field)
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if self.query_field.is_empty() {
            return Err(ConfigError::EmptyQueryField);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_single_unthrottled_pass() {
        let config = ReplayConfig::new("queries.jsonl", "q");
        assert!(!config.loop_input);
        assert!(!config.random_start);
        assert_eq!(config.target_rate, 0);
        assert_eq!(config.max_count, 0);
        assert_eq!(config.params_field(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_path_rejected() {
        let config = ReplayConfig::new("", "q");
        assert_eq!(config.validate(), Err(ConfigError::EmptyPath));
    }

    #[test]
    fn empty_query_field_rejected() {
        let config = ReplayConfig::new("queries.jsonl", "");
        assert_eq!(config.validate(), Err(ConfigError::EmptyQueryField));
    }

    #[test]
    fn params_field_empty_means_none() {
        let config = ReplayConfig::new("queries.jsonl", "q").with_params_field("");
        assert_eq!(config.params_field(), None);
        let config = config.with_params_field("args");
        assert_eq!(config.params_field(), Some("args"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ReplayConfig =
            serde_json::from_str(r#"{"path":"q.jsonl","query_field":"q","loop":true}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("q.jsonl"));
        assert!(config.loop_input);
        assert_eq!(config.params_field, "");
        assert_eq!(config.seed, None);
    }
}
