//! Query log entries and their line encoding.

use std::time::Duration;

use serde::{Serialize, Serializer};

/// One executed query and its measured duration.
///
/// Encodes as a single JSON object terminated by `\n`:
///
/// ```text
/// {"query":"SELECT 1","elapsed_ns":1200345}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryLogEntry {
    /// The replayed query.
    pub query: String,
    /// Execution time, serialized as integer nanoseconds.
    #[serde(rename = "elapsed_ns", serialize_with = "as_nanos")]
    pub elapsed: Duration,
}

impl QueryLogEntry {
    /// Create an entry.
    pub fn new(query: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            query: query.into(),
            elapsed,
        }
    }

    /// Append this entry's JSON line, including the trailing newline, to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), serde_json::Error> {
        serde_json::to_writer(&mut *buf, self)?;
        buf.push(b'\n');
        Ok(())
    }
}

fn as_nanos<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
    serializer.serialize_u64(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_one_json_line() {
        let entry = QueryLogEntry::new("SELECT 1", Duration::from_micros(1500));
        let mut buf = Vec::new();
        entry.encode_into(&mut buf).unwrap();
        assert_eq!(buf, b"{\"query\":\"SELECT 1\",\"elapsed_ns\":1500000}\n");
    }

    #[test]
    fn escapes_newlines_in_query() {
        let entry = QueryLogEntry::new("SELECT\n1", Duration::ZERO);
        let mut buf = Vec::new();
        entry.encode_into(&mut buf).unwrap();
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["query"], "SELECT\n1");
        assert_eq!(value["elapsed_ns"], 0);
    }

    #[test]
    fn appends_without_clearing() {
        let mut buf = Vec::new();
        QueryLogEntry::new("a", Duration::from_nanos(1))
            .encode_into(&mut buf)
            .unwrap();
        QueryLogEntry::new("b", Duration::from_nanos(2))
            .encode_into(&mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
