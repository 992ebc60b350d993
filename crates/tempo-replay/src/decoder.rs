//! JSON record decoding.
//!
//! Each input line is one JSON document. Only the configured query
//! field and, optionally, the parameter field are read; every other
//! field is ignored. Extraction is tolerant: a missing or mistyped field
//! decodes to an empty value. The only failure is a line that is not
//! valid JSON.

use serde_json::Value;
use tempo_core::{DecodeError, Record, RecordDecoder, ReplayConfig};

/// Field-addressed JSON decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonRecordDecoder {
    query_field: String,
    params_field: Option<String>,
}

impl JsonRecordDecoder {
    /// Decode queries from `query_field` and parameters from
    /// `params_field` (`None` disables parameters).
    pub fn new(query_field: impl Into<String>, params_field: Option<String>) -> Self {
        Self {
            query_field: query_field.into(),
            params_field: params_field.filter(|f| !f.is_empty()),
        }
    }

    /// Build a decoder for the field names in `config`.
    pub fn from_config(config: &ReplayConfig) -> Self {
        Self::new(
            config.query_field.clone(),
            config.params_field().map(str::to_owned),
        )
    }

    fn params(&self, value: &Value) -> Vec<String> {
        let Some(field) = &self.params_field else {
            return Vec::new();
        };
        match value.get(field).and_then(Value::as_array) {
            // Non-string elements keep their slot as "".
            Some(items) => items
                .iter()
                .map(|v| v.as_str().unwrap_or_default().to_owned())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl RecordDecoder for JsonRecordDecoder {
    fn decode(&self, line: &[u8]) -> Result<Record, DecodeError> {
        let value: Value =
            serde_json::from_slice(line).map_err(|e| DecodeError::new(e.to_string()))?;
        let query = value
            .get(&self.query_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let params = self.params(&value);
        Ok(Record { query, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> JsonRecordDecoder {
        JsonRecordDecoder::new("q", Some("args".into()))
    }

    #[test]
    fn extracts_query_and_params_in_order() {
        let rec = decoder()
            .decode(br#"{"q":"SELECT ?, ?","args":["1","two"],"host":"db1"}"#)
            .unwrap();
        assert_eq!(rec.query, "SELECT ?, ?");
        assert_eq!(rec.params, vec!["1", "two"]);
    }

    #[test]
    fn params_disabled_yields_empty() {
        let d = JsonRecordDecoder::new("q", None);
        let rec = d.decode(br#"{"q":"a","args":["x"]}"#).unwrap();
        assert!(rec.params.is_empty());

        let d = JsonRecordDecoder::new("q", Some(String::new()));
        assert!(d.decode(br#"{"q":"a","args":["x"]}"#).unwrap().params.is_empty());
    }

    #[test]
    fn missing_query_is_empty_not_error() {
        let rec = decoder().decode(br#"{"other":"a"}"#).unwrap();
        assert_eq!(rec.query, "");
        assert!(rec.params.is_empty());
    }

    #[test]
    fn non_string_query_is_empty() {
        let rec = decoder().decode(br#"{"q":42}"#).unwrap();
        assert_eq!(rec.query, "");
    }

    #[test]
    fn non_array_params_are_empty() {
        let rec = decoder().decode(br#"{"q":"a","args":"x"}"#).unwrap();
        assert!(rec.params.is_empty());
    }

    #[test]
    fn non_string_param_elements_become_empty() {
        let rec = decoder().decode(br#"{"q":"a","args":["x",1,null,"y"]}"#).unwrap();
        assert_eq!(rec.params, vec!["x", "", "", "y"]);
    }

    #[test]
    fn non_object_document_decodes_empty() {
        let rec = decoder().decode(b"[1,2,3]").unwrap();
        assert_eq!(rec, Record::default());
    }

    #[test]
    fn malformed_line_is_error() {
        assert!(decoder().decode(br#"{"q":"a""#).is_err());
        assert!(decoder().decode(b"not json").is_err());
        assert!(decoder().decode(b"").is_err());
    }

    #[test]
    fn from_config_uses_field_names() {
        let config = ReplayConfig::new("x.jsonl", "query").with_params_field("binds");
        let d = JsonRecordDecoder::from_config(&config);
        let rec = d.decode(br#"{"query":"q","binds":["b"]}"#).unwrap();
        assert_eq!(rec, Record::new("q", vec!["b".into()]));
    }
}
