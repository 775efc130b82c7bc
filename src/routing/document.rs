//! # Revision Documents
//!
//! Request-scoped views over the JSON bodies handed to the hook by the host.
//!
//! Recognized fields:
//! - `channels`: string or array of strings
//! - `expiry`: ISO-8601 timestamp string or integer TTL in seconds
//! - `updatedAt`: ISO-8601 timestamp with offset
//!
//! Every other field is carried but never read.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::decision::Expiry;
use super::errors::{json_type_name, RoutingError, RoutingResult};

/// Field holding the channel list
pub const CHANNELS_FIELD: &str = "channels";
/// Field holding the expiry
pub const EXPIRY_FIELD: &str = "expiry";
/// Field holding the last-update timestamp
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// One revision of a document as written by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRevision {
    body: Map<String, Value>,
}

/// The revision being replaced. Absence is expressed as `Option::None`.
pub type PriorRevision = DocumentRevision;

impl DocumentRevision {
    pub fn new(body: Map<String, Value>) -> Self {
        Self { body }
    }

    /// Wraps a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> RoutingResult<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            other => Err(RoutingError::NotAnObject(json_type_name(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Channels listed on the revision, deduplicated and sorted.
    ///
    /// A bare string is one channel. Arrays contribute their string
    /// elements; non-string elements and empty names are skipped.
    pub fn channels(&self) -> BTreeSet<String> {
        let mut channels = BTreeSet::new();
        match self.body.get(CHANNELS_FIELD) {
            Some(Value::String(name)) if !name.is_empty() => {
                channels.insert(name.clone());
            }
            Some(Value::Array(items)) => {
                channels.extend(
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                );
            }
            _ => {}
        }
        channels
    }

    /// The expiry requested by the revision, uninterpreted.
    ///
    /// Falsy values (`null`, `false`, `0`, `""`) count as absent.
    pub fn expiry(&self) -> Option<Expiry> {
        let value = self.body.get(EXPIRY_FIELD)?;
        if is_falsy(value) {
            return None;
        }
        Some(match value {
            Value::String(s) => Expiry::Absolute(s.clone()),
            Value::Number(n) => match n.as_u64() {
                Some(secs) => Expiry::Relative(secs),
                None => Expiry::Raw(value.clone()),
            },
            other => Expiry::Raw(other.clone()),
        })
    }

    /// Parsed `updatedAt`, or `None` when missing or malformed.
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.body
            .get(UPDATED_AT_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

impl From<Map<String, Value>> for DocumentRevision {
    fn from(body: Map<String, Value>) -> Self {
        Self::new(body)
    }
}

/// Replication-internal metadata (revision id, generation, ...).
///
/// Opaque to the engine; carried so observers can report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionMetadata {
    fields: Map<String, Value>,
}

impl RevisionMetadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: Value) -> RoutingResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RoutingError::NotAnObject(json_type_name(&other))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> DocumentRevision {
        DocumentRevision::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = DocumentRevision::from_value(json!(["a"])).unwrap_err();
        assert_eq!(err, RoutingError::NotAnObject("array"));
        assert!(RevisionMetadata::from_value(json!("rev")).is_err());
    }

    #[test]
    fn test_single_string_channel() {
        let d = doc(json!({"channels": "public"}));
        assert_eq!(d.channels().into_iter().collect::<Vec<_>>(), vec!["public"]);
    }

    #[test]
    fn test_channel_list_dedup_and_sort() {
        let d = doc(json!({"channels": ["b", "a", "b", 7, null, ""]}));
        assert_eq!(d.channels().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_channels_absent_or_unsupported() {
        assert!(doc(json!({})).channels().is_empty());
        assert!(doc(json!({"channels": ""})).channels().is_empty());
        assert!(doc(json!({"channels": {"a": 1}})).channels().is_empty());
        assert!(doc(json!({"channels": 42})).channels().is_empty());
    }

    #[test]
    fn test_expiry_forms() {
        assert_eq!(
            doc(json!({"expiry": "2022-06-23T05:00:00+01:00"})).expiry(),
            Some(Expiry::Absolute("2022-06-23T05:00:00+01:00".into()))
        );
        assert_eq!(doc(json!({"expiry": 300})).expiry(), Some(Expiry::Relative(300)));
        assert_eq!(doc(json!({"expiry": -5})).expiry(), Some(Expiry::Raw(json!(-5))));
        assert_eq!(doc(json!({"expiry": 1.5})).expiry(), Some(Expiry::Raw(json!(1.5))));
        assert_eq!(
            doc(json!({"expiry": "next tuesday"})).expiry(),
            Some(Expiry::Absolute("next tuesday".into()))
        );
    }

    #[test]
    fn test_falsy_expiry_is_absent() {
        for value in [json!(null), json!(false), json!(0), json!("")] {
            assert_eq!(doc(json!({ "expiry": value })).expiry(), None);
        }
        assert_eq!(doc(json!({})).expiry(), None);
    }

    #[test]
    fn test_updated_at_parsing() {
        let d = doc(json!({"updatedAt": "2022-06-23T05:00:00+01:00"}));
        let parsed = d.updated_at().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2022-06-23T05:00:00+01:00");

        let z = doc(json!({"updatedAt": "2024-01-01T00:00:00Z"}));
        assert!(z.updated_at().is_some());
    }

    #[test]
    fn test_updated_at_malformed() {
        assert!(doc(json!({"updatedAt": "yesterday"})).updated_at().is_none());
        assert!(doc(json!({"updatedAt": 1700000000})).updated_at().is_none());
        assert!(doc(json!({"updatedAt": "2024-01-01"})).updated_at().is_none());
        assert!(doc(json!({})).updated_at().is_none());
    }

    #[test]
    fn test_serde_is_transparent() {
        let d = doc(json!({"channels": "x", "n": 1}));
        assert_eq!(serde_json::to_value(&d).unwrap(), json!({"channels": "x", "n": 1}));
    }
}
