use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::ser::SerializeMap;
use thiserror::Error;

/// Field names which are shared between the extractor and the sinks
pub mod field {
    #![allow(missing_docs)]
    pub const MESSAGE_ID: &str = "MessageId";
    pub const MESSAGE_TIME: &str = "MessageTime";
    pub const EVENT_TYPE: &str = "EventType";
    pub const PUBLISH_TIME: &str = "PublishTime";
    pub const FROM_ADDRESS: &str = "FromAddress";
    pub const SUBJECT: &str = "Subject";
    pub const DESTINATION_ADDRESS: &str = "DestinationAddress";
    pub const SOURCE_IP: &str = "SourceIp";
    pub const CONFIG_SET: &str = "ConfigSet";
    pub const IAM_USER: &str = "IAMUser";
    pub const EVENT_KEY: &str = "EventKey";
    pub const EXPIRES_AT: &str = "ExpiresAt";
}

/// A single extracted value, before it is shaped for a particular sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain string
    Text(String),
    /// A deduplicated set of strings, e.g. addresses
    TextSet(BTreeSet<String>),
    /// A structured value which is already encoded as json text
    Json(String),
}

impl FieldValue {
    /// Encode `value` as json text
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Self {
        // recipient lists and string maps always serialize
        FieldValue::Json(serde_json::to_string(value).unwrap_or_default())
    }

    /// Collect `values` into a [FieldValue::TextSet], collapsing duplicates
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::TextSet(values.into_iter().map(Into::into).collect())
    }

    /// The string content of a [FieldValue::Text] or [FieldValue::Json]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Json(s) => Some(s),
            FieldValue::TextSet(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// The flat, ordered output of the extractor.
/// Setting a name which already exists replaces the value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields(Vec<(&'static str, FieldValue)>);

impl EventFields {
    /// An empty set of fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`
    pub fn set(&mut self, name: &'static str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    /// Insert `name` only when a value is present
    pub fn set_opt(&mut self, name: &'static str, value: Option<impl Into<FieldValue>>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    #[allow(missing_docs)]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Shorthand for [Self::get] followed by [FieldValue::as_text]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// The field names in insertion order
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|(n, _)| *n).collect()
    }

    #[allow(missing_docs)]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(n, v)| (*n, v))
    }
}

/// The record written to the log sink: an ordered json object
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord(Vec<(&'static str, serde_json::Value)>);

impl LogRecord {
    /// Shape the extracted fields for the log sink.
    /// Sets become json arrays, everything else a json string.
    pub fn from_fields(fields: &EventFields) -> Self {
        LogRecord(
            fields
                .iter()
                .map(|(name, value)| {
                    let value = match value {
                        FieldValue::Text(s) | FieldValue::Json(s) => {
                            serde_json::Value::String(s.clone())
                        }
                        FieldValue::TextSet(set) => serde_json::Value::Array(
                            set.iter().cloned().map(serde_json::Value::String).collect(),
                        ),
                    };
                    (name, value)
                })
                .collect(),
        )
    }

    #[allow(missing_docs)]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Serialize this record as the single line which is appended to the stream
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl serde::Serialize for LogRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typed value in the store's wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    /// String
    S(String),
    /// String set, sorted and never empty
    Ss(Vec<String>),
    /// Number
    N(i64),
}

/// The record written to the key-value store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord(Vec<(&'static str, StoreValue)>);

impl StoreRecord {
    /// Shape the extracted fields for the store.
    ///
    /// Adds [field::EVENT_KEY], which makes a redelivered notification overwrite its earlier
    /// copy, and [field::EXPIRES_AT] computed from `written_at` and `retention`.
    /// Empty sets are omitted, the store does not accept them.
    pub fn from_fields(fields: &EventFields, written_at: DateTime<Utc>, retention: Retention) -> Self {
        let mut attributes: Vec<(&'static str, StoreValue)> = fields
            .iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    FieldValue::Text(s) | FieldValue::Json(s) => StoreValue::S(s.clone()),
                    FieldValue::TextSet(set) if set.is_empty() => return None,
                    FieldValue::TextSet(set) => StoreValue::Ss(set.iter().cloned().collect()),
                };
                Some((name, value))
            })
            .collect();

        let event_key = format!(
            "{}#{}",
            fields.text(field::EVENT_TYPE).unwrap_or_default(),
            fields.text(field::MESSAGE_TIME).unwrap_or_default()
        );
        attributes.push((field::EVENT_KEY, StoreValue::S(event_key)));
        attributes.push((
            field::EXPIRES_AT,
            StoreValue::N(retention.expiry_for(written_at)),
        ));

        StoreRecord(attributes)
    }

    #[allow(missing_docs)]
    pub fn get(&self, name: &str) -> Option<&StoreValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[allow(missing_docs)]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &StoreValue)> {
        self.0.iter().map(|(n, v)| (*n, v))
    }

    /// The expiry in epoch seconds
    pub fn expires_at(&self) -> Option<i64> {
        match self.get(field::EXPIRES_AT) {
            Some(StoreValue::N(n)) => Some(*n),
            _ => None,
        }
    }
}

/// How long stored records are kept before the store may discard them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    days: u32,
}

impl Default for Retention {
    fn default() -> Self {
        Retention { days: 30 }
    }
}

/// A retention which is not a positive number of days
#[derive(Debug, Error)]
#[error("retention must be a positive number of days, got {0:?}")]
pub struct InvalidRetention(String);

impl Retention {
    /// Create a retention of `days`, which must be positive
    pub fn from_days(days: u32) -> Result<Self, InvalidRetention> {
        if days == 0 {
            return Err(InvalidRetention(days.to_string()));
        }
        Ok(Retention { days })
    }

    #[allow(missing_docs)]
    pub fn days(&self) -> u32 {
        self.days
    }

    /// The epoch seconds at which a record written at `written_at` expires
    pub fn expiry_for(&self, written_at: DateTime<Utc>) -> i64 {
        (written_at + TimeDelta::days(i64::from(self.days))).timestamp()
    }
}

impl FromStr for Retention {
    type Err = InvalidRetention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .trim()
            .parse::<u32>()
            .map_err(|_| InvalidRetention(s.to_string()))?;
        Retention::from_days(days)
    }
}

/// One line appended to a log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Milliseconds since the epoch at which the line was written
    pub timestamp_millis: i64,
    /// The serialized [LogRecord]
    pub message: String,
}
