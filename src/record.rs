use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One decoded input log: arbitrary keys mapped to JSON values.
pub type StructuredLog = Map<String, Value>;

/// A key/value pair left over after the time, level and body fields were
/// taken out of a [`StructuredLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub val: Value,
}

/// Normalized row handed to a [`RowSink`](crate::sink::RowSink).
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    pub time: DateTime<Utc>,
    pub level: String,
    /// `None` when the input had no body key.
    pub body: Option<Value>,
    /// Sorted by key.
    pub attributes: Vec<Attribute>,
}
