use std::io::{BufReader, Read};

use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer, Value};

use crate::error::{Error, Result};
use crate::record::StructuredLog;

/// Lazy sequence of [`StructuredLog`]s decoded from a byte stream holding
/// concatenated JSON objects, typically one per line.
///
/// A decode error, or a top-level value that is not an object, is yielded
/// once as an `Err` item; the iterator returns `None` afterwards. A clean
/// end of input just ends the sequence.
pub struct JsonLogs<R: Read> {
    stream: StreamDeserializer<'static, IoRead<BufReader<R>>, Value>,
    failed: bool,
}

/// Decode `reader` as a stream of JSON log objects.
pub fn reader_to_logs<R: Read>(reader: R) -> JsonLogs<R> {
    JsonLogs {
        stream: Deserializer::from_reader(BufReader::new(reader)).into_iter(),
        failed: false,
    }
}

impl<R: Read> Iterator for JsonLogs<R> {
    type Item = Result<StructuredLog>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let item = match self.stream.next()? {
            Ok(Value::Object(log)) => return Some(Ok(log)),
            Ok(other) => Error::NotAnObject {
                kind: kind_of(&other),
            },
            Err(e) => Error::SourceDecode(e),
        };
        self.failed = true;
        Some(Err(item))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
