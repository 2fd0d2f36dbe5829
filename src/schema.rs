use std::io::Write;

use apache_avro::Schema;

use crate::avro::{AvroEncoder, OutputCodec};
use crate::error::{Error, Result};

/// Schema of the records written by [`AvroEncoder`].
///
/// Downstream readers depend on this text; it is not configurable from
/// the environment. `body` and `val` only hold scalars: nested arrays and
/// objects are written as their JSON text in the `string` branch.
pub const SIMPLE_LOG_SCHEMA: &str = r#"{
  "type": "record",
  "name": "SimpleLog",
  "namespace": "log2avro",
  "fields": [
    {"name": "time", "type": {"type": "long", "logicalType": "timestamp-micros"}},
    {"name": "level", "type": "string"},
    {"name": "body", "type": ["null", "boolean", "long", "double", "string"]},
    {"name": "attributes", "type": {
      "type": "array",
      "items": {
        "type": "record",
        "name": "Attribute",
        "fields": [
          {"name": "key", "type": "string"},
          {"name": "val", "type": ["null", "boolean", "long", "double", "string"]}
        ]
      }
    }}
  ]
}"#;

/// A parsed output schema.
#[derive(Debug, Clone)]
pub struct LogSchema {
    schema: Schema,
}

impl LogSchema {
    /// Parse an Avro schema definition.
    ///
    /// **Returns**
    /// - `Err(Error::SchemaParse)` if the text is not a valid schema.
    pub fn parse(text: &str) -> Result<Self> {
        let schema = Schema::parse_str(text).map_err(Error::SchemaParse)?;
        Ok(Self { schema })
    }

    /// Parse [`SIMPLE_LOG_SCHEMA`].
    pub fn simple() -> Result<Self> {
        Self::parse(SIMPLE_LOG_SCHEMA)
    }

    pub fn as_avro(&self) -> &Schema {
        &self.schema
    }

    /// Start an object container file on `sink` using this schema.
    pub fn open<W: Write>(&self, sink: W, codec: OutputCodec) -> AvroEncoder<'_, W> {
        AvroEncoder::new(&self.schema, sink, codec)
    }
}
