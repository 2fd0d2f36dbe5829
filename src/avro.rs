use std::io::Write;
use std::str::FromStr;

use apache_avro::types::Value as AvroValue;
use apache_avro::{Codec, Schema, Writer};
use serde_json::Value;
use tracing::debug;

use crate::env::ENV_AVRO_CODEC;
use crate::error::{Error, Result};
use crate::record::LogRow;
use crate::sink::RowSink;

/// Block compression of the object container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputCodec {
    #[default]
    Null,
    Deflate,
}

impl FromStr for OutputCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "null" => Ok(OutputCodec::Null),
            "deflate" => Ok(OutputCodec::Deflate),
            other => Err(Error::Config {
                key: ENV_AVRO_CODEC.to_string(),
                reason: format!("unsupported codec {other:?}"),
            }),
        }
    }
}

impl From<OutputCodec> for Codec {
    fn from(codec: OutputCodec) -> Self {
        match codec {
            OutputCodec::Null => Codec::Null,
            OutputCodec::Deflate => Codec::Deflate,
        }
    }
}

/// [`RowSink`] writing an Avro object container file to `W`.
///
/// Each row is resolved against the schema before it is appended, so a row
/// that does not fit (for example a numeric body when the schema only
/// allows strings) is rejected without touching the output. The container
/// header is written on the first row or on [`close`](RowSink::close),
/// whichever comes first, so an empty run still yields a readable file.
pub struct AvroEncoder<'s, W: Write> {
    schema: &'s Schema,
    writer: Option<Writer<'s, W>>,
    inner: Option<W>,
    rows: u64,
}

impl<'s, W: Write> AvroEncoder<'s, W> {
    pub fn new(schema: &'s Schema, sink: W, codec: OutputCodec) -> Self {
        Self {
            schema,
            writer: Some(Writer::with_codec(schema, sink, codec.into())),
            inner: None,
            rows: 0,
        }
    }

    /// Number of rows accepted so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Close the container and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.close()?;
        self.inner.take().ok_or(Error::EncoderClosed)
    }
}

impl<'s, W: Write> RowSink for AvroEncoder<'s, W> {
    fn send(&mut self, row: &LogRow) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::EncoderClosed)?;
        let value = row_to_avro(row)
            .resolve(self.schema)
            .map_err(Error::Encode)?;
        writer.append(value).map_err(Error::Encode)?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let mut inner = writer.into_inner().map_err(Error::Encode)?;
        inner.flush()?;
        debug!(rows = self.rows, "avro container closed");
        self.inner = Some(inner);
        Ok(())
    }
}

fn row_to_avro(row: &LogRow) -> AvroValue {
    let attributes = row
        .attributes
        .iter()
        .map(|attribute| {
            AvroValue::Record(vec![
                ("key".to_string(), AvroValue::String(attribute.key.clone())),
                ("val".to_string(), json_to_avro(&attribute.val)),
            ])
        })
        .collect();

    AvroValue::Record(vec![
        ("time".to_string(), AvroValue::Long(row.time.timestamp_micros())),
        ("level".to_string(), AvroValue::String(row.level.clone())),
        (
            "body".to_string(),
            row.body.as_ref().map_or(AvroValue::Null, json_to_avro),
        ),
        ("attributes".to_string(), AvroValue::Array(attributes)),
    ])
}

/// Untyped conversion. `resolve` picks the union branch and rejects values
/// the schema has no branch for. Arrays and objects are carried as their JSON
/// text so they fit the scalar "any" union.
fn json_to_avro(value: &Value) -> AvroValue {
    match value {
        Value::Null => AvroValue::Null,
        Value::Bool(b) => AvroValue::Boolean(*b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => AvroValue::Long(i),
            (None, Some(f)) => AvroValue::Double(f),
            (None, None) => AvroValue::String(n.to_string()),
        },
        Value::String(s) => AvroValue::String(s.clone()),
        Value::Array(_) | Value::Object(_) => AvroValue::String(value.to_string()),
    }
}
