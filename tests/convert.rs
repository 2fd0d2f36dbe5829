use std::collections::HashMap;

use apache_avro::types::Value as AvroValue;
use apache_avro::Reader;
use tokio_util::sync::CancellationToken;

use log2avro::config::Config;
use log2avro::env::{ENV_BODY_KEY, ENV_LEVEL_KEY, ENV_TIME_KEY};
use log2avro::pipeline::convert;
use log2avro::Error;

fn run(input: &str, config: &Config, cancel: &CancellationToken) -> (Result<u64, Error>, Vec<u8>) {
    let mut out = Vec::new();
    let result = convert(input.as_bytes(), &mut out, config, cancel).map(|s| s.records);
    (result, out)
}

fn decode(bytes: &[u8]) -> Vec<AvroValue> {
    Reader::new(bytes)
        .expect("valid container header")
        .map(|value| value.expect("valid record"))
        .collect()
}

fn field<'v>(record: &'v AvroValue, name: &str) -> &'v AvroValue {
    match record {
        AvroValue::Record(fields) => fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .unwrap_or_else(|| panic!("no field {name}")),
        other => panic!("not a record: {other:?}"),
    }
}

fn branch(value: &AvroValue) -> &AvroValue {
    match value {
        AvroValue::Union(_, inner) => inner,
        other => other,
    }
}

fn attribute_keys(record: &AvroValue) -> Vec<String> {
    match field(record, "attributes") {
        AvroValue::Array(items) => items
            .iter()
            .map(|item| match field(item, "key") {
                AvroValue::String(key) => key.clone(),
                other => panic!("key is not a string: {other:?}"),
            })
            .collect(),
        other => panic!("attributes is not an array: {other:?}"),
    }
}

#[test]
fn converts_single_log() {
    let input = r#"{"time":"2024-01-02T03:04:05Z","level":"INFO","body":"hello","user":"alice"}"#;

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert_eq!(result.unwrap(), 1);
    let records = decode(&out);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(
        field(record, "time"),
        &AvroValue::TimestampMicros(1_704_164_645_000_000)
    );
    assert_eq!(field(record, "level"), &AvroValue::String("INFO".into()));
    assert_eq!(branch(field(record, "body")), &AvroValue::String("hello".into()));
    assert_eq!(
        field(record, "attributes"),
        &AvroValue::Array(vec![AvroValue::Record(vec![
            ("key".into(), AvroValue::String("user".into())),
            ("val".into(), AvroValue::Union(4, Box::new(AvroValue::String("alice".into())))),
        ])])
    );
}

#[test]
fn keeps_microsecond_precision() {
    let input = r#"{"time":"2024-01-02T03:04:05.123456Z","level":"DEBUG"}"#;

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert_eq!(result.unwrap(), 1);
    assert_eq!(
        field(&decode(&out)[0], "time"),
        &AvroValue::TimestampMicros(1_704_164_645_123_456)
    );
}

#[test]
fn empty_input_yields_empty_container() {
    let (result, out) = run("", &Config::default(), &CancellationToken::new());

    assert_eq!(result.unwrap(), 0);
    assert!(out.starts_with(b"Obj\x01"));
    assert!(decode(&out).is_empty());
}

#[test]
fn missing_time_keeps_earlier_records() {
    let input = concat!(
        r#"{"time":"2024-01-02T03:04:05Z","level":"INFO","n":1}"#,
        "\n",
        r#"{"time":"2024-01-02T03:04:06Z","level":"INFO","n":2}"#,
        "\n",
        r#"{"level":"WARN","x":1}"#,
        "\n",
        r#"{"time":"2024-01-02T03:04:07Z","level":"INFO","n":4}"#,
        "\n",
    );

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert!(matches!(result, Err(Error::NoTime { .. })));
    let records = decode(&out);
    assert_eq!(records.len(), 2);
    let AvroValue::Array(attributes) = field(&records[1], "attributes") else {
        panic!("attributes is not an array");
    };
    assert_eq!(branch(field(&attributes[0], "val")), &AvroValue::Long(2));
}

#[test]
fn decode_error_stops_the_run() {
    let input = concat!(
        r#"{"time":"2024-01-02T03:04:05Z","level":"INFO"}"#,
        "\n",
        "{not json}\n",
    );

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert!(matches!(result, Err(Error::SourceDecode(_))));
    assert_eq!(decode(&out).len(), 1);
}

#[test]
fn nested_attribute_is_kept_as_json_text() {
    let input = r#"{"time":"2024-01-02T03:04:05Z","level":"INFO","tags":["a","b"]}"#;

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert_eq!(result.unwrap(), 1);
    let records = decode(&out);
    let AvroValue::Array(attributes) = field(&records[0], "attributes") else {
        panic!("attributes is not an array");
    };
    assert_eq!(
        branch(field(&attributes[0], "val")),
        &AvroValue::String(r#"["a","b"]"#.into())
    );
}

#[test]
fn failure_on_first_record_still_writes_header() {
    let (result, out) = run(r#"{"level":"WARN"}"#, &Config::default(), &CancellationToken::new());

    assert!(matches!(result, Err(Error::NoTime { .. })));
    assert!(out.starts_with(b"Obj\x01"));
    assert!(decode(&out).is_empty());
}

#[test]
fn custom_keys_are_excluded_from_attributes() {
    let vars: HashMap<&str, &str> = [
        (ENV_TIME_KEY, "ts"),
        (ENV_LEVEL_KEY, "severity"),
        (ENV_BODY_KEY, "msg"),
    ]
    .into_iter()
    .collect();
    let config = Config::resolve(|key| Ok(vars.get(key).map(|v| v.to_string()))).unwrap();
    let input = r#"{"ts":"2024-01-02T03:04:05Z","severity":"ERROR","msg":42,"time":"t","level":"l","zeta":true}"#;

    let (result, out) = run(input, &config, &CancellationToken::new());

    assert_eq!(result.unwrap(), 1);
    let records = decode(&out);
    assert_eq!(field(&records[0], "level"), &AvroValue::String("ERROR".into()));
    assert_eq!(branch(field(&records[0], "body")), &AvroValue::Long(42));
    assert_eq!(attribute_keys(&records[0]), vec!["level", "time", "zeta"]);
}

#[test]
fn attribute_order_is_stable() {
    let input = concat!(
        r#"{"time":"2024-01-02T03:04:05Z","level":"INFO","c":3,"a":1,"b":2}"#,
        "\n",
        r#"{"b":2,"level":"INFO","a":1,"time":"2024-01-02T03:04:05Z","c":3}"#,
        "\n",
    );

    let (result, out) = run(input, &Config::default(), &CancellationToken::new());

    assert_eq!(result.unwrap(), 2);
    let records = decode(&out);
    assert_eq!(attribute_keys(&records[0]), vec!["a", "b", "c"]);
    assert_eq!(records[0], records[1]);
}

#[test]
fn cancelled_run_still_closes_output() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let input = r#"{"time":"2024-01-02T03:04:05Z","level":"INFO"}"#;

    let (result, out) = run(input, &Config::default(), &cancel);

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(decode(&out).is_empty());
}
