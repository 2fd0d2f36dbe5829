use serde_json::Value;

/// Error type returned by every stage of the conversion.
///
/// All variants are fatal to a run: the pipeline stops at the first one
/// and reports it to the caller.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no time found in the log (key: {key})")]
    NoTime { key: String },

    #[error("no level found in the log (key: {key})")]
    NoLevel { key: String },

    #[error("invalid time: {0}")]
    InvalidTime(Value),

    #[error("invalid level: {0}")]
    InvalidLevel(Value),

    #[error("unable to parse time {value:?}")]
    TimeParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unable to decode log record")]
    SourceDecode(#[from] serde_json::Error),

    #[error("log record must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("invalid output schema")]
    SchemaParse(#[source] apache_avro::Error),

    #[error("unable to encode log record")]
    Encode(#[source] apache_avro::Error),

    #[error("encoder already closed")]
    EncoderClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("conversion cancelled")]
    Cancelled,

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("unable to initialize logging: {0}")]
    Logging(String),
}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
