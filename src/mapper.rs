use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::env::{BODY_KEY_DEFAULT, LEVEL_KEY_DEFAULT, TIME_KEY_DEFAULT};
use crate::error::{Error, Result};
use crate::record::StructuredLog;

/// Textual layout used to parse the time field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// RFC 3339 with optional fractional seconds, e.g.
    /// `2024-01-02T03:04:05.123456Z`.
    #[default]
    Rfc3339,
    /// A chrono strftime pattern. It must carry a UTC offset (`%z`, `%:z`)
    /// so the parsed instant is unambiguous.
    Strftime(String),
}

impl TimeFormat {
    /// Parse a timestamp string according to this layout.
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>> {
        let parsed = match self {
            TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(text),
            TimeFormat::Strftime(layout) => DateTime::parse_from_str(text, layout),
        };

        parsed
            .map(|t| t.with_timezone(&Utc))
            .map_err(|source| Error::TimeParse {
                value: text.to_string(),
                source,
            })
    }

    /// Convert a dynamically-typed value into a timestamp. Only strings are
    /// accepted.
    pub fn parse_value(&self, value: Value) -> Result<DateTime<Utc>> {
        match value {
            Value::String(text) => self.parse(&text),
            other => Err(Error::InvalidTime(other)),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("rfc3339") {
            Ok(TimeFormat::Rfc3339)
        } else {
            Ok(TimeFormat::Strftime(s.to_string()))
        }
    }
}

/// Convert a dynamically-typed value into a level string. Only strings are
/// accepted; they are returned unchanged.
pub fn parse_level(value: Value) -> Result<String> {
    match value {
        Value::String(level) => Ok(level),
        other => Err(Error::InvalidLevel(other)),
    }
}

/// Which keys of a [`StructuredLog`] hold the time, level and body, and how
/// the time is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    pub time_key: String,
    pub level_key: String,
    pub body_key: String,
    pub time_format: TimeFormat,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            time_key: TIME_KEY_DEFAULT.to_string(),
            level_key: LEVEL_KEY_DEFAULT.to_string(),
            body_key: BODY_KEY_DEFAULT.to_string(),
            time_format: TimeFormat::default(),
        }
    }
}

impl MapperConfig {
    /// Validate the configuration and build a [`Mapper`].
    ///
    /// **Returns**
    /// - `Err(Error::Config)` if a key is empty or two keys are equal, since
    ///   the second extractor would then never find its field.
    pub fn to_mapper(self) -> Result<Mapper> {
        let keys = [
            ("time key", &self.time_key),
            ("level key", &self.level_key),
            ("body key", &self.body_key),
        ];

        for (i, (name, key)) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(Error::Config {
                    key: name.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if let Some((other, _)) = keys[i + 1..].iter().find(|(_, k)| k == key) {
                return Err(Error::Config {
                    key: name.to_string(),
                    reason: format!("{key:?} is also used as the {other}"),
                });
            }
        }

        Ok(Mapper {
            time_key: self.time_key,
            level_key: self.level_key,
            body_key: self.body_key,
            time_format: self.time_format,
        })
    }
}

/// Pulls the distinguished fields out of a [`StructuredLog`].
///
/// Every extractor removes the key it looked up, whether or not the value
/// turned out to be valid, so the remaining map holds only attributes.
#[derive(Debug, Clone)]
pub struct Mapper {
    time_key: String,
    level_key: String,
    body_key: String,
    time_format: TimeFormat,
}

impl Mapper {
    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    pub fn level_key(&self) -> &str {
        &self.level_key
    }

    pub fn body_key(&self) -> &str {
        &self.body_key
    }

    /// Remove and parse the time field.
    ///
    /// **Returns**
    /// - `Err(Error::NoTime)` if the key is missing.
    /// - `Err(Error::InvalidTime)` if the value is not a string.
    /// - `Err(Error::TimeParse)` if the string does not match the layout.
    pub fn extract_time(&self, log: &mut StructuredLog) -> Result<DateTime<Utc>> {
        let value = log.remove(&self.time_key).ok_or_else(|| Error::NoTime {
            key: self.time_key.clone(),
        })?;
        self.time_format.parse_value(value)
    }

    /// Remove the level field.
    ///
    /// **Returns**
    /// - `Err(Error::NoLevel)` if the key is missing.
    /// - `Err(Error::InvalidLevel)` if the value is not a string.
    pub fn extract_level(&self, log: &mut StructuredLog) -> Result<String> {
        let value = log.remove(&self.level_key).ok_or_else(|| Error::NoLevel {
            key: self.level_key.clone(),
        })?;
        parse_level(value)
    }

    /// Remove the body field. The body is optional and may hold any value.
    pub fn extract_body(&self, log: &mut StructuredLog) -> Option<Value> {
        log.remove(&self.body_key)
    }
}
