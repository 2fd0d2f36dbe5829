//! Environment variable names read by the `jsonlogs2avro` binary.
//!
//! These are purely helpers; the mapper and encoder types remain
//! decoupled from environment access.

use std::env::VarError;

use crate::error::{Error, Result};

/// Key holding the event timestamp, defaults to [`TIME_KEY_DEFAULT`].
pub const ENV_TIME_KEY: &str = "ENV_TIME_KEY";

/// Key holding the severity level, defaults to [`LEVEL_KEY_DEFAULT`].
pub const ENV_LEVEL_KEY: &str = "ENV_LEVEL_KEY";

/// Key holding the message body, defaults to [`BODY_KEY_DEFAULT`].
pub const ENV_BODY_KEY: &str = "ENV_BODY_KEY";

/// Timestamp layout. `rfc3339` (the default) or a chrono strftime pattern.
pub const ENV_TIME_FORMAT: &str = "ENV_TIME_FORMAT";

/// Avro block codec: `null` or `deflate`.
pub const ENV_AVRO_CODEC: &str = "ENV_AVRO_CODEC";

/// `tracing` filter directive for diagnostics written to stderr.
pub const ENV_LOG_LEVEL: &str = "ENV_LOG_LEVEL";

pub const TIME_KEY_DEFAULT: &str = "time";
pub const LEVEL_KEY_DEFAULT: &str = "level";
pub const BODY_KEY_DEFAULT: &str = "body";
pub const LOG_LEVEL_DEFAULT: &str = "info";

/// Read an environment variable, treating an unset variable as `None`.
///
/// **Returns**
/// - `Err(Error::Config)` if the variable is set but is not valid unicode.
pub fn lookup_env(key: &str) -> Result<Option<String>> {
    match std::env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(Error::Config {
            key: key.to_string(),
            reason: "value is not valid unicode".to_string(),
        }),
    }
}
