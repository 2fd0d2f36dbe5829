use crate::avro::OutputCodec;
use crate::env::{
    lookup_env, BODY_KEY_DEFAULT, ENV_AVRO_CODEC, ENV_BODY_KEY, ENV_LEVEL_KEY, ENV_LOG_LEVEL,
    ENV_TIME_FORMAT, ENV_TIME_KEY, LEVEL_KEY_DEFAULT, LOG_LEVEL_DEFAULT, TIME_KEY_DEFAULT,
};
use crate::error::Result;
use crate::init::LoggingConfig;
use crate::mapper::{MapperConfig, TimeFormat};

/// Everything the `jsonlogs2avro` binary needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub mapper: MapperConfig,
    pub codec: OutputCodec,
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(lookup_env)
    }

    /// Resolve the configuration through `lookup`, which returns `None` for
    /// unset variables. Unset variables fall back to the built-in defaults.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let or = |key: &str, default: &str| -> Result<String> {
            Ok(lookup(key)?.unwrap_or_else(|| default.to_string()))
        };

        let time_format = match lookup(ENV_TIME_FORMAT)? {
            Some(layout) => layout.parse::<TimeFormat>().unwrap_or_default(),
            None => TimeFormat::default(),
        };

        let codec = match lookup(ENV_AVRO_CODEC)? {
            Some(name) => name.parse::<OutputCodec>()?,
            None => OutputCodec::default(),
        };

        Ok(Config {
            mapper: MapperConfig {
                time_key: or(ENV_TIME_KEY, TIME_KEY_DEFAULT)?,
                level_key: or(ENV_LEVEL_KEY, LEVEL_KEY_DEFAULT)?,
                body_key: or(ENV_BODY_KEY, BODY_KEY_DEFAULT)?,
                time_format,
            },
            codec,
            logging: LoggingConfig {
                filter: or(ENV_LOG_LEVEL, LOG_LEVEL_DEFAULT)?,
                ..LoggingConfig::default()
            },
        })
    }
}
