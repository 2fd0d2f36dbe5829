use tracing_subscriber::EnvFilter;

use crate::env::{ENV_LOG_LEVEL, LOG_LEVEL_DEFAULT};
use crate::error::{Error, Result};

/// Конфигурация диагностического логирования.
///
/// Логи всегда пишутся в stderr: stdout занят бинарным потоком Avro.
///
/// **Поля**
/// - `filter`: директива `EnvFilter`, например `info` или
///   `log2avro=debug`.
/// - `ansi`: раскрашивать ли вывод escape‑последовательностями.
/// - `with_target`: печатать ли target события рядом с уровнем.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
    pub ansi: bool,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: LOG_LEVEL_DEFAULT.to_string(),
            ansi: false,
            with_target: false,
        }
    }
}

/// Install a global `fmt` subscriber writing to stderr.
///
/// **Parameters**
/// - `config`: [`LoggingConfig`] with the filter directive and output
///   options.
///
/// **Returns**
/// - `Err(Error::Config)` if the filter directive does not parse.
/// - `Err(Error::Logging)` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|e| Error::Config {
        key: ENV_LOG_LEVEL.to_string(),
        reason: e.to_string(),
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(config.with_target)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
