#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::io;
use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::error;

use log2avro::config::Config;
use log2avro::init::init_logging;
use log2avro::interrupt::{supervise, Supervised};
use log2avro::pipeline::convert;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("jsonlogs2avro: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("jsonlogs2avro: {e}");
        return ExitCode::FAILURE;
    }

    let cancel = CancellationToken::new();
    let pipeline_cancel = cancel.clone();

    // Reads block on stdin, so the pipeline runs off the async workers.
    let task = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let stdout = io::stdout();
        convert(stdin.lock(), stdout.lock(), &config, &pipeline_cancel)
    });

    let joined = match supervise(task, &cancel, tokio::signal::ctrl_c).await {
        Supervised::Finished(joined) => joined,
        // The blocking read keeps the runtime from shutting down.
        Supervised::Abandoned => std::process::exit(1),
    };

    match joined {
        Ok(Ok(_summary)) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            error!(error = %e, source = ?std::error::Error::source(&e), "conversion failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "conversion task did not complete");
            ExitCode::FAILURE
        }
    }
}
