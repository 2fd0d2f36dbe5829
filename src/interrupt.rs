use std::future::Future;
use std::io;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// How a supervised conversion task ended.
#[derive(Debug)]
pub enum Supervised<T> {
    /// The task returned (or panicked) on its own.
    Finished(std::result::Result<T, JoinError>),
    /// A second interrupt arrived while the task was still running. The
    /// task may be stuck in a blocking read and is left behind.
    Abandoned,
}

/// Wait for `task`, reacting to interrupts produced by `interrupt`.
///
/// The first interrupt cancels `cancel` so the pipeline stops at the next
/// record boundary. A second one gives up on the task, since a blocking read
/// on an idle input never reaches that boundary. An `Err` from `interrupt`
/// (no signal support) disables the interrupt branch.
pub async fn supervise<T, F, Fut>(
    mut task: JoinHandle<T>,
    cancel: &CancellationToken,
    mut interrupt: F,
) -> Supervised<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    tokio::select! {
        joined = &mut task => return Supervised::Finished(joined),
        Ok(()) = interrupt() => {
            warn!("interrupt received, stopping at the next record");
            cancel.cancel();
        }
    }

    tokio::select! {
        joined = &mut task => Supervised::Finished(joined),
        Ok(()) = interrupt() => {
            error!("second interrupt received, abandoning conversion");
            Supervised::Abandoned
        }
    }
}
