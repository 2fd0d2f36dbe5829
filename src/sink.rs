use crate::error::Result;
use crate::record::LogRow;

/// Synchronous destination for [`LogRow`]s produced by the pipeline.
///
/// Implementations are responsible for serializing rows into a concrete
/// output format (the Avro container in [`crate::avro`]). The pipeline
/// calls `send` once per input log, in order, and `close` exactly once
/// when it stops, whether it finished or failed.
pub trait RowSink {
    /// Encode a single row.
    ///
    /// **Returns**
    /// - `Ok(())` if the row was accepted.
    /// - `Err(..)` if the row could not be represented or written. Nothing
    ///   of the rejected row may reach the output.
    fn send(&mut self, row: &LogRow) -> Result<()>;

    /// Flush buffered rows and finish the output.
    ///
    /// Calling `close` more than once must be harmless.
    fn close(&mut self) -> Result<()>;
}
