use std::io::{Read, Write};

use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::attributes::collect_attributes;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::mapper::Mapper;
use crate::record::{LogRow, StructuredLog};
use crate::schema::LogSchema;
use crate::sink::RowSink;
use crate::source::reader_to_logs;

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    /// Rows handed to the sink.
    pub records: u64,
}

/// Split one log into a [`LogRow`]: time, level and body are taken out by
/// the mapper and everything left becomes an attribute.
pub fn assemble_row(mapper: &Mapper, mut log: StructuredLog) -> Result<LogRow> {
    let time = mapper.extract_time(&mut log)?;
    let level = mapper.extract_level(&mut log)?;
    let body = mapper.extract_body(&mut log);
    Ok(LogRow {
        time,
        level,
        body,
        attributes: collect_attributes(log),
    })
}

/// Drive `logs` through the mapper into `sink`, one record at a time.
///
/// **Parameters**
/// - `logs`: lazy source of decoded logs. The first `Err` item stops the
///   run and is returned as is.
/// - `mapper`: field extraction rules.
/// - `sink`: destination; it is closed on every exit path.
/// - `cancel`: checked once per record, before the record is mapped.
///
/// **Returns**
/// - `Ok(PipelineSummary)` once the source is exhausted and the sink
///   closed cleanly.
/// - `Err(..)` with the first error met. Records sent before it stay in the
///   sink; the failing record and everything after it are not processed.
pub fn run<L, S>(
    logs: L,
    mapper: &Mapper,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<PipelineSummary>
where
    L: IntoIterator<Item = Result<StructuredLog>>,
    S: RowSink + ?Sized,
{
    let outcome = drive(logs, mapper, sink, cancel);
    let closed = sink.close();

    match outcome {
        Ok(summary) => {
            closed?;
            info!(records = summary.records, "conversion finished");
            Ok(summary)
        }
        Err(e) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "failed to close output after pipeline error");
            }
            Err(e)
        }
    }
}

fn drive<L, S>(
    logs: L,
    mapper: &Mapper,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<PipelineSummary>
where
    L: IntoIterator<Item = Result<StructuredLog>>,
    S: RowSink + ?Sized,
{
    let mut summary = PipelineSummary::default();

    for log in logs {
        let log = log?;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let row = assemble_row(mapper, log)?;
        sink.send(&row)?;
        summary.records += 1;
        trace!(record = summary.records, level = %row.level, "record encoded");
    }

    Ok(summary)
}

/// Read JSON logs from `reader` and write an Avro container to `writer`
/// using the built-in schema and the mapper/codec settings of `config`.
pub fn convert<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<PipelineSummary> {
    let mapper = config.mapper.clone().to_mapper()?;
    let schema = LogSchema::simple()?;
    let mut encoder = schema.open(writer, config.codec);

    info!(
        time_key = mapper.time_key(),
        level_key = mapper.level_key(),
        body_key = mapper.body_key(),
        codec = ?config.codec,
        "converting logs"
    );
    run(reader_to_logs(reader), &mapper, &mut encoder, cancel)
}
