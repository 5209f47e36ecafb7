//! The row pipeline.
//!
//! [`Exporter`] drives a one-pass row source through the stateless per-row
//! transform and writes one line per surviving row, in input order, to a
//! line sink. Rows are pulled in fixed-size chunks; each chunk is encoded
//! sequentially or in parallel (the schedules are byte-identical) and then
//! written in order. The only cross-row state is the immutable plan.

use std::io::Write;
use std::num::NonZeroUsize;

use thiserror::Error;

use crate::config::{ConfigError, ErrorPolicy, ExportConfig};
use crate::encode::RowEncoder;
use crate::logger::{ExportLogger, Verbosity};
use crate::parallel::{run_with_threads, Parallelism};
use crate::plan::ExportPlan;
use crate::row::Row;
use crate::schema::TableSchema;
use crate::token::EncodeError;

/// Rows encoded per scheduling unit.
const CHUNK_ROWS: usize = 1024;

/// Pipeline-level failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The configuration does not match the schema; nothing was written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A row failed to encode under [`ErrorPolicy::Abort`].
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The line sink failed.
    #[error("failed to write to the line sink")]
    Io(#[from] std::io::Error),
}

/// Counters for one finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows pulled from the source.
    pub rows_read: usize,

    /// Lines handed to the sink.
    pub lines_written: usize,

    /// Rows dropped under a skip policy.
    pub rows_skipped: usize,
}

/// One-shot exporter: a validated plan plus the run policies.
///
/// # Example
///
/// ```
/// use vwfeed::{ColumnMeta, ExportConfig, Exporter, Row, TableSchema, Value};
///
/// let schema = TableSchema::new(vec![
///     ColumnMeta::categorical("id"),
///     ColumnMeta::numeric("label"),
///     ColumnMeta::categorical("sex"),
/// ]);
/// let config = ExportConfig::builder()
///     .label_column("label")
///     .tag_column("id")
///     .build()
///     .unwrap();
/// let exporter = Exporter::new(schema, &config).unwrap();
///
/// let row = Row::from_pairs(
///     exporter.plan().schema(),
///     [("id", Value::from("5")), ("label", false.into()), ("sex", "male".into())],
/// );
/// let mut out = Vec::new();
/// let summary = exporter.export([row], &mut out).unwrap();
/// assert_eq!(summary.lines_written, 1);
/// assert_eq!(out, b"0.0000 1.0 5|other male\n");
/// ```
pub struct Exporter {
    encoder: RowEncoder,
    on_error: ErrorPolicy,
    limit: Option<usize>,
    n_threads: usize,
    verbosity: Verbosity,
}

impl Exporter {
    /// Validate `config` against `schema` and build the run plan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] before any row is processed; a misconfigured
    /// run produces no output at all.
    pub fn new(schema: TableSchema, config: &ExportConfig) -> Result<Self, ConfigError> {
        let plan = ExportPlan::new(schema, config)?;
        Ok(Self {
            encoder: RowEncoder::new(plan),
            on_error: config.on_error,
            limit: config.limit,
            n_threads: config.n_threads.map_or(0, NonZeroUsize::get),
            verbosity: config.verbosity,
        })
    }

    /// The resolved plan.
    #[inline]
    pub fn plan(&self) -> &ExportPlan {
        self.encoder.plan()
    }

    /// Encode every row and write one line per row, in input order.
    ///
    /// The row source is consumed exactly once. Each line is written with
    /// its trailing newline in a single sink call, so an abort (first bad
    /// row, limit reached, sink failure) never leaves a partial line.
    pub fn export<I, W>(&self, rows: I, sink: W) -> Result<ExportSummary, ExportError>
    where
        I: IntoIterator<Item = Row>,
        I::IntoIter: Send,
        W: Write + Send,
    {
        let rows = rows.into_iter();
        run_with_threads(self.n_threads, |parallelism| self.run(rows, sink, parallelism))
    }

    fn run<W: Write>(
        &self,
        rows: impl Iterator<Item = Row>,
        mut sink: W,
        parallelism: Parallelism,
    ) -> Result<ExportSummary, ExportError> {
        let logger = ExportLogger::new(self.verbosity);
        logger.start();

        let mut rows = rows.enumerate();
        let mut summary = ExportSummary::default();

        'chunks: loop {
            let chunk: Vec<(usize, Row)> = rows.by_ref().take(CHUNK_ROWS).collect();
            if chunk.is_empty() {
                break;
            }
            summary.rows_read += chunk.len();

            let encoded = parallelism
                .maybe_par_map(chunk, |(idx, row)| self.encoder.encode_row(&row, idx));

            for result in encoded {
                match result {
                    Ok(mut line) => {
                        line.push('\n');
                        sink.write_all(line.as_bytes())?;
                        summary.lines_written += 1;
                        if self.limit.is_some_and(|limit| summary.lines_written >= limit) {
                            break 'chunks;
                        }
                    }
                    Err(err) => match self.on_error {
                        ErrorPolicy::Abort => return Err(err.into()),
                        ErrorPolicy::Skip => summary.rows_skipped += 1,
                        ErrorPolicy::SkipAndLog => {
                            logger.row_skipped(&err);
                            summary.rows_skipped += 1;
                        }
                    },
                }
            }

            logger.progress(summary.lines_written);
        }

        sink.flush()?;
        logger.finish(&summary);
        Ok(summary)
    }
}
