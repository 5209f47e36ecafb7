//! Verbosity-gated progress output for export runs.
//!
//! The logger writes to stderr so the line sink can be stdout without the
//! two streams interleaving.

use crate::export::ExportSummary;
use crate::token::EncodeError;

/// How much the exporter prints while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output (default).
    #[default]
    Silent,

    /// Run start/finish and skipped-row diagnostics.
    Info,

    /// Everything above plus per-chunk progress.
    Debug,
}

/// Writes run progress and row-level diagnostics to stderr.
#[derive(Clone, Copy, Debug)]
pub struct ExportLogger {
    verbosity: Verbosity,
}

impl ExportLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Announce the start of a run.
    pub fn start(&self) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[vwfeed] starting export");
        }
    }

    /// Report a row dropped under a skip policy.
    pub fn row_skipped(&self, err: &EncodeError) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[vwfeed] skipping row: {err}");
        }
    }

    /// Report progress after a chunk of rows has been written.
    pub fn progress(&self, lines_written: usize) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[vwfeed] {lines_written} lines written");
        }
    }

    /// Report final counters.
    pub fn finish(&self, summary: &ExportSummary) {
        if self.verbosity >= Verbosity::Info {
            eprintln!(
                "[vwfeed] done: {} rows read, {} lines written, {} skipped",
                summary.rows_read, summary.lines_written, summary.rows_skipped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }
}
