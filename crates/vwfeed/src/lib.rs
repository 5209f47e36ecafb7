//! vwfeed: schema-typed tabular rows to Vowpal Wabbit input lines.
//!
//! Each input row becomes exactly one output line encoding a label, an
//! importance weight, an optional tag, and a set of namespaced features,
//! ready for an out-of-core linear learner. Where rows come from and where
//! lines go is up to the caller: the exporter consumes any row iterator and
//! writes to any [`std::io::Write`] sink.
//!
//! # Key Types
//!
//! - [`TableSchema`] / [`ColumnMeta`] / [`ColumnType`] - the table shape
//! - [`Row`] / [`Value`] - one typed record
//! - [`ExportConfig`] - roles, namespaces, and run policies (builder)
//! - [`Exporter`] - validate once, then encode and stream rows
//! - [`RowEncoder`] / [`ExportPlan`] - the pure per-row transform
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vwfeed::{ColumnMeta, ExportConfig, Exporter, Row, TableSchema, Value};
//!
//! let schema = TableSchema::new(vec![
//!     ColumnMeta::categorical("id"),
//!     ColumnMeta::numeric("label"),
//!     ColumnMeta::categorical("sex"),
//!     ColumnMeta::numeric("age"),
//! ]);
//!
//! let config = ExportConfig::builder()
//!     .label_column("label")
//!     .tag_column("id")
//!     .custom_namespaces(BTreeMap::from([
//!         ("age".into(), "demo".into()),
//!         ("sex".into(), "demo".into()),
//!     ]))
//!     .build()?;
//!
//! let exporter = Exporter::new(schema, &config)?;
//! let row = Row::from_pairs(
//!     exporter.plan().schema(),
//!     [
//!         ("id", Value::from("9")),
//!         ("label", true.into()),
//!         ("age", 27.0.into()),
//!         ("sex", "female".into()),
//!     ],
//! );
//!
//! let mut out = Vec::new();
//! exporter.export([row], &mut out)?;
//! assert_eq!(out, b"1.0000 1.0 9|other |demo female age:27.0000\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency
//!
//! The per-row transform is pure, so the pipeline encodes chunks of rows in
//! parallel (rayon) or sequentially depending on `n_threads`; both schedules
//! produce byte-identical output in input row order.

pub mod config;
pub mod encode;
pub mod export;
pub mod line;
pub mod logger;
pub mod parallel;
pub mod plan;
pub mod row;
pub mod schema;
pub mod token;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, EmptyGroupPolicy, ErrorPolicy, ExportConfig};
pub use encode::RowEncoder;
pub use export::{ExportError, ExportSummary, Exporter};
pub use logger::Verbosity;
pub use parallel::{run_with_threads, Parallelism};
pub use plan::{ColumnRole, ExportPlan, DEFAULT_NAMESPACE};
pub use row::{Row, Value};
pub use schema::{ColumnMeta, ColumnType, TableSchema};
pub use token::EncodeError;
