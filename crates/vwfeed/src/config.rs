//! Export configuration with builder pattern.
//!
//! [`ExportConfig`] gathers every knob for one export run. It uses the `bon`
//! crate for builder generation with validation at build time: schema-free
//! invariants are checked by `build()`, schema-dependent ones when the
//! config is resolved into an [`ExportPlan`](crate::plan::ExportPlan).
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vwfeed::ExportConfig;
//!
//! let config = ExportConfig::builder()
//!     .label_column("survived")
//!     .tag_column("passengerid")
//!     .excludes(vec!["name".into()])
//!     .custom_namespaces(BTreeMap::from([
//!         ("age".into(), "demographic".into()),
//!         ("sex".into(), "demographic".into()),
//!     ]))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.importance, 1.0);
//! ```

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use bon::Builder;
use thiserror::Error;

use crate::logger::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors detected while validating a configuration against a schema.
///
/// Any of these is fatal: the run aborts before the first row is read and
/// no output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The label column is not in the schema.
    #[error("label column {0:?} is not in the schema")]
    UnknownLabelColumn(String),

    /// The tag column is not in the schema.
    #[error("tag column {0:?} is not in the schema")]
    UnknownTagColumn(String),

    /// An excluded column is not in the schema.
    #[error("excluded column {0:?} is not in the schema")]
    UnknownExcludedColumn(String),

    /// A namespace-mapped column is not in the schema.
    #[error("namespace-mapped column {0:?} is not in the schema")]
    UnknownNamespaceColumn(String),

    /// The label and tag columns are the same column.
    #[error("label and tag cannot both be column {0:?}")]
    LabelTagCollision(String),

    /// The label column is not declared numeric.
    #[error("label column {0:?} must be numeric")]
    NonNumericLabel(String),

    /// A namespace name cannot appear in the output grammar.
    #[error("invalid namespace name {name:?}: {reason}")]
    InvalidNamespace { name: String, reason: &'static str },

    /// Two schema columns share a name.
    #[error("duplicate column {0:?} in schema")]
    DuplicateColumn(String),

    /// The importance weight is unusable.
    #[error("importance weight must be finite and non-negative, got {0}")]
    InvalidImportance(f64),
}

// =============================================================================
// Policies
// =============================================================================

/// What to do when a single row fails to encode.
///
/// Configuration errors always abort; this policy only governs row-scoped
/// failures (type mismatches and missing labels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole run on the first bad row (default). A bad row usually
    /// signals schema drift, not an isolated glitch.
    #[default]
    Abort,

    /// Drop the row and count it in the run summary.
    Skip,

    /// Drop the row, count it, and log the failure.
    SkipAndLog,
}

/// When to emit a namespace block that has no tokens for a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyGroupPolicy {
    /// Emit the default namespace even when empty; omit empty custom
    /// namespaces (default, matches the reference output).
    #[default]
    DefaultOnly,

    /// Omit every empty block, the default namespace included.
    Suppress,

    /// Emit every namespace block on every row, empty or not.
    Emit,
}

// =============================================================================
// ExportConfig
// =============================================================================

/// Configuration for one export run.
///
/// Built once, validated once, then immutable: per-row encoding never reads
/// anything mutable.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ExportConfig {
    /// Column holding the training label.
    #[builder(into)]
    pub label_column: String,

    /// Column carried through as the example tag, if any.
    #[builder(into)]
    pub tag_column: Option<String>,

    /// Columns dropped entirely from the output.
    #[builder(default)]
    pub excludes: Vec<String>,

    /// Column name → namespace name overrides. Unmapped feature columns
    /// fall back to [`DEFAULT_NAMESPACE`](crate::plan::DEFAULT_NAMESPACE).
    #[builder(default)]
    pub custom_namespaces: BTreeMap<String, String>,

    /// Per-example importance weight. Default: 1.0.
    #[builder(default = 1.0)]
    pub importance: f64,

    /// Drop numeric features equal to exactly zero, so absent and zero
    /// coincide the way the downstream learner treats them. Default: false.
    #[builder(default)]
    pub drop_zeros: bool,

    /// Empty namespace block handling.
    #[builder(default)]
    pub empty_groups: EmptyGroupPolicy,

    /// Row-scoped failure handling.
    #[builder(default)]
    pub on_error: ErrorPolicy,

    /// Stop after this many emitted lines. `None` exports everything.
    pub limit: Option<usize>,

    /// Number of worker threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: export_config_builder::IsComplete> ExportConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the importance weight is non-finite or
    /// negative, the label and tag name the same column, or a custom
    /// namespace name cannot appear in the grammar.
    pub fn build(self) -> Result<ExportConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ExportConfig {
    /// Validate the schema-independent invariants.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.importance.is_finite() || self.importance < 0.0 {
            return Err(ConfigError::InvalidImportance(self.importance));
        }

        if let Some(tag) = &self.tag_column {
            if *tag == self.label_column {
                return Err(ConfigError::LabelTagCollision(tag.clone()));
            }
        }

        for namespace in self.custom_namespaces.values() {
            validate_namespace(namespace)?;
        }

        Ok(())
    }
}

/// Check that a namespace name can appear in the output grammar.
///
/// Names must be non-empty, free of grammar-reserved and control
/// characters, and distinct from the reserved role words.
pub(crate) fn validate_namespace(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidNamespace {
            name: name.to_owned(),
            reason: "must be non-empty",
        });
    }
    if name
        .chars()
        .any(|c| matches!(c, ' ' | '|' | ':') || c.is_control())
    {
        return Err(ConfigError::InvalidNamespace {
            name: name.to_owned(),
            reason: "contains a grammar-reserved character",
        });
    }
    if name.eq_ignore_ascii_case("label") || name.eq_ignore_ascii_case("tag") {
        return Err(ConfigError::InvalidNamespace {
            name: name.to_owned(),
            reason: "is a reserved role word",
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
