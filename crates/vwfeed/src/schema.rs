//! Table schema types.
//!
//! This module defines the types that describe the shape of the rows fed to
//! the exporter: an ordered list of named columns, each with a declared
//! [`ColumnType`]. The schema is supplied by the caller (typically read from
//! a table catalog), never inferred from row data.

use std::collections::HashMap;

/// Declared column types.
///
/// Cells are interpreted according to the declared type of their column:
/// `Numeric` columns carry [`Value::Number`](crate::row::Value::Number) or
/// [`Value::Bool`](crate::row::Value::Bool) cells and encode as `name:value`
/// tokens, while `Categorical` columns carry
/// [`Value::Text`](crate::row::Value::Text) cells and encode as bare
/// sanitized tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColumnType {
    /// Continuous numeric column.
    ///
    /// Booleans are numeric-coercible (`true` → 1.0, `false` → 0.0).
    #[default]
    Numeric,

    /// Free-form text column, emitted as one token per present value.
    Categorical,
}

impl ColumnType {
    /// Returns true if this is a numeric column.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Returns true if this is a categorical column.
    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Categorical)
    }
}

/// Metadata for a single column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Column name.
    pub name: String,

    /// Declared type.
    pub column_type: ColumnType,
}

impl ColumnMeta {
    /// Create metadata for a numeric column.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Numeric,
        }
    }

    /// Create metadata for a categorical column.
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Categorical,
        }
    }
}

/// Ordered column list with name lookup.
///
/// Column order is significant: it drives the order in which namespaces and
/// feature tokens appear on every output line.
#[derive(Clone, Debug, Default)]
pub struct TableSchema {
    /// Per-column metadata, in table order.
    columns: Vec<ColumnMeta>,

    /// Column name → index mapping. On duplicate names the first index wins;
    /// duplicates are rejected later during plan construction.
    name_index: HashMap<String, usize>,
}

impl TableSchema {
    /// Create a schema from an ordered column list.
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        let mut name_index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            name_index.entry(column.name.clone()).or_insert(idx);
        }
        Self {
            columns,
            name_index,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns, in table order.
    #[inline]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Column metadata by index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[inline]
    pub fn column(&self, idx: usize) -> &ColumnMeta {
        &self.columns[idx]
    }

    /// Look up a column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Returns true if any two columns share a name.
    pub fn has_duplicate_names(&self) -> bool {
        self.name_index.len() != self.columns.len()
    }
}
