//! Typed cell values and row records.
//!
//! A [`Row`] is one record of the source table: a list of [`Value`]s
//! positionally aligned with the [`TableSchema`](crate::schema::TableSchema).
//! Rows own no encoding state; the same row always encodes to the same line
//! under a fixed plan.

use crate::schema::TableSchema;

static MISSING: Value = Value::Missing;

/// A single typed cell.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// Numeric cell. Non-finite values are treated as missing.
    Number(f64),

    /// Boolean cell, numeric-coercible (`true` → 1.0, `false` → 0.0).
    Bool(bool),

    /// Text cell.
    Text(String),

    /// Absent cell. Missing features emit no token at all.
    #[default]
    Missing,
}

impl Value {
    /// Returns true for `Missing` and for numbers that cannot participate
    /// in the output grammar (NaN and infinities).
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(v) => !v.is_finite(),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// One record, positionally aligned with a [`TableSchema`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values in schema column order.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a row from `(column name, value)` pairs.
    ///
    /// Unnamed columns default to [`Value::Missing`].
    ///
    /// # Panics
    ///
    /// Debug-asserts that every named column exists in the schema.
    pub fn from_pairs<'a, I, V>(schema: &TableSchema, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Value>,
    {
        let mut values = vec![Value::Missing; schema.n_columns()];
        for (name, value) in pairs {
            let idx = schema.column_index(name);
            debug_assert!(idx.is_some(), "unknown column {name:?}");
            if let Some(idx) = idx {
                values[idx] = value.into();
            }
        }
        Self { values }
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell by column index. Out-of-range cells read as missing, so short
    /// rows behave like rows padded with `Missing`.
    #[inline]
    pub fn get(&self, idx: usize) -> &Value {
        self.values.get(idx).unwrap_or(&MISSING)
    }

    /// All cells, in schema column order.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
