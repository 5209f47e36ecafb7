//! Cell-to-token conversion.
//!
//! One cell becomes zero or one grammar-safe tokens: missing cells vanish
//! (sparsity is expressed by absence, never a placeholder), categorical text
//! becomes the sanitized value itself, and numeric values become
//! `name:value` pairs with a fixed-precision rendering so repeated encoding
//! of the same input is byte-identical.

use thiserror::Error;

use crate::row::Value;
use crate::schema::{ColumnMeta, ColumnType};

/// Row-scoped encoding failures.
///
/// Every variant carries the row index and column name of the failure so a
/// run can report exactly where the data contract broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The cell's runtime type disagrees with its declared column type.
    #[error("row {row}: column {column:?} expected a {expected} value")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: &'static str,
    },

    /// The label cell is missing; a row without a label cannot be encoded.
    #[error("row {row}: label column {column:?} is missing")]
    MissingLabel { row: usize, column: String },
}

/// Strip the characters the line grammar reserves (space, `|`, `:`) along
/// with control characters. Everything else, case included, is preserved.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '|' | ':') && !c.is_control())
        .collect()
}

/// Fixed-precision decimal rendering: four decimal places, no exponent
/// notation, no separators.
#[inline]
pub fn format_fixed(v: f64) -> String {
    format!("{v:.4}")
}

/// Coerce a numeric-typed cell to `f64`, or report the mismatch.
///
/// The caller has already ruled out missing cells.
pub(crate) fn numeric_value(
    value: &Value,
    row: usize,
    column: &str,
) -> Result<f64, EncodeError> {
    match value {
        Value::Number(v) => Ok(*v),
        Value::Bool(true) => Ok(1.0),
        Value::Bool(false) => Ok(0.0),
        _ => Err(EncodeError::TypeMismatch {
            row,
            column: column.to_owned(),
            expected: "numeric",
        }),
    }
}

/// Convert one cell into its feature token.
///
/// Returns `Ok(None)` when the feature is absent for this row: the cell is
/// missing, the sanitized text is empty, or (with `drop_zeros`) the numeric
/// value is exactly zero.
pub fn tokenize(
    column: &ColumnMeta,
    value: &Value,
    row: usize,
    drop_zeros: bool,
) -> Result<Option<String>, EncodeError> {
    if value.is_missing() {
        return Ok(None);
    }

    match column.column_type {
        ColumnType::Numeric => {
            let v = numeric_value(value, row, &column.name)?;
            if drop_zeros && v == 0.0 {
                return Ok(None);
            }
            Ok(Some(format!(
                "{}:{}",
                column.name.to_lowercase(),
                format_fixed(v)
            )))
        }
        ColumnType::Categorical => match value {
            Value::Text(text) => {
                let token = sanitize(text);
                Ok((!token.is_empty()).then_some(token))
            }
            _ => Err(EncodeError::TypeMismatch {
                row,
                column: column.name.clone(),
                expected: "text",
            }),
        },
    }
}
