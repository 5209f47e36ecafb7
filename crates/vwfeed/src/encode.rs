//! The per-row transform.
//!
//! [`RowEncoder`] drives one row through the namespace grouper, the value
//! tokenizer, and the line builder. It is pure: the same row and plan always
//! produce the same line, and no state survives from one row to the next,
//! which is what lets the pipeline schedule rows sequentially or in
//! parallel with byte-identical results.

use crate::config::EmptyGroupPolicy;
use crate::line::{build_line, NamespaceGroup};
use crate::plan::{ExportPlan, DEFAULT_NAMESPACE};
use crate::row::{Row, Value};
use crate::token::{numeric_value, sanitize, tokenize, EncodeError};

/// Stateless row-to-line encoder around an immutable [`ExportPlan`].
#[derive(Clone, Debug)]
pub struct RowEncoder {
    plan: ExportPlan,
}

impl RowEncoder {
    pub fn new(plan: ExportPlan) -> Self {
        Self { plan }
    }

    /// The plan this encoder applies.
    #[inline]
    pub fn plan(&self) -> &ExportPlan {
        &self.plan
    }

    /// Encode one row into one output line (no trailing newline).
    ///
    /// `row_index` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the label is missing or a cell's runtime
    /// type disagrees with its declared column type.
    pub fn encode_row(&self, row: &Row, row_index: usize) -> Result<String, EncodeError> {
        let plan = &self.plan;

        let label = self.label_value(row, row_index)?;
        let tag = match plan.tag_index() {
            Some(idx) => render_tag(row.get(idx)),
            None => None,
        };

        let mut groups: Vec<NamespaceGroup<'_>> = plan
            .namespaces()
            .iter()
            .map(|ns| NamespaceGroup::empty(ns.as_str()))
            .collect();

        for (idx, column) in plan.schema().columns().iter().enumerate() {
            let Some(group) = plan.group_of(idx) else {
                continue;
            };
            if let Some(token) = tokenize(column, row.get(idx), row_index, plan.drop_zeros())? {
                groups[group].tokens.push(token);
            }
        }

        let groups: Vec<NamespaceGroup<'_>> = match plan.empty_groups() {
            EmptyGroupPolicy::Emit => groups,
            EmptyGroupPolicy::Suppress => groups
                .into_iter()
                .filter(|g| !g.tokens.is_empty())
                .collect(),
            EmptyGroupPolicy::DefaultOnly => groups
                .into_iter()
                .filter(|g| !g.tokens.is_empty() || g.name == DEFAULT_NAMESPACE)
                .collect(),
        };

        Ok(build_line(label, plan.importance_str(), tag.as_deref(), &groups))
    }

    fn label_value(&self, row: &Row, row_index: usize) -> Result<f64, EncodeError> {
        let idx = self.plan.label_index();
        let value = row.get(idx);
        if value.is_missing() {
            return Err(EncodeError::MissingLabel {
                row: row_index,
                column: self.plan.schema().column(idx).name.clone(),
            });
        }
        numeric_value(value, row_index, &self.plan.schema().column(idx).name)
    }
}

/// Render the tag field. A missing tag is omitted from the line entirely.
fn render_tag(value: &Value) -> Option<String> {
    if value.is_missing() {
        return None;
    }
    match value {
        Value::Text(text) => {
            let tag = sanitize(text);
            (!tag.is_empty()).then_some(tag)
        }
        Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
            Some(format!("{}", *v as i64))
        }
        Value::Number(v) => Some(format!("{v}")),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) => Some("0".to_owned()),
        Value::Missing => None,
    }
}
