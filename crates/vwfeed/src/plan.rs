//! Per-column role assignment and namespace layout.
//!
//! [`ExportPlan`] is the one-shot product of validating an
//! [`ExportConfig`](crate::config::ExportConfig) against a
//! [`TableSchema`](crate::schema::TableSchema): every column gets exactly one
//! [`ColumnRole`], and the namespaces get their emission order. The plan has
//! no dependency on row data, is immutable after construction, and is shared
//! by every worker.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::config::{validate_namespace, ConfigError, EmptyGroupPolicy, ExportConfig};
use crate::schema::TableSchema;

/// Namespace for feature columns with no explicit assignment.
pub const DEFAULT_NAMESPACE: &str = "other";

/// The function a column serves in the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Rendered as the leading label field.
    Label,

    /// Rendered as the example tag.
    Tag,

    /// Never contributes anything to the output.
    Excluded,

    /// Emitted as a feature in the named namespace.
    Feature(String),
}

/// Immutable encoding plan: per-column roles plus namespace emission order.
#[derive(Clone, Debug)]
pub struct ExportPlan {
    schema: TableSchema,
    roles: Vec<ColumnRole>,

    /// Namespace names in emission order: first occurrence in schema column
    /// order, with the default namespace in front when nothing maps to it.
    namespaces: Vec<String>,

    /// Column index → position in `namespaces`, `None` for non-feature
    /// columns.
    group_of: Vec<Option<usize>>,

    label_idx: usize,
    tag_idx: Option<usize>,

    /// Importance weight pre-rendered once; it is identical on every line.
    importance: String,

    drop_zeros: bool,
    empty_groups: EmptyGroupPolicy,
}

impl ExportPlan {
    /// Resolve `config` against `schema` into a plan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any configured column name is absent from
    /// the schema, the label column is not numeric, the schema has duplicate
    /// column names, or a name-derived namespace is invalid.
    pub fn new(schema: TableSchema, config: &ExportConfig) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(schema.n_columns());
        for column in schema.columns() {
            if !seen.insert(column.name.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.name.clone()));
            }
        }

        let label_idx = schema
            .column_index(&config.label_column)
            .ok_or_else(|| ConfigError::UnknownLabelColumn(config.label_column.clone()))?;
        if !schema.column(label_idx).column_type.is_numeric() {
            return Err(ConfigError::NonNumericLabel(config.label_column.clone()));
        }

        let tag_idx = match &config.tag_column {
            Some(name) => Some(
                schema
                    .column_index(name)
                    .ok_or_else(|| ConfigError::UnknownTagColumn(name.clone()))?,
            ),
            None => None,
        };

        for name in &config.excludes {
            if schema.column_index(name).is_none() {
                return Err(ConfigError::UnknownExcludedColumn(name.clone()));
            }
        }
        for name in config.custom_namespaces.keys() {
            if schema.column_index(name).is_none() {
                return Err(ConfigError::UnknownNamespaceColumn(name.clone()));
            }
        }

        let excludes: HashSet<&str> = config.excludes.iter().map(String::as_str).collect();

        let roles: Vec<ColumnRole> = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let name = column.name.as_str();
                if idx == label_idx {
                    Ok(ColumnRole::Label)
                } else if tag_idx == Some(idx) {
                    Ok(ColumnRole::Tag)
                } else if excludes.contains(name) {
                    Ok(ColumnRole::Excluded)
                } else if let Some(ns) = config.custom_namespaces.get(name) {
                    Ok(ColumnRole::Feature(ns.clone()))
                } else if let Some(ns) = name_derived_namespace(name) {
                    validate_namespace(ns)?;
                    Ok(ColumnRole::Feature(ns.to_owned()))
                } else {
                    Ok(ColumnRole::Feature(DEFAULT_NAMESPACE.to_owned()))
                }
            })
            .collect::<Result<_, ConfigError>>()?;

        // Namespace emission order: first occurrence in schema column order.
        // The default namespace always exists; when no column maps to it, it
        // leads the line.
        let mut namespaces: Vec<String> = Vec::new();
        for role in &roles {
            if let ColumnRole::Feature(ns) = role {
                if !namespaces.iter().any(|n| n == ns) {
                    namespaces.push(ns.clone());
                }
            }
        }
        if !namespaces.iter().any(|n| n == DEFAULT_NAMESPACE) {
            namespaces.insert(0, DEFAULT_NAMESPACE.to_owned());
        }

        let position: HashMap<&str, usize> = namespaces
            .iter()
            .enumerate()
            .map(|(pos, ns)| (ns.as_str(), pos))
            .collect();
        let group_of: Vec<Option<usize>> = roles
            .iter()
            .map(|role| match role {
                ColumnRole::Feature(ns) => Some(position[ns.as_str()]),
                _ => None,
            })
            .collect();

        Ok(Self {
            schema,
            roles,
            namespaces,
            group_of,
            label_idx,
            tag_idx,
            importance: render_importance(config.importance),
            drop_zeros: config.drop_zeros,
            empty_groups: config.empty_groups,
        })
    }

    /// The schema this plan was resolved against.
    #[inline]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Per-column roles, in schema column order.
    #[inline]
    pub fn roles(&self) -> &[ColumnRole] {
        &self.roles
    }

    /// Role of one column.
    #[inline]
    pub fn role(&self, idx: usize) -> &ColumnRole {
        &self.roles[idx]
    }

    /// Namespace names in emission order.
    #[inline]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Position in [`namespaces`](Self::namespaces) of a feature column,
    /// `None` for label/tag/excluded columns.
    #[inline]
    pub fn group_of(&self, idx: usize) -> Option<usize> {
        self.group_of[idx]
    }

    /// Index of the label column.
    #[inline]
    pub fn label_index(&self) -> usize {
        self.label_idx
    }

    /// Index of the tag column, if one is configured.
    #[inline]
    pub fn tag_index(&self) -> Option<usize> {
        self.tag_idx
    }

    /// The pre-rendered importance field.
    #[inline]
    pub fn importance_str(&self) -> &str {
        &self.importance
    }

    #[inline]
    pub fn drop_zeros(&self) -> bool {
        self.drop_zeros
    }

    #[inline]
    pub fn empty_groups(&self) -> EmptyGroupPolicy {
        self.empty_groups
    }
}

/// Namespace encoded in the column name itself: `<prefix>__<ns>__<rest>`
/// (tables produced by upstream feature pipelines name columns this way).
/// Explicit mappings and excludes take precedence.
fn name_derived_namespace(name: &str) -> Option<&str> {
    let mut parts = name.split("__");
    let _prefix = parts.next()?;
    let ns = parts.next()?;
    parts.next().map(|_| ns)
}

/// Render the importance weight: integral weights keep one decimal place
/// (`1.0`), fractional ones use the shortest exact form.
fn render_importance(w: f64) -> String {
    if w.fract() == 0.0 {
        format!("{w:.1}")
    } else {
        format!("{w}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::schema::ColumnMeta;

    fn titanic_schema() -> TableSchema {
        TableSchema::new(vec![
            ColumnMeta::categorical("id"),
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("age"),
            ColumnMeta::categorical("sex"),
        ])
    }

    fn demo_config() -> ExportConfig {
        ExportConfig::builder()
            .label_column("label")
            .tag_column("id")
            .custom_namespaces(BTreeMap::from([
                ("age".into(), "demo".into()),
                ("sex".into(), "demo".into()),
            ]))
            .build()
            .unwrap()
    }

    #[test]
    fn roles_cover_every_column_exactly_once() {
        let plan = ExportPlan::new(titanic_schema(), &demo_config()).unwrap();
        assert_eq!(
            plan.roles(),
            &[
                ColumnRole::Tag,
                ColumnRole::Label,
                ColumnRole::Feature("demo".into()),
                ColumnRole::Feature("demo".into()),
            ]
        );
        assert_eq!(plan.label_index(), 1);
        assert_eq!(plan.tag_index(), Some(0));
    }

    #[test]
    fn default_namespace_leads_when_nothing_maps_to_it() {
        let plan = ExportPlan::new(titanic_schema(), &demo_config()).unwrap();
        assert_eq!(plan.namespaces(), &["other".to_owned(), "demo".to_owned()]);
    }

    #[test]
    fn default_namespace_takes_first_unmapped_slot() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("a"),
            ColumnMeta::numeric("b"),
            ColumnMeta::numeric("c"),
        ]);
        let config = ExportConfig::builder()
            .label_column("label")
            .custom_namespaces(BTreeMap::from([
                ("a".into(), "first".into()),
                ("c".into(), "last".into()),
            ]))
            .build()
            .unwrap();
        let plan = ExportPlan::new(schema, &config).unwrap();
        // "other" appears where `b` (the first unmapped column) appears, not
        // up front and not alphabetically.
        assert_eq!(
            plan.namespaces(),
            &["first".to_owned(), "other".to_owned(), "last".to_owned()]
        );
    }

    #[test]
    fn namespaces_ordered_by_first_occurrence() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("z1"),
            ColumnMeta::numeric("a1"),
            ColumnMeta::numeric("z2"),
        ]);
        let config = ExportConfig::builder()
            .label_column("label")
            .custom_namespaces(BTreeMap::from([
                ("z1".into(), "zeta".into()),
                ("z2".into(), "zeta".into()),
                ("a1".into(), "alpha".into()),
            ]))
            .build()
            .unwrap();
        let plan = ExportPlan::new(schema, &config).unwrap();
        assert_eq!(
            plan.namespaces(),
            &["zeta".to_owned(), "alpha".to_owned(), "other".to_owned()]
        );
    }

    #[test]
    fn name_derived_namespace_applies() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("x__family__sibsp"),
            ColumnMeta::numeric("plain"),
        ]);
        let config = ExportConfig::builder().label_column("label").build().unwrap();
        let plan = ExportPlan::new(schema, &config).unwrap();
        assert_eq!(plan.role(1), &ColumnRole::Feature("family".into()));
        assert_eq!(plan.role(2), &ColumnRole::Feature("other".into()));
    }

    #[test]
    fn explicit_mapping_beats_name_derivation() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("x__family__sibsp"),
        ]);
        let config = ExportConfig::builder()
            .label_column("label")
            .custom_namespaces(BTreeMap::from([(
                "x__family__sibsp".into(),
                "override".into(),
            )]))
            .build()
            .unwrap();
        let plan = ExportPlan::new(schema, &config).unwrap();
        assert_eq!(plan.role(1), &ColumnRole::Feature("override".into()));
    }

    #[test]
    fn exclusion_beats_everything() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::categorical("name"),
        ]);
        let config = ExportConfig::builder()
            .label_column("label")
            .excludes(vec!["name".into()])
            .custom_namespaces(BTreeMap::from([("name".into(), "demo".into())]))
            .build()
            .unwrap();
        let plan = ExportPlan::new(schema, &config).unwrap();
        assert_eq!(plan.role(1), &ColumnRole::Excluded);
    }

    #[test]
    fn unknown_label_column_rejected() {
        let config = ExportConfig::builder().label_column("nope").build().unwrap();
        let result = ExportPlan::new(titanic_schema(), &config);
        assert!(matches!(result, Err(ConfigError::UnknownLabelColumn(_))));
    }

    #[test]
    fn unknown_tag_column_rejected() {
        let config = ExportConfig::builder()
            .label_column("label")
            .tag_column("nope")
            .build()
            .unwrap();
        let result = ExportPlan::new(titanic_schema(), &config);
        assert!(matches!(result, Err(ConfigError::UnknownTagColumn(_))));
    }

    #[test]
    fn unknown_excluded_column_rejected() {
        let config = ExportConfig::builder()
            .label_column("label")
            .excludes(vec!["nope".into()])
            .build()
            .unwrap();
        let result = ExportPlan::new(titanic_schema(), &config);
        assert!(matches!(result, Err(ConfigError::UnknownExcludedColumn(_))));
    }

    #[test]
    fn unknown_namespace_column_rejected() {
        let config = ExportConfig::builder()
            .label_column("label")
            .custom_namespaces(BTreeMap::from([("nope".into(), "demo".into())]))
            .build()
            .unwrap();
        let result = ExportPlan::new(titanic_schema(), &config);
        assert!(matches!(result, Err(ConfigError::UnknownNamespaceColumn(_))));
    }

    #[test]
    fn categorical_label_rejected() {
        let config = ExportConfig::builder().label_column("id").build().unwrap();
        let result = ExportPlan::new(titanic_schema(), &config);
        assert!(matches!(result, Err(ConfigError::NonNumericLabel(_))));
    }

    #[test]
    fn duplicate_columns_rejected() {
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("x"),
            ColumnMeta::numeric("x"),
        ]);
        let config = ExportConfig::builder().label_column("label").build().unwrap();
        let result = ExportPlan::new(schema, &config);
        assert!(matches!(result, Err(ConfigError::DuplicateColumn(_))));
    }

    #[test]
    fn invalid_name_derived_namespace_rejected() {
        // "a____b" splits to ["a", "", "b"]: the derived namespace is empty.
        let schema = TableSchema::new(vec![
            ColumnMeta::numeric("label"),
            ColumnMeta::numeric("a____b"),
        ]);
        let config = ExportConfig::builder().label_column("label").build().unwrap();
        let result = ExportPlan::new(schema, &config);
        assert!(matches!(result, Err(ConfigError::InvalidNamespace { .. })));
    }

    #[test]
    fn plan_is_deterministic() {
        let a = ExportPlan::new(titanic_schema(), &demo_config()).unwrap();
        let b = ExportPlan::new(titanic_schema(), &demo_config()).unwrap();
        assert_eq!(a.roles(), b.roles());
        assert_eq!(a.namespaces(), b.namespaces());
    }

    #[test]
    fn importance_rendering() {
        assert_eq!(render_importance(1.0), "1.0");
        assert_eq!(render_importance(2.0), "2.0");
        assert_eq!(render_importance(0.5), "0.5");
        assert_eq!(render_importance(2.25), "2.25");
        assert_eq!(render_importance(0.0), "0.0");
    }

    #[test]
    fn name_derivation_requires_three_segments() {
        assert_eq!(name_derived_namespace("a__b__c"), Some("b"));
        assert_eq!(name_derived_namespace("a__b"), None);
        assert_eq!(name_derived_namespace("plain"), None);
        assert_eq!(name_derived_namespace("a__b__c__d"), Some("b"));
    }
}
