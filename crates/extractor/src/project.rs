//! Alias-based field projection
//!
//! Each document declares its columns as [`FieldSpec`]s: a target name, an
//! ordered alias list, and a field kind. Projection walks the aliases in
//! order, takes the first present non-empty source value, and coerces it to
//! the declared kind. Projection is total: a missing or malformed value
//! becomes the kind's default, never an error.

use exportdoc_common::CellValue;

use crate::extract::{coerce_float, coerce_int, RawRow};

/// The typed shape a projected field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
}

impl FieldKind {
    fn default_value(self) -> CellValue {
        match self {
            FieldKind::Str => CellValue::Text(String::new()),
            FieldKind::Int => CellValue::Int(0),
            FieldKind::Float => CellValue::Float(0.0),
        }
    }

    fn coerce(self, raw: &str) -> CellValue {
        match self {
            FieldKind::Str => CellValue::Text(raw.to_string()),
            FieldKind::Int => CellValue::Int(coerce_int(raw)),
            FieldKind::Float => CellValue::Float(coerce_float(raw)),
        }
    }
}

/// One output column of a document schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Column header in the produced document.
    pub target: &'static str,
    /// Source column names tried in order.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(
        target: &'static str,
        aliases: &'static [&'static str],
        kind: FieldKind,
    ) -> Self {
        Self {
            target,
            aliases,
            kind,
        }
    }
}

/// Project one source row onto a document schema.
///
/// The result has exactly one value per spec, in spec order. The first
/// alias with a present non-empty source value wins; when none matches the
/// kind's default is used.
#[must_use]
pub fn project_row(row: &RawRow, specs: &[FieldSpec]) -> Vec<CellValue> {
    specs
        .iter()
        .map(|spec| {
            spec.aliases
                .iter()
                .find_map(|alias| row.get(*alias).filter(|v| !v.is_empty()))
                .map_or_else(|| spec.kind.default_value(), |raw| spec.kind.coerce(raw))
        })
        .collect()
}

/// Project every row of a record set onto a document schema.
#[must_use]
pub fn project_rows(rows: &[RawRow], specs: &[FieldSpec]) -> Vec<Vec<CellValue>> {
    rows.iter().map(|row| project_row(row, specs)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    const SPECS: &[FieldSpec] = &[
        FieldSpec::new("件数", &["数量"], FieldKind::Int),
        FieldSpec::new("净重", &["净重"], FieldKind::Float),
        FieldSpec::new("单位", &["呵呵", "单位"], FieldKind::Str),
    ];

    #[test]
    fn test_first_nonempty_alias_wins() {
        let r = row(&[("数量", "3"), ("净重", "1.5"), ("呵呵", ""), ("单位", "条")]);
        let projected = project_row(&r, SPECS);
        assert_eq!(projected[0], CellValue::Int(3));
        assert_eq!(projected[1], CellValue::Float(1.5));
        // Empty first alias falls through to the second.
        assert_eq!(projected[2], CellValue::Text("条".to_string()));
    }

    #[test]
    fn test_missing_fields_take_type_defaults() {
        let r = row(&[("无关", "x")]);
        let projected = project_row(&r, SPECS);
        assert_eq!(projected[0], CellValue::Int(0));
        assert_eq!(projected[1], CellValue::Float(0.0));
        assert_eq!(projected[2], CellValue::Text(String::new()));
    }

    #[test]
    fn test_malformed_numeric_takes_default() {
        let r = row(&[("数量", "many"), ("净重", "heavy")]);
        let projected = project_row(&r, SPECS);
        assert_eq!(projected[0], CellValue::Int(0));
        assert_eq!(projected[1], CellValue::Float(0.0));
    }

    #[test]
    fn test_int_coercion_truncates_decimals() {
        let r = row(&[("数量", "2.9")]);
        let projected = project_row(&r, SPECS);
        assert_eq!(projected[0], CellValue::Int(2));
    }

    #[test]
    fn test_projection_is_idempotent_over_rows() {
        let rows = vec![row(&[("数量", "1")]), row(&[("数量", "2")])];
        let first = project_rows(&rows, SPECS);
        let second = project_rows(&rows, SPECS);
        assert_eq!(first, second);
        assert_eq!(first[1][0], CellValue::Int(2));
    }
}
