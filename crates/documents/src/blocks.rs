//! Block construction helpers for the builders

use exportdoc_common::CellValue;

pub(crate) type Block = Vec<Vec<Option<CellValue>>>;

/// Shorthand for a set text cell. An empty string is the blank marker that
/// merges into its populated neighbor.
pub(crate) fn t(s: &str) -> Option<CellValue> {
    Some(CellValue::Text(s.to_string()))
}

/// Build a block of text rows. Rows may be ragged.
pub(crate) fn text_block(rows: &[&[&str]]) -> Block {
    rows.iter()
        .map(|row| row.iter().map(|s| t(s)).collect())
        .collect()
}

/// Wrap projected values into a dense block row.
pub(crate) fn value_rows(rows: Vec<Vec<CellValue>>) -> Block {
    rows.into_iter()
        .map(|row| row.into_iter().map(Some).collect())
        .collect()
}
