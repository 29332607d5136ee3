//! Spreadsheet parsing and numeric normalization

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use tracing::debug;

use crate::ExtractError;

/// One spreadsheet row as a mapping of column name to raw text.
/// Empty cells are normalized to the empty string.
pub type RawRow = HashMap<String, String>;

/// Columns coerced to integers during normalization. Decimal strings are
/// accepted and truncated.
const INT_COLUMNS: &[&str] = &[
    "数量", "系数", "箱数", "项目", "单价", "总价", "长", "宽", "高", "托数",
];

/// Columns coerced to floats during normalization.
const FLOAT_COLUMNS: &[&str] = &["体积", "净重", "毛重"];

/// Parse raw spreadsheet bytes into an ordered sequence of rows.
///
/// The first row of the selected sheet is the header row; every subsequent
/// row becomes one [`RawRow`] keyed by header text. All cells are read as
/// text. `sheet` selects a sheet by name; `None` uses the first sheet.
///
/// # Errors
/// Returns [`ExtractError::InputParse`] when the bytes are not a readable
/// workbook, [`ExtractError::SheetNotFound`] when the selector does not
/// match, and [`ExtractError::NoSheets`] for a workbook without sheets.
pub fn extract_rows(bytes: &[u8], sheet: Option<&str>) -> Result<Vec<RawRow>, ExtractError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ExtractError::InputParse(e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ExtractError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|_| ExtractError::SheetNotFound(sheet_name.clone()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut mapping = RawRow::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(idx).map(cell_text).unwrap_or_default();
            mapping.insert(header.clone(), value);
        }
        // Skip fully empty trailing rows.
        if mapping.values().any(|v| !v.is_empty()) {
            rows.push(mapping);
        }
    }

    debug!(rows = rows.len(), sheet = %sheet_name, "extracted rows");
    Ok(rows)
}

/// Normalize declared numeric columns in place.
///
/// After this pass every declared numeric column that exists in a row holds
/// a canonical numeric string: integers for the integer table, floats for
/// the float table. Empty or unparseable input becomes `0` / `0` — coercion
/// never fails outward.
pub fn normalize_numeric_columns(rows: &mut [RawRow]) {
    for row in rows.iter_mut() {
        for column in INT_COLUMNS {
            if let Some(value) = row.get_mut(*column) {
                *value = coerce_int(value).to_string();
            }
        }
        for column in FLOAT_COLUMNS {
            if let Some(value) = row.get_mut(*column) {
                *value = coerce_float(value).to_string();
            }
        }
    }
}

/// Extract rows and apply numeric normalization in one step.
///
/// # Errors
/// Same as [`extract_rows`].
pub fn read_typed_rows(bytes: &[u8], sheet: Option<&str>) -> Result<Vec<RawRow>, ExtractError> {
    let mut rows = extract_rows(bytes, sheet)?;
    normalize_numeric_columns(&mut rows);
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    if cell.is_empty() {
        String::new()
    } else {
        cell.as_string().unwrap_or_default().trim().to_string()
    }
}

/// Lenient integer coercion: accepts decimal strings, truncates toward zero,
/// substitutes zero for anything unparseable.
pub(crate) fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed
        .parse::<f64>()
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

/// Lenient float coercion: substitutes zero for anything unparseable.
pub(crate) fn coerce_float(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_workbook(headers: &[&str], data: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in data.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet
                    .write_string((r + 1) as u32, c as u16, *value)
                    .unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_extract_rows_reads_all_cells_as_text() {
        let bytes = sample_workbook(
            &["中文品名", "数量", "净重"],
            &[&["桌布", "3", "1.5"], &["椅套", "", "2.25"]],
        );
        let rows = extract_rows(&bytes, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["中文品名"], "桌布");
        assert_eq!(rows[0]["数量"], "3");
        assert_eq!(rows[1]["数量"], "");
        assert_eq!(rows[1]["净重"], "2.25");
    }

    #[test]
    fn test_extract_rows_rejects_garbage() {
        let err = extract_rows(b"definitely not a spreadsheet", None).unwrap_err();
        assert!(matches!(err, crate::ExtractError::InputParse(_)));
    }

    #[test]
    fn test_extract_rows_unknown_sheet() {
        let bytes = sample_workbook(&["a"], &[&["1"]]);
        let err = extract_rows(&bytes, Some("missing")).unwrap_err();
        assert!(matches!(err, crate::ExtractError::SheetNotFound(_)));
    }

    #[test]
    fn test_normalize_numeric_columns_totality() {
        let bytes = sample_workbook(
            &["数量", "净重", "中文品名"],
            &[
                &["3", "1.5", "桌布"],
                &["", "", "椅套"],
                &["abc", "xyz", "靠垫"],
                &["2.9", "0.75", "地毯"],
            ],
        );
        let rows = read_typed_rows(&bytes, None).unwrap();
        assert_eq!(rows[0]["数量"], "3");
        assert_eq!(rows[1]["数量"], "0");
        assert_eq!(rows[1]["净重"], "0");
        assert_eq!(rows[2]["数量"], "0");
        // Decimal strings truncate for integer columns.
        assert_eq!(rows[3]["数量"], "2");
        assert_eq!(rows[3]["净重"], "0.75");
        // Non-numeric columns untouched.
        assert_eq!(rows[2]["中文品名"], "靠垫");
    }

    #[test]
    fn test_coercion_helpers() {
        assert_eq!(coerce_int("12"), 12);
        assert_eq!(coerce_int("12.9"), 12);
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("x"), 0);
        assert_eq!(coerce_float("1.25"), 1.25);
        assert_eq!(coerce_float(""), 0.0);
        assert_eq!(coerce_float("x"), 0.0);
    }
}
