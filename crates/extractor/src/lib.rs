//! Record extraction and field projection
//!
//! Parses raw spreadsheet bytes into ordered row mappings with every cell
//! read as text, normalizes declared numeric columns, and projects rows onto
//! per-document column schemas through ordered alias lists.

mod extract;
mod project;

pub use extract::{extract_rows, normalize_numeric_columns, read_typed_rows, RawRow};
pub use project::{project_row, project_rows, FieldKind, FieldSpec};

use thiserror::Error;

/// Extraction errors. Any of these is fatal to the whole task: no partial
/// row list is ever returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse workbook: {0}")]
    InputParse(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("workbook has no sheets")]
    NoSheets,
}
