//! Task-kind tag shared by the API surface and the worker dispatch

use serde::{Deserialize, Serialize};

/// The kind of processing a submitted file goes through.
///
/// Wire names are fixed; the pipeline crate owns the single dispatch table
/// mapping each kind to its handler and default output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Image passthrough
    Image,
    /// Spreadsheet passthrough
    Excel,
    /// Spreadsheet to PDF conversion
    ExcelToPdf,
    /// Plain text passthrough
    Text,
    /// Customs document bundle: one spreadsheet in, five documents zipped out
    Baoguan,
}

impl TaskKind {
    /// Stable wire name, matching the serde representation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Excel => "excel",
            Self::ExcelToPdf => "excel_to_pdf",
            Self::Text => "text",
            Self::Baoguan => "baoguan",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskKind::ExcelToPdf).unwrap(),
            "\"excel_to_pdf\""
        );
        assert_eq!(
            serde_json::from_str::<TaskKind>("\"baoguan\"").unwrap(),
            TaskKind::Baoguan
        );
        for kind in [
            TaskKind::Image,
            TaskKind::Excel,
            TaskKind::ExcelToPdf,
            TaskKind::Text,
            TaskKind::Baoguan,
        ] {
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.name())
            );
        }
    }
}
