//! Cell values flowing through projection, layout and totals

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell value.
///
/// `Text("")` is the blank marker: a cell deliberately assigned the empty
/// string so the layout engine merges it into its populated neighbor. It is
/// distinct from a cell that is never written at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl CellValue {
    /// Blank marker: merge me into my neighbor.
    #[must_use]
    pub fn blank() -> Self {
        CellValue::Text(String::new())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Numeric view used by total rows. Text cells are parsed leniently
    /// (thousands separators stripped); anything unparseable counts as zero.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Int(v) => *v as f64,
            CellValue::Float(v) => *v,
            CellValue::Text(s) => {
                let cleaned = s.trim().replace(',', "");
                if cleaned.is_empty() {
                    0.0
                } else {
                    cleaned.parse().unwrap_or(0.0)
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_marker() {
        assert!(CellValue::blank().is_blank());
        assert!(!CellValue::Text(" ".to_string()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_as_f64_numeric() {
        assert_eq!(CellValue::Int(6).as_f64(), 6.0);
        assert_eq!(CellValue::Float(2.5).as_f64(), 2.5);
    }

    #[test]
    fn test_as_f64_text_lenient() {
        assert_eq!(CellValue::Text("1,234.5".to_string()).as_f64(), 1234.5);
        assert_eq!(CellValue::Text("  42 ".to_string()).as_f64(), 42.0);
        assert_eq!(CellValue::Text("n/a".to_string()).as_f64(), 0.0);
        assert_eq!(CellValue::blank().as_f64(), 0.0);
    }
}
