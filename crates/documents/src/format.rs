//! Number rendering shared by the document builders

use exportdoc_common::CellValue;

/// Render a column sum: whole values stay integers, fractional values are
/// rounded to two decimals.
pub(crate) fn fmt_total(x: f64) -> CellValue {
    if (x - x.round()).abs() < 1e-9 {
        CellValue::Int(x.round() as i64)
    } else {
        CellValue::Float((x * 100.0).round() / 100.0)
    }
}

/// Format with a fixed number of decimals and comma-grouped thousands.
pub(crate) fn fmt_thousands(x: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_total_whole_stays_int() {
        assert_eq!(fmt_total(60.0), CellValue::Int(60));
        assert_eq!(fmt_total(60.0000000001), CellValue::Int(60));
    }

    #[test]
    fn test_fmt_total_fraction_rounds() {
        assert_eq!(fmt_total(1.2345), CellValue::Float(1.23));
        assert_eq!(fmt_total(2.678), CellValue::Float(2.68));
    }

    #[test]
    fn test_fmt_thousands_grouping() {
        assert_eq!(fmt_thousands(1234567.0, 2), "1,234,567.00");
        assert_eq!(fmt_thousands(999.0, 2), "999.00");
        assert_eq!(fmt_thousands(1000.0, 4), "1,000.0000");
        assert_eq!(fmt_thousands(0.0, 2), "0.00");
    }

    #[test]
    fn test_fmt_thousands_negative() {
        assert_eq!(fmt_thousands(-1234.5, 2), "-1,234.50");
    }
}
