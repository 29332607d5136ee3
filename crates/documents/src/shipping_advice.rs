//! Advance shipping notice
//!
//! Sixteen-column manifest of every record: identifiers, counts, prices,
//! weights and packing dimensions, closed by a totals row. No stamp.

use exportdoc_common::CellValue;
use exportdoc_extractor::{project_rows, FieldKind, FieldSpec};
use exportdoc_sheet::{BlockMode, CellStyle, GridCanvas, HAlign, VAlign};
use tracing::debug;

use crate::blocks::{t, text_block, value_rows};
use crate::format::fmt_total;
use crate::{BundleInput, DocumentArtifact, DocumentError, Synthesizer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("PO#", &["PO"], FieldKind::Str),
    FieldSpec::new("SKU#", &["ASIN"], FieldKind::Str),
    FieldSpec::new("中文品名", &["中文品名"], FieldKind::Str),
    FieldSpec::new("英文品名", &["英文品名"], FieldKind::Str),
    FieldSpec::new("HS CODE", &["海关编码"], FieldKind::Str),
    FieldSpec::new("托数", &["托数"], FieldKind::Int),
    FieldSpec::new("箱数", &["箱数"], FieldKind::Int),
    FieldSpec::new("件数", &["数量"], FieldKind::Int),
    FieldSpec::new("单价", &["单价"], FieldKind::Int),
    FieldSpec::new("总价", &["总价"], FieldKind::Int),
    FieldSpec::new("净重", &["净重"], FieldKind::Float),
    FieldSpec::new("毛重", &["毛重"], FieldKind::Float),
    FieldSpec::new("长", &["长"], FieldKind::Int),
    FieldSpec::new("宽", &["宽"], FieldKind::Int),
    FieldSpec::new("高", &["高"], FieldKind::Int),
    FieldSpec::new("体积", &["体积"], FieldKind::Float),
];

/// Columns summed in the totals row.
const TOTAL_COLUMNS: &[usize] = &[5, 6, 7, 9, 10, 11, 15];

const COL_WIDTHS: &[f64] = &[
    9.88, 12.38, 21.23, 21.23, 12.73, 9.23, 9.23, 9.23, 10.63, 10.63, 11.28, 11.28, 5.52, 5.52,
    5.52, 7.22,
];

pub struct ShippingAdvice;

impl Synthesizer for ShippingAdvice {
    fn name(&self) -> &'static str {
        "报关资料1-ASN.xlsx"
    }

    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError> {
        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(COL_WIDTHS);
        canvas.set_row_heights(&[27.75, 21.0]);
        canvas.set_default_row_height(21.0);

        let title_style = CellStyle::new()
            .font("楷体", 20.0)
            .bold()
            .align(HAlign::Center, VAlign::Middle);
        let title = text_block(&[&["Advance Shipping Notice", "", "", ""]]);
        let mut row = canvas.write_block(&title, 0, 0, BlockMode::MergeHorizontal, &title_style);

        let vendor_style = CellStyle::new()
            .font("楷体", 10.0)
            .bold()
            .underline()
            .align(HAlign::Left, VAlign::Middle);
        let vendor = text_block(&[
            &["Vendor", "供货商"],
            &["Booking Key:", "", "提单号"],
            &["Appointment Key:", "", "预约号"],
            &["Truck information:", "", "车辆信息（车号 电话）"],
            &["Cargo delivery date:", "", "送货日期"],
        ]);
        row = canvas.write_block(&vendor, row, 0, BlockMode::MergeHorizontal, &vendor_style);

        let header_style = CellStyle::new()
            .font("楷体", 10.0)
            .bold()
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        let header = text_block(&[
            &[
                "PO#", "SKU#", "中文品名", "英文品名", "HS CODE", "托数", "箱数", "件数", "单价",
                "总价", "净重", "毛重", "包装尺寸（m）", "", "", "体积",
            ],
            &[
                "", "", "", "", "", "pallet", "carton", "pc", "unit price", "amount", "", "", "长",
                "宽", "高", "",
            ],
        ]);
        let dims_row = row;
        row = canvas.write_block(&header, row, 0, BlockMode::MergeVertical, &header_style);
        // The packing-dimensions label spans its three sub-columns.
        canvas.merge(dims_row, 12, dims_row, 14);

        let projected = project_rows(input.rows, FIELDS);
        let data_style = CellStyle::new()
            .font("楷体", 10.0)
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        let data = value_rows(projected.clone());
        row = canvas.write_block(&data, row, 0, BlockMode::Plain, &data_style);

        if !projected.is_empty() {
            let mut totals: Vec<Option<CellValue>> = vec![t(""); FIELDS.len()];
            for &col in TOTAL_COLUMNS {
                let sum: f64 = projected.iter().map(|r| r[col].as_f64()).sum();
                totals[col] = Some(fmt_total(sum));
            }
            totals[0] = t("TOTAL:");
            canvas.write_block(&[totals], row, 0, BlockMode::Plain, &header_style);
        }

        debug!(rows = projected.len(), "shipping advice laid out");
        let bytes = canvas.into_xlsx("ASN")?;
        Ok(DocumentArtifact {
            name: self.name(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_sum_their_own_columns() {
        let totalled: Vec<&str> = TOTAL_COLUMNS.iter().map(|&c| FIELDS[c].target).collect();
        assert_eq!(
            totalled,
            ["托数", "箱数", "件数", "总价", "净重", "毛重", "体积"]
        );
    }

    #[test]
    fn test_column_widths_cover_every_field() {
        assert_eq!(COL_WIDTHS.len(), FIELDS.len());
    }
}
