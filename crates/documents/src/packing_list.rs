//! Packing list
//!
//! Same frame as the invoice, with shipping and payment-terms panels and
//! carton, quantity and weight columns totalled per shipment.

use exportdoc_extractor::{project_rows, FieldKind, FieldSpec};
use exportdoc_sheet::{BlockMode, CellStyle, Edge, GridCanvas, HAlign, Stamp, VAlign};
use tracing::debug;

use crate::blocks::{t, text_block, value_rows, Block};
use crate::format::fmt_total;
use crate::invoice::padded_heights;
use crate::{BundleInput, DocumentArtifact, DocumentError, Synthesizer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("箱号", &["ASIN"], FieldKind::Str),
    FieldSpec::new("货物名称", &["英文品名"], FieldKind::Str),
    FieldSpec::new("总数", &["箱数"], FieldKind::Int),
    FieldSpec::new("总数量", &["数量"], FieldKind::Int),
    FieldSpec::new("总毛重", &["毛重"], FieldKind::Float),
    FieldSpec::new("总净重", &["净重"], FieldKind::Float),
];

/// Columns summed in the totals row.
const TOTAL_COLUMNS: &[usize] = &[2, 3, 4, 5];

const COL_WIDTHS: &[f64] = &[16.0, 39.0, 16.0, 16.0, 22.0, 22.0];

const SELLER_NAME: &str = "91330110MA28TYA536杭州同尘家居有限公司";
const SELLER_ADDRESS: &str = "浙江省杭州市余杭区余杭经济技术开发区北沙东路7号2幢324室";

pub struct PackingList;

impl Synthesizer for PackingList {
    fn name(&self) -> &'static str {
        "报关资料3-装箱单.xlsx"
    }

    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError> {
        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(COL_WIDTHS);
        canvas.set_default_row_height(16.1);

        let center = CellStyle::new().align(HAlign::Center, VAlign::Middle);
        let mut row = canvas.write_block(
            &text_block(&[&["装 箱 单", "", "", "", "", ""]]),
            0,
            0,
            BlockMode::MergeHorizontal,
            &center.clone().font("等线", 22.0),
        );
        row = canvas.write_block(
            &text_block(&[&["PACKING LIST", "", "", "", "", ""]]),
            row,
            0,
            BlockMode::MergeHorizontal,
            &center.clone().font("等线", 20.0),
        );

        let panel_style = CellStyle::new()
            .font("等线", 10.0)
            .bordered()
            .align(HAlign::Left, VAlign::Middle);
        let seller = text_block(&[
            &["卖方：", SELLER_NAME, ""],
            &["地址：", SELLER_ADDRESS, ""],
            &["买方：", " ", ""],
            &["地址：", " ", ""],
        ]);
        canvas.write_block(&seller, row, 0, BlockMode::MergeHorizontal, &panel_style);
        let dates = text_block(&[
            &["日期 Date:", " "],
            &["发票编号 Invoice No:", " "],
            &["合约号 Contract No:", input.contract_no],
        ]);
        row = canvas.write_block(&dates, row, 4, BlockMode::MergeHorizontal, &panel_style);

        let ship_cn = text_block(&[&["船名", " ", "", "付款条件", " ", ""]]);
        let ship_row = row + 2;
        row = canvas.write_block(
            &ship_cn,
            ship_row,
            0,
            BlockMode::MergeHorizontal,
            &CellStyle::new()
                .font("等线", 12.0)
                .wrap()
                .align(HAlign::Left, VAlign::Middle),
        );
        let ship_en = text_block(&[&["Shipped by", " ", "", "Terms of Payment:", " ", ""]]);
        row = canvas.write_block(
            &ship_en,
            row,
            0,
            BlockMode::MergeHorizontal,
            &CellStyle::new()
                .font("等线", 9.0)
                .wrap()
                .align(HAlign::Left, VAlign::Middle),
        );
        canvas.outline_region(ship_row, ship_row + 1, 0, 5, Edge::Outer);
        canvas.outline_region(ship_row, ship_row + 1, 0, 0, Edge::Outer);
        canvas.outline_region(ship_row, ship_row + 1, 3, 3, Edge::Outer);

        let header_style = CellStyle::new()
            .font("等线", 11.0)
            .bordered()
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        let header = text_block(&[&[
            "箱号\nCtn.No.",
            "货物名称及规格\nDescription",
            "总数(件)\nGe.Crate(CTNS)",
            "总数量\nGe.Quantity",
            "总毛重(千克)\nG.W.: (KG)",
            "总净重(千克)\nN.W.: (KG)",
        ]]);
        row = canvas.write_block(&header, row, 0, BlockMode::MergeHorizontal, &header_style);

        let projected = project_rows(input.rows, FIELDS);
        let data_style = CellStyle::new()
            .font("微软雅黑", 10.0)
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        row = canvas.write_block(
            &value_rows(projected.clone()),
            row,
            0,
            BlockMode::Plain,
            &data_style,
        );

        let total_style = CellStyle::new()
            .font("等线", 12.0)
            .bold()
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        let totals: Block = if projected.is_empty() {
            vec![vec![t("合计 TOTAL"), t(""), t("0"), t("0"), t("0"), t("0")]]
        } else {
            let mut line = vec![t("合计 TOTAL"), t("")];
            for &col in TOTAL_COLUMNS {
                let sum: f64 = projected.iter().map(|r| r[col].as_f64()).sum();
                line.push(Some(fmt_total(sum)));
            }
            vec![line]
        };
        let total_row = row;
        canvas.write_block(&totals, total_row, 0, BlockMode::MergeHorizontal, &total_style);
        canvas.restyle(total_row, 0, |s| s.halign = Some(HAlign::Right));

        let marks_style = CellStyle::new()
            .font("等线", 12.0)
            .bordered()
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        let marks = text_block(&[&["唛头\nMarks", "3V6S7", "", "", "", ""]]);
        row = canvas.write_block(&marks, total_row + 2, 0, BlockMode::MergeHorizontal, &marks_style);

        canvas.set_row_heights(&padded_heights(
            &[33.0, 33.0, 16.1, 16.1, 16.1, 16.1, 16.1, 16.1, 16.1, 33.0, 16.1],
            canvas.max_row(),
        ));

        if let Some(stamp) = input.stamp {
            canvas.set_stamp(Stamp {
                bytes: stamp.to_vec(),
                row: row.saturating_sub(4),
                col: 4,
                width_px: 320,
                height_px: 320,
            });
        }

        debug!(rows = projected.len(), "packing list laid out");
        let bytes = canvas.into_xlsx("PackingList")?;
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
        assert_eq!(totalled, ["总数", "总数量", "总毛重", "总净重"]);
    }
}
