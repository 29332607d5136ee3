//! Commercial invoice
//!
//! Bilingual title, seller and date panels, six-column line items with a
//! totals row and a marks row, stamped.

use exportdoc_common::CellValue;
use exportdoc_extractor::{project_rows, FieldKind, FieldSpec};
use exportdoc_sheet::{BlockMode, CellStyle, GridCanvas, HAlign, Stamp, VAlign};
use tracing::debug;

use crate::blocks::{t, text_block, value_rows, Block};
use crate::format::fmt_total;
use crate::{BundleInput, DocumentArtifact, DocumentError, Synthesizer};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("箱号", &["ASIN"], FieldKind::Str),
    FieldSpec::new("货物名称", &["英文品名"], FieldKind::Str),
    FieldSpec::new("数量", &["数量"], FieldKind::Int),
    FieldSpec::new("单位", &["呵呵"], FieldKind::Str),
    FieldSpec::new("单价", &["单价"], FieldKind::Int),
    FieldSpec::new("总数额", &["总价"], FieldKind::Int),
];

const COL_WIDTHS: &[f64] = &[16.0, 38.44, 14.0, 14.0, 22.0, 22.0];

const SELLER_NAME: &str = "91330110MA28TYA536杭州同尘家居有限公司";
const SELLER_ADDRESS: &str = "浙江省杭州市余杭区余杭经济技术开发区北沙东路7号2幢324室";

pub struct Invoice;

impl Synthesizer for Invoice {
    fn name(&self) -> &'static str {
        "报关资料2-发票.xlsx"
    }

    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError> {
        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(COL_WIDTHS);
        canvas.set_default_row_height(16.1);

        let center = CellStyle::new().align(HAlign::Center, VAlign::Middle);
        let mut row = canvas.write_block(
            &text_block(&[&["发票", "", "", "", "", ""]]),
            0,
            0,
            BlockMode::MergeHorizontal,
            &center.clone().font("等线", 22.0),
        );
        row = canvas.write_block(
            &text_block(&[&["INVOICE", "", "", "", "", ""]]),
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

        let header_style = CellStyle::new()
            .font("等线", 11.0)
            .bordered()
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        let header = text_block(&[&[
            "箱号\nCtn.No.",
            "货物名称及规格\nDescription",
            "数量\nQuantity",
            "单位\nUnit",
            "单价\nUnit price",
            "总金额\nAmount",
        ]]);
        row = canvas.write_block(&header, row + 2, 0, BlockMode::MergeHorizontal, &header_style);

        let mut projected = project_rows(input.rows, FIELDS);
        for line in &mut projected {
            // Unit column defaults to the settlement currency.
            if line[3].is_blank() {
                line[3] = CellValue::Text("JPY".to_string());
            }
        }
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
            vec![vec![t("合计 TOTAL"), t(""), t(""), t(" "), t(" "), t("0")]]
        } else {
            let qty: f64 = projected.iter().map(|r| r[2].as_f64()).sum();
            let amount: f64 = projected.iter().map(|r| r[5].as_f64()).sum();
            vec![vec![
                t("合计 TOTAL"),
                t(""),
                Some(fmt_total(qty)),
                t(" "),
                t(" "),
                Some(fmt_total(amount)),
            ]]
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
            &[33.0, 33.0, 16.1, 16.1, 16.1, 16.1, 16.1, 33.0, 16.1],
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

        debug!(rows = projected.len(), "invoice laid out");
        let bytes = canvas.into_xlsx("fapiao")?;
        Ok(DocumentArtifact {
            name: self.name(),
            bytes,
        })
    }
}

/// Extend the fixed leading heights to cover the sheet, keeping a tall
/// closing row.
pub(crate) fn padded_heights(base: &[f64], max_row: u32) -> Vec<f64> {
    let mut heights = base.to_vec();
    let rows = max_row as usize + 1;
    if heights.len() < rows {
        let need = rows - heights.len();
        heights.extend(std::iter::repeat(16.1).take(need.saturating_sub(2)));
        heights.push(33.0);
    }
    heights
}
