//! Export customs declaration
//!
//! Declaration form with a synthesized header grid, one three-row item
//! block per commodity group and the customs processing footer. Requires
//! at least one usable record group.

use exportdoc_common::CellValue;
use exportdoc_sheet::{BlockMode, CellStyle, Edge, GridCanvas, HAlign, VAlign};
use tracing::info;

use crate::aggregate::{group_for_customs, LineAggregate};
use crate::blocks::{t, Block};
use crate::{BundleInput, DocumentArtifact, DocumentError, Synthesizer};

const COL_WIDTHS: &[f64] = &[
    11.0, 8.0, 9.0, 8.0, 9.0, 8.5, 7.5, 10.5, 8.0, 9.5, 9.0, 9.0,
];

const FOOTER_HEIGHTS: &[f64] = &[
    20.25, 13.5, 24.75, 14.25, 22.5, 14.25, 21.75, 14.25, 12.0, 9.75, 14.25, 14.25, 14.25, 14.25,
];

pub struct CustomsDeclaration;

impl Synthesizer for CustomsDeclaration {
    fn name(&self) -> &'static str {
        "报关资料5-出口报关单.xlsx"
    }

    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError> {
        let groups = group_for_customs(input.rows);
        if groups.is_empty() {
            return Err(DocumentError::MissingReference);
        }

        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(COL_WIDTHS);
        canvas.set_default_row_height(14.25);

        self.write_header(&mut canvas);

        let label_style = CellStyle::new()
            .font("仿宋_GB2312", 9.0)
            .align(HAlign::Left, VAlign::Middle);
        let item_header: Block = vec![vec![
            t("项号   商品编号"),
            t("商品名称、规格型号"),
            t(""),
            t(""),
            t(""),
            t("数量及单位"),
            t(""),
            t("最终目的国（地区）"),
            t(""),
            t(""),
            t("单价/总价/币制  征免"),
            t(""),
        ]];
        let mut row = canvas.write_block(&item_header, 21, 0, BlockMode::MergeHorizontal, &label_style);
        canvas.outline_region(row - 1, row - 1, 0, 11, Edge::Outer);

        let item_style = CellStyle::new()
            .font("Times New Roman", 10.0)
            .bold()
            .align(HAlign::Left, VAlign::Middle);
        for (index, (key, line)) in groups.iter().enumerate() {
            row = self.write_item(&mut canvas, row, index + 1, &key.display_name,
                key.variant.as_deref().unwrap_or(""), key.unit_price, line, &item_style);
        }

        self.write_footer(&mut canvas, row);

        // Aggregate figures and shipment references for the header cells.
        let mut reference = String::new();
        let mut origin = String::new();
        let mut total_net = 0.0;
        let mut total_gross = 0.0;
        let mut total_cartons = 0i64;
        for (_, line) in groups.iter() {
            reference = line.reference.clone();
            origin = line.origin.clone();
            total_net += line.net_weight;
            total_gross += line.gross_weight;
            total_cartons += line.cartons;
        }
        info!(
            %reference,
            %origin,
            total_net,
            total_gross,
            total_cartons,
            "customs declaration summary"
        );
        let value_style = CellStyle::new()
            .font("仿宋_GB2312", 9.0)
            .align(HAlign::Left, VAlign::Middle);
        canvas.write_cell(15, 0, CellValue::Text(reference), value_style.clone());
        canvas.write_cell(15, 1, CellValue::Int(total_cartons), value_style.clone());
        canvas.write_cell(15, 6, CellValue::Float(total_gross), value_style.clone());
        canvas.write_cell(15, 10, CellValue::Float(total_net), value_style.clone());
        canvas.write_cell(11, 9, CellValue::Text(origin), value_style);

        let bytes = canvas.into_xlsx("baoguan")?;
        Ok(DocumentArtifact {
            name: self.name(),
            bytes,
        })
    }
}

impl CustomsDeclaration {
    /// Fixed declaration-form header: title, field captions, and the grid
    /// the summary values land in.
    fn write_header(&self, canvas: &mut GridCanvas) {
        let title_style = CellStyle::new()
            .font("仿宋_GB2312", 14.0)
            .bold()
            .align(HAlign::Center, VAlign::Middle);
        canvas.write_cell(
            0,
            0,
            CellValue::Text("中华人民共和国海关出口货物报关单".to_string()),
            title_style,
        );
        canvas.merge(0, 0, 0, 11);
        canvas.set_row_height(0, 27.0);

        let label_style = CellStyle::new()
            .font("仿宋_GB2312", 9.0)
            .align(HAlign::Left, VAlign::Middle);
        let labels: &[(u32, &[(u16, &str)])] = &[
            (1, &[(0, "预录入编号："), (6, "海关编号：")]),
            (
                3,
                &[
                    (0, "境内发货人"),
                    (2, "出境关别"),
                    (4, "出口日期"),
                    (6, "申报日期"),
                    (8, "备案号"),
                ],
            ),
            (
                5,
                &[
                    (0, "境外收货人"),
                    (2, "运输方式"),
                    (4, "运输工具名称及航次号"),
                    (8, "提运单号"),
                ],
            ),
            (
                7,
                &[
                    (0, "生产销售单位"),
                    (2, "监管方式"),
                    (4, "征免性质"),
                    (8, "许可证号"),
                ],
            ),
            (
                9,
                &[
                    (0, "贸易国（地区）"),
                    (2, "运抵国（地区）"),
                    (4, "指运港"),
                    (6, "离境口岸"),
                    (8, "成交方式"),
                ],
            ),
            (
                11,
                &[
                    (0, "包装种类"),
                    (2, "运费"),
                    (4, "保费"),
                    (6, "杂费"),
                    (8, "境内货源地"),
                ],
            ),
            (13, &[(0, "随附单证及编号")]),
            (
                14,
                &[
                    (0, "合同协议号"),
                    (1, "件数"),
                    (6, "毛重（千克）"),
                    (10, "净重（千克）"),
                ],
            ),
            (17, &[(0, "标记唛码及备注")]),
        ];
        for (row, cells) in labels {
            for (col, text) in *cells {
                canvas.write_cell(*row, *col, CellValue::Text((*text).to_string()), label_style.clone());
            }
        }

        canvas.outline_region(1, 20, 0, 11, Edge::Outer);
        for row in [2, 6, 8, 10, 12, 16] {
            canvas.outline_region(row, row, 0, 11, Edge::Bottom);
        }
    }

    /// One commodity group: item number and name, quantity, destination,
    /// price and duty columns over three rows.
    #[allow(clippy::too_many_arguments)]
    fn write_item(
        &self,
        canvas: &mut GridCanvas,
        start_row: u32,
        index: usize,
        display_name: &str,
        variant: &str,
        unit_price: i64,
        line: &LineAggregate,
        style: &CellStyle,
    ) -> u32 {
        let show_name = format!(" {index:02}  {display_name}");
        let variant = if variant.is_empty() {
            "有问题！！！！"
        } else {
            variant
        };

        let block: Block = vec![
            vec![
                t(&show_name),
                t(""),
                t(""),
                t(""),
                None,
                Some(CellValue::Int(line.quantity)),
                t("条"),
                t("中国（CHN）"),
                t(""),
                t(""),
                Some(CellValue::Int(unit_price)),
                t("照章征税"),
            ],
            vec![
                None,
                t(variant),
                None,
                None,
                Some(CellValue::Float(line.net_weight)),
                t(""),
                t("千克"),
                None,
                None,
                Some(CellValue::Int(line.amount.trunc() as i64)),
                t(""),
                None,
            ],
            vec![
                None, None, None, None, None, None, None, None, None, None,
                t("日本元"),
                None,
            ],
        ];
        let next = canvas.write_block(&block, start_row, 0, BlockMode::MergeHorizontal, style);
        let (r0, r1, r2) = (start_row, start_row + 1, start_row + 2);

        canvas.merge(r1, 1, r2, 3);
        canvas.restyle(r1, 1, |s| {
            s.font_name = Some("Times New Roman");
            s.font_size = Some(8.0);
            s.halign = Some(HAlign::Left);
            s.valign = Some(VAlign::Top);
            s.wrap = true;
        });

        for (row, col) in [(r0, 5), (r1, 4), (r0, 10), (r1, 9), (r2, 10)] {
            canvas.restyle(row, col, |s| s.halign = Some(HAlign::Right));
        }
        canvas.restyle(r1, 4, |s| s.num_format = Some("0.00".to_string()));
        canvas.restyle(r0, 11, |s| s.halign = Some(HAlign::Center));

        canvas.outline_region(r0, r2, 0, 11, Edge::Outer);
        for row in r0..=r2 {
            canvas.set_row_height(row, 17.0);
        }

        next
    }

    /// Customs processing footer: confirmations, declarant panel and the
    /// clearance checkboxes down the right edge.
    fn write_footer(&self, canvas: &mut GridCanvas, start_row: u32) {
        let style = CellStyle::new()
            .font("仿宋_GB2312", 9.0)
            .align(HAlign::Left, VAlign::Bottom);
        let block: Block = vec![
            vec![
                t(" "),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
                t(""),
            ],
            vec![
                t("特殊关系确认： "),
                t("否"),
                t("价格影响确认："),
                t(""),
                t("否"),
                None,
                None,
                None,
                t("支付特许权使用费确认："),
                t(""),
                t(""),
                t("否"),
            ],
            vec![t("报关员 "), None, None, None, None, None, None, t(" 审单")],
            vec![None],
            vec![
                t("单位地址"),
                t(""),
                t("申报单位（签章）"),
                None,
                None,
                None,
                None,
                t(" 征税"),
            ],
            vec![None],
            vec![None, None, None, None, None, None, None, t(" 查验"), None, None, t("审价")],
            vec![t("邮编              电话"), t(""), t("填制日期"), t("")],
            vec![None, None, None, None, None, None, None, None, None, None, t("统计")],
            vec![None],
            vec![None, None, None, None, None, None, None, None, None, None, t("放行")],
            vec![None],
            vec![None],
            vec![None, None, None, None, None, None, None, None, None, t("海关编制"), t("")],
        ];
        let next = canvas.write_block(&block, start_row, 0, BlockMode::MergeHorizontal, &style);
        let end_row = next - 1;

        for (offset, height) in FOOTER_HEIGHTS.iter().enumerate() {
            canvas.set_row_height(start_row + offset as u32, *height);
        }

        canvas.outline_region(start_row, end_row, 0, 11, Edge::Outer);
        canvas.outline_region(start_row + 4, start_row + 4, 0, 11, Edge::Outer);
        for offset in [5, 6, 7, 9, 10] {
            canvas.outline_region(start_row + offset, start_row + offset, 7, 11, Edge::Outer);
        }
        for offset in [6, 7, 8] {
            canvas.outline_region(start_row + offset, start_row + offset, 0, 1, Edge::Bottom);
        }
    }
}
