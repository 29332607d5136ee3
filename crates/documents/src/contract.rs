//! Sales contract
//!
//! Line items are grouped by product name and unit price, priced to four
//! decimals with thousands separators, followed by the standard contract
//! terms and a signature block.

use exportdoc_common::CellValue;
use exportdoc_sheet::{BlockMode, CellStyle, Edge, GridCanvas, HAlign, Stamp, VAlign};
use tracing::debug;

use crate::aggregate::group_for_contract;
use crate::blocks::{t, text_block};
use crate::format::fmt_thousands;
use crate::{BundleInput, DocumentArtifact, DocumentError, Synthesizer};

const COL_WIDTHS: &[f64] = &[20.0, 18.22, 13.0, 15.0, 13.22, 15.11, 4.11];

const ROW_HEIGHTS: &[f64] = &[
    52.5, 12.0, 13.5, 15.8, 13.5, 15.0, 16.5, 13.5, 16.5, 13.5, 16.5, 13.5, 13.5, 13.5, 13.5,
    13.5, 15.5, 13.5,
];

const SELLER_NAME: &str = "91330110MA28TYA536杭州同尘家居有限公司";
const SELLER_ADDRESS: &str = "浙江省杭州市余杭区余杭经济技术开发区北沙东路7号2幢324室";
const SELLER_PHONE: &str = "15658813815";

pub struct Contract;

impl Synthesizer for Contract {
    fn name(&self) -> &'static str {
        "报关资料4-合同.xlsx"
    }

    fn build(&self, input: &BundleInput<'_>) -> Result<DocumentArtifact, DocumentError> {
        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(COL_WIDTHS);
        canvas.set_default_row_height(16.1);

        let title_style = CellStyle::new()
            .font("等线", 22.0)
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        canvas.write_block(
            &text_block(&[&["合       同\nCONTRACT", "", "", "", "", "", ""]]),
            0,
            0,
            BlockMode::MergeHorizontal,
            &title_style,
        );

        self.write_parties_panel(&mut canvas, input.contract_no);

        let intro_style = CellStyle::new()
            .font("等线", 10.0)
            .wrap()
            .align(HAlign::Left, VAlign::Middle);
        let intro = text_block(&[
            &["经买卖双方确认根据下列条款订立本合同", ""],
            &[
                "This contract is made out by the Selers and Buyers as per the following terms and conditions mutuilly confirmed:",
                "", "", "", "", "",
            ],
        ]);
        let mut row = canvas.write_block(&intro, 14, 0, BlockMode::MergeHorizontal, &intro_style);

        let header_style = CellStyle::new()
            .font("等线", 11.0)
            .bordered()
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        let header = text_block(&[
            &["(1) 货物名称及规格", "", "(2) 数 量", "(3) 单 位", "(4) 单 价", "(5) 金 额", ""],
            &["Name of commodity ", "", "Quantity", "Unit", "Unit Price", "Amount", ""],
        ]);
        row = canvas.write_block(&header, row, 0, BlockMode::MergeHorizontal, &header_style);

        let groups = group_for_contract(input.rows);
        let line_style = CellStyle::new()
            .font("等线", 11.0)
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        for (key, line) in groups.iter() {
            let cells = vec![
                t(&key.display_name),
                t(""),
                Some(CellValue::Int(line.quantity)),
                t("条"),
                t(&fmt_thousands(key.unit_price as f64, 4)),
                t(&fmt_thousands(line.amount, 2)),
                t("JPY"),
            ];
            row = canvas.write_block(&[cells], row, 0, BlockMode::MergeHorizontal, &line_style);
        }

        let total_qty: i64 = groups.iter().map(|(_, line)| line.quantity).sum();
        // Group amounts are truncated to whole units before the grand total.
        let total_money: i64 = groups.iter().map(|(_, line)| line.amount.trunc() as i64).sum();
        let total = vec![
            t("Total"),
            t(""),
            Some(CellValue::Int(total_qty)),
            t(" "),
            t(" "),
            t(&fmt_thousands(total_money as f64, 2)),
            t("JPY"),
        ];
        let total_row = row;
        row = canvas.write_block(&[total], total_row, 0, BlockMode::MergeHorizontal, &line_style);
        canvas.restyle(total_row, 0, |s| {
            s.bold = true;
            s.halign = Some(HAlign::Right);
        });

        let terms_style = CellStyle::new()
            .font("等线", 12.0)
            .align(HAlign::Left, VAlign::Middle);
        let terms = text_block(&[
            &["数量及总值允许有  2    %的增减。", "", ""],
            &[" 2  % more or less both in amount and quantity allowed.    ", "", "", "", ""],
            &["合同总值（大写）", "", "", "", ""],
            &["Total Value in Word:   ", "", "", "", ""],
            &["包装及唛头", "", "", "", ""],
            &["Packing and shipping Marks:   ", "", "", "", ""],
            &["装运期", "", "", "", ""],
            &["Time of Shipment:", "", "", "", ""],
            &["装运口岸和目的地", "", "", "", ""],
            &["Loading Port & Destination:", "", "", "", ""],
            &["付款条件  ", "", "", "", ""],
            &["Terms of Payment", "", "", "", ""],
            &["装运标记  ", "", "", "", ""],
            &["Shipping Marks:  ", "", "", "", ""],
            &["  "],
        ]);
        let terms_row = row + 1;
        row = canvas.write_block(&terms, terms_row, 0, BlockMode::MergeHorizontal, &terms_style);
        for offset in [0, 1, 3, 5, 7, 9, 11, 13] {
            canvas.restyle(terms_row + offset, 0, |s| {
                s.font_size = Some(10.0);
                s.halign = Some(HAlign::Left);
            });
        }

        let signature_style = CellStyle::new()
            .font("等线", 12.0)
            .align(HAlign::Center, VAlign::Middle);
        let signatures = text_block(&[
            &["卖  方", "", " ", "买  方", ""],
            &["  "],
            &["THE SELLERS", "", " ", "THE BUYERS", ""],
        ]);
        row = canvas.write_block(&signatures, row, 0, BlockMode::MergeHorizontal, &signature_style);

        let mut heights = ROW_HEIGHTS.to_vec();
        let rows = canvas.max_row() as usize + 1;
        if heights.len() < rows {
            heights.extend(std::iter::repeat(16.1).take(rows - heights.len() - 1));
        }
        canvas.set_row_heights(&heights);

        if let Some(stamp) = input.stamp {
            canvas.set_stamp(Stamp {
                bytes: stamp.to_vec(),
                row: row.saturating_sub(11),
                col: 1,
                width_px: 300,
                height_px: 300,
            });
        }

        debug!(groups = groups.len(), "contract laid out");
        let bytes = canvas.into_xlsx("ZhangXiang")?;
        Ok(DocumentArtifact {
            name: self.name(),
            bytes,
        })
    }
}

impl Contract {
    /// Seller and buyer identification panel with its fixed merge layout.
    fn write_parties_panel(&self, canvas: &mut GridCanvas, contract_no: &str) {
        let style = CellStyle::new()
            .font("等线", 11.0)
            .wrap()
            .align(HAlign::Center, VAlign::Middle);
        let panel = text_block(&[
            &["卖    方", SELLER_NAME],
            &["Sellers:"],
            &["地    址", SELLER_ADDRESS],
            &["Address:", " ", " ", " ", "预约号"],
            &["电    话", SELLER_PHONE, "传  真", " ", "Contract No:", contract_no],
            &["TEL:", " ", "FAX:", " ", "日     期"],
            &["买    方", " ", " ", " ", "Date:"],
            &["Buyers:", " ", " ", " ", "签约地点"],
            &["地    址", " ", " ", " ", "Signed at:"],
            &["Address:", " ", " ", " ", " "],
            &["电    话:", " ", "传  真"],
            &["TEL:", " ", "FAX:"],
        ]);
        canvas.write_block(&panel, 2, 0, BlockMode::MergeVertical, &style);

        for (fr, fc, lr, lc) in [
            (2, 1, 3, 3),
            (4, 1, 5, 3),
            (6, 1, 7, 1),
            (6, 3, 7, 3),
            (8, 1, 9, 3),
            (10, 1, 11, 3),
            (12, 1, 13, 1),
            (12, 3, 13, 3),
            (6, 5, 6, 6),
            (7, 5, 7, 6),
            (8, 5, 8, 6),
            (9, 5, 9, 6),
        ] {
            canvas.merge(fr, fc, lr, lc);
        }

        for (fr, lr, fc, lc) in [
            (2, 3, 1, 3),
            (4, 5, 1, 3),
            (6, 7, 1, 1),
            (6, 7, 3, 3),
            (8, 9, 1, 3),
            (10, 11, 1, 3),
            (12, 13, 1, 1),
            (12, 13, 3, 3),
            (6, 6, 5, 6),
            (8, 8, 5, 6),
            (10, 10, 5, 6),
        ] {
            canvas.outline_region(fr, lr, fc, lc, Edge::Bottom);
        }

        // Seller detail cells are left-aligned.
        for row in [2, 4, 6] {
            canvas.restyle(row, 1, |s| s.halign = Some(HAlign::Left));
        }
    }
}
