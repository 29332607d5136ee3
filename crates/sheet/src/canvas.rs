//! Sparse grid canvas with block writes and merge resolution

use std::collections::{BTreeMap, HashSet};

use exportdoc_common::CellValue;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline, Image, Workbook};
use tracing::trace;

use crate::style::{CellStyle, HAlign, VAlign};
use crate::SheetError;

/// How a rectangular block of values is placed on the canvas.
///
/// In the merge modes, blank-marker cells are resolved into merge spans:
/// each blank scans backward along the merge axis to the nearest populated
/// cell of the same block and joins its span. A blank with no populated
/// cell behind it stays a styled empty cell. In `Plain` mode blanks are
/// written as styled empty cells, no merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    Plain,
    MergeHorizontal,
    MergeVertical,
}

/// One merged cell range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl MergeSpan {
    fn covers(&self, row: u32, col: u16) -> bool {
        row >= self.first_row && row <= self.last_row && col >= self.first_col && col <= self.last_col
    }

    fn is_single(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

/// A stamp image anchored at a cell and scaled to a fixed pixel size.
#[derive(Debug, Clone)]
pub struct Stamp {
    pub bytes: Vec<u8>,
    pub row: u32,
    pub col: u16,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone)]
struct Cell {
    value: Option<CellValue>,
    style: CellStyle,
}

/// Which edges of a region [`GridCanvas::outline_region`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Outer,
    Top,
    Bottom,
    Left,
    Right,
}

/// In-memory document layout: styled cells, merge spans, geometry, stamp.
///
/// Coordinates are zero-based, rows `u32` and columns `u16`, matching the
/// serialization target.
#[derive(Debug, Default)]
pub struct GridCanvas {
    cells: BTreeMap<(u32, u16), Cell>,
    merges: Vec<MergeSpan>,
    col_widths: Vec<f64>,
    row_heights: Vec<f64>,
    default_row_height: Option<f64>,
    stamp: Option<Stamp>,
    max_row: u32,
}

impl GridCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_col_widths(&mut self, widths: &[f64]) {
        self.col_widths = widths.to_vec();
    }

    /// Explicit heights for the leading rows; rows past the list take the
    /// default height.
    pub fn set_row_heights(&mut self, heights: &[f64]) {
        self.row_heights = heights.to_vec();
    }

    pub fn set_default_row_height(&mut self, height: f64) {
        self.default_row_height = Some(height);
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        let row = row as usize;
        if self.row_heights.len() <= row {
            let pad = self.default_row_height.unwrap_or(15.0);
            self.row_heights.resize(row + 1, pad);
        }
        self.row_heights[row] = height;
    }

    pub fn set_stamp(&mut self, stamp: Stamp) {
        self.stamp = Some(stamp);
    }

    /// Highest row index any write has touched.
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Write a single styled cell.
    pub fn write_cell(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) {
        self.max_row = self.max_row.max(row);
        self.cells.insert(
            (row, col),
            Cell {
                value: Some(value),
                style,
            },
        );
    }

    /// Write a rectangular block of values starting at `(start_row,
    /// start_col)` and return the first row index below the block.
    ///
    /// `None` elements leave their cell unset but still count toward the
    /// block extent. Blank markers behave per [`BlockMode`].
    pub fn write_block(
        &mut self,
        block: &[Vec<Option<CellValue>>],
        start_row: u32,
        start_col: u16,
        mode: BlockMode,
        style: &CellStyle,
    ) -> u32 {
        for (r, row_values) in block.iter().enumerate() {
            let row = start_row + r as u32;
            self.max_row = self.max_row.max(row);
            for (c, value) in row_values.iter().enumerate() {
                let col = start_col + c as u16;
                let Some(value) = value else { continue };
                self.cells.insert(
                    (row, col),
                    Cell {
                        value: Some(value.clone()),
                        style: style.clone(),
                    },
                );
            }
        }

        match mode {
            BlockMode::Plain => {}
            BlockMode::MergeHorizontal => self.resolve_merges(block, start_row, start_col, true),
            BlockMode::MergeVertical => self.resolve_merges(block, start_row, start_col, false),
        }

        start_row + block.len() as u32
    }

    /// Resolve blank markers inside a just-written block into merge spans.
    ///
    /// Candidates are visited bottom-right first. Each unconsumed candidate
    /// scans backward along the merge axis, through other blanks, until it
    /// hits a populated cell of the block; that cell anchors the span. The
    /// scan never leaves the block.
    fn resolve_merges(
        &mut self,
        block: &[Vec<Option<CellValue>>],
        start_row: u32,
        start_col: u16,
        horizontal: bool,
    ) {
        let mut candidates: Vec<(u32, u16)> = Vec::new();
        for (r, row_values) in block.iter().enumerate() {
            for (c, value) in row_values.iter().enumerate() {
                if matches!(value, Some(v) if v.is_blank()) {
                    candidates.push((start_row + r as u32, start_col + c as u16));
                }
            }
        }
        candidates.sort_unstable_by(|a, b| b.cmp(a));

        let mut used: HashSet<(u32, u16)> = HashSet::new();
        for &(row, col) in &candidates {
            if used.contains(&(row, col)) {
                continue;
            }
            let anchor = if horizontal {
                self.scan_back(block, start_row, start_col, row, col, true)
            } else {
                self.scan_back(block, start_row, start_col, row, col, false)
            };
            if let Some((anchor_row, anchor_col)) = anchor {
                let span = MergeSpan {
                    first_row: anchor_row,
                    first_col: anchor_col,
                    last_row: row,
                    last_col: col,
                };
                for r in span.first_row..=span.last_row {
                    for c in span.first_col..=span.last_col {
                        used.insert((r, c));
                    }
                }
                trace!(?span, "resolved merge span");
                self.merges.push(span);
            }
        }
    }

    fn scan_back(
        &self,
        block: &[Vec<Option<CellValue>>],
        start_row: u32,
        start_col: u16,
        row: u32,
        col: u16,
        horizontal: bool,
    ) -> Option<(u32, u16)> {
        let (mut r, mut c) = (row, col);
        loop {
            if horizontal {
                if c == start_col {
                    return None;
                }
                c -= 1;
            } else {
                if r == start_row {
                    return None;
                }
                r -= 1;
            }
            let br = (r - start_row) as usize;
            let bc = (c - start_col) as usize;
            match block.get(br).and_then(|row_values| row_values.get(bc)) {
                Some(Some(v)) if !v.is_blank() => return Some((r, c)),
                Some(Some(_)) => continue,
                // Unset cells break the run.
                _ => return None,
            }
        }
    }

    /// Record an explicit merge span.
    pub fn merge(&mut self, first_row: u32, first_col: u16, last_row: u32, last_col: u16) {
        self.max_row = self.max_row.max(last_row);
        self.merges.push(MergeSpan {
            first_row,
            first_col,
            last_row,
            last_col,
        });
    }

    /// Draw thin borders along the chosen edges of a region, creating empty
    /// styled cells where the boundary has none.
    pub fn outline_region(
        &mut self,
        first_row: u32,
        last_row: u32,
        first_col: u16,
        last_col: u16,
        edge: Edge,
    ) {
        self.max_row = self.max_row.max(last_row);
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let top = row == first_row && matches!(edge, Edge::Outer | Edge::Top);
                let bottom = row == last_row && matches!(edge, Edge::Outer | Edge::Bottom);
                let left = col == first_col && matches!(edge, Edge::Outer | Edge::Left);
                let right = col == last_col && matches!(edge, Edge::Outer | Edge::Right);
                if !(top || bottom || left || right) {
                    continue;
                }
                let cell = self.cells.entry((row, col)).or_insert_with(|| Cell {
                    value: None,
                    style: CellStyle::default(),
                });
                cell.style.borders.top |= top;
                cell.style.borders.bottom |= bottom;
                cell.style.borders.left |= left;
                cell.style.borders.right |= right;
            }
        }
    }

    /// Adjust the style of an already-placed cell, creating an empty cell
    /// when none exists yet.
    pub fn restyle(&mut self, row: u32, col: u16, f: impl FnOnce(&mut CellStyle)) {
        self.max_row = self.max_row.max(row);
        let cell = self.cells.entry((row, col)).or_insert_with(|| Cell {
            value: None,
            style: CellStyle::default(),
        });
        f(&mut cell.style);
    }

    /// Serialize the canvas to workbook bytes.
    ///
    /// # Errors
    /// Returns [`SheetError::Stamp`] when the stamp bytes are not a usable
    /// image, and [`SheetError::Xlsx`] for serialization failures.
    pub fn into_xlsx(self, sheet_name: &str) -> Result<Vec<u8>, SheetError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col, width) in self.col_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
        for row in 0..=self.max_row {
            let height = self
                .row_heights
                .get(row as usize)
                .copied()
                .or(self.default_row_height);
            if let Some(height) = height {
                worksheet.set_row_height(row, height)?;
            }
        }

        // Cells inside a merge span are handled by the span write.
        let mut covered: HashSet<(u32, u16)> = HashSet::new();
        for span in &self.merges {
            for row in span.first_row..=span.last_row {
                for col in span.first_col..=span.last_col {
                    covered.insert((row, col));
                }
            }
        }

        for span in &self.merges {
            if span.is_single() {
                continue;
            }
            let anchor = self.cells.get(&(span.first_row, span.first_col));
            let format = build_format(anchor.map_or(&CellStyle::default(), |c| &c.style));
            match anchor.and_then(|c| c.value.as_ref()) {
                Some(CellValue::Text(s)) => {
                    worksheet.merge_range(
                        span.first_row,
                        span.first_col,
                        span.last_row,
                        span.last_col,
                        s,
                        &format,
                    )?;
                }
                Some(CellValue::Int(v)) => {
                    worksheet.merge_range(
                        span.first_row,
                        span.first_col,
                        span.last_row,
                        span.last_col,
                        "",
                        &format,
                    )?;
                    worksheet.write_number_with_format(
                        span.first_row,
                        span.first_col,
                        *v as f64,
                        &format,
                    )?;
                }
                Some(CellValue::Float(v)) => {
                    worksheet.merge_range(
                        span.first_row,
                        span.first_col,
                        span.last_row,
                        span.last_col,
                        "",
                        &format,
                    )?;
                    worksheet.write_number_with_format(
                        span.first_row,
                        span.first_col,
                        *v,
                        &format,
                    )?;
                }
                None => {
                    worksheet.merge_range(
                        span.first_row,
                        span.first_col,
                        span.last_row,
                        span.last_col,
                        "",
                        &format,
                    )?;
                }
            }
        }

        for ((row, col), cell) in &self.cells {
            if covered.contains(&(*row, *col)) {
                continue;
            }
            let format = build_format(&cell.style);
            match &cell.value {
                Some(CellValue::Text(s)) => {
                    worksheet.write_string_with_format(*row, *col, s, &format)?;
                }
                Some(CellValue::Int(v)) => {
                    worksheet.write_number_with_format(*row, *col, *v as f64, &format)?;
                }
                Some(CellValue::Float(v)) => {
                    worksheet.write_number_with_format(*row, *col, *v, &format)?;
                }
                None => {
                    if cell.style != CellStyle::default() {
                        worksheet.write_blank(*row, *col, &format)?;
                    }
                }
            }
        }

        if let Some(stamp) = &self.stamp {
            let image = Image::new_from_buffer(&stamp.bytes)
                .map_err(|e| SheetError::Stamp(e.to_string()))?
                .set_scale_to_size(stamp.width_px, stamp.height_px, false);
            worksheet.insert_image(stamp.row, stamp.col, &image)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn build_format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if let Some(name) = style.font_name {
        format = format.set_font_name(name);
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if style.bold {
        format = format.set_bold();
    }
    if style.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if let Some(halign) = style.halign {
        format = format.set_align(match halign {
            HAlign::Left => FormatAlign::Left,
            HAlign::Center => FormatAlign::Center,
            HAlign::Right => FormatAlign::Right,
        });
    }
    if let Some(valign) = style.valign {
        format = format.set_align(match valign {
            VAlign::Top => FormatAlign::Top,
            VAlign::Middle => FormatAlign::VerticalCenter,
            VAlign::Bottom => FormatAlign::Bottom,
        });
    }
    if style.borders.top {
        format = format.set_border_top(FormatBorder::Thin);
    }
    if style.borders.bottom {
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    if style.borders.left {
        format = format.set_border_left(FormatBorder::Thin);
    }
    if style.borders.right {
        format = format.set_border_right(FormatBorder::Thin);
    }
    if let Some(num_format) = &style.num_format {
        format = format.set_num_format(num_format);
    }
    format
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txt(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    fn blank() -> Option<CellValue> {
        Some(CellValue::blank())
    }

    #[test]
    fn test_horizontal_merge_runs() {
        let mut canvas = GridCanvas::new();
        let block = vec![vec![txt("A"), blank(), blank(), txt("B"), blank()]];
        let next = canvas.write_block(&block, 0, 0, BlockMode::MergeHorizontal, &CellStyle::new());
        assert_eq!(next, 1);
        assert_eq!(canvas.merges.len(), 2);
        assert!(canvas.merges.contains(&MergeSpan {
            first_row: 0,
            first_col: 0,
            last_row: 0,
            last_col: 2
        }));
        assert!(canvas.merges.contains(&MergeSpan {
            first_row: 0,
            first_col: 3,
            last_row: 0,
            last_col: 4
        }));
    }

    #[test]
    fn test_vertical_merge_runs() {
        let mut canvas = GridCanvas::new();
        let block = vec![
            vec![txt("A")],
            vec![blank()],
            vec![blank()],
            vec![txt("B")],
            vec![blank()],
        ];
        canvas.write_block(&block, 2, 1, BlockMode::MergeVertical, &CellStyle::new());
        assert!(canvas.merges.contains(&MergeSpan {
            first_row: 2,
            first_col: 1,
            last_row: 4,
            last_col: 1
        }));
        assert!(canvas.merges.contains(&MergeSpan {
            first_row: 5,
            first_col: 1,
            last_row: 6,
            last_col: 1
        }));
    }

    #[test]
    fn test_leading_blanks_without_anchor_stay_cells() {
        let mut canvas = GridCanvas::new();
        let block = vec![vec![blank(), blank(), txt("A")]];
        canvas.write_block(&block, 0, 0, BlockMode::MergeHorizontal, &CellStyle::new());
        assert!(canvas.merges.is_empty());
        assert!(canvas.cells.contains_key(&(0, 0)));
        assert!(canvas.cells.contains_key(&(0, 1)));
    }

    #[test]
    fn test_unset_cells_break_merge_runs() {
        let mut canvas = GridCanvas::new();
        let block = vec![vec![txt("A"), None, blank()]];
        canvas.write_block(&block, 0, 0, BlockMode::MergeHorizontal, &CellStyle::new());
        assert!(canvas.merges.is_empty());
    }

    #[test]
    fn test_plain_mode_keeps_blank_cells() {
        let mut canvas = GridCanvas::new();
        let block = vec![vec![txt("A"), blank()]];
        canvas.write_block(&block, 0, 0, BlockMode::Plain, &CellStyle::new().bordered());
        assert!(canvas.merges.is_empty());
        assert!(canvas.cells.contains_key(&(0, 1)));
    }

    #[test]
    fn test_block_extent_counts_unset_cells() {
        let mut canvas = GridCanvas::new();
        let block = vec![vec![None], vec![None], vec![txt("X")]];
        let next = canvas.write_block(&block, 5, 0, BlockMode::Plain, &CellStyle::new());
        assert_eq!(next, 8);
        assert_eq!(canvas.max_row(), 7);
    }

    #[test]
    fn test_outline_region_outer() {
        let mut canvas = GridCanvas::new();
        canvas.outline_region(0, 2, 0, 2, Edge::Outer);
        let corner = &canvas.cells[&(0, 0)];
        assert!(corner.style.borders.top && corner.style.borders.left);
        assert!(!corner.style.borders.bottom && !corner.style.borders.right);
        // Interior untouched.
        assert!(!canvas.cells.contains_key(&(1, 1)));
    }

    #[test]
    fn test_serializes_to_workbook_bytes() {
        let mut canvas = GridCanvas::new();
        canvas.set_col_widths(&[16.0, 22.0]);
        canvas.set_default_row_height(16.1);
        canvas.write_cell(0, 0, CellValue::from("title"), CellStyle::new().bold());
        canvas.write_cell(1, 1, CellValue::Int(42), CellStyle::new().bordered());
        canvas.merge(2, 0, 2, 1);
        let bytes = canvas.into_xlsx("Sheet1").unwrap();
        // Zip local-file-header magic.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_bad_stamp_bytes_fail_serialization() {
        let mut canvas = GridCanvas::new();
        canvas.write_cell(0, 0, CellValue::from("x"), CellStyle::new());
        canvas.set_stamp(Stamp {
            bytes: vec![0, 1, 2, 3],
            row: 0,
            col: 0,
            width_px: 320,
            height_px: 320,
        });
        let err = canvas.into_xlsx("Sheet1").unwrap_err();
        assert!(matches!(err, SheetError::Stamp(_)));
    }
}
