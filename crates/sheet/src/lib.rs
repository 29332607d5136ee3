//! Grid layout and merge engine
//!
//! Documents are laid out on a [`GridCanvas`]: a sparse grid of styled
//! cells plus merge spans, column widths and row heights. Builders write
//! rectangular blocks of values onto the canvas; blank-marker cells
//! (`CellValue::Text("")`) are resolved into merge spans anchored at their
//! nearest populated neighbor. The finished canvas serializes to workbook
//! bytes in one pass.

mod canvas;
mod style;

pub use canvas::{BlockMode, Edge, GridCanvas, MergeSpan, Stamp};
pub use style::{BorderFlags, CellStyle, HAlign, VAlign};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("workbook serialization failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("stamp image unreadable: {0}")]
    Stamp(String),
}
