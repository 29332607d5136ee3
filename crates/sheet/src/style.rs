//! Cell styling model, converted to workbook formats at serialization time

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Which edges of a cell carry a thin border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl BorderFlags {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// Style attached to one canvas cell.
///
/// Unset fields fall back to workbook defaults. Builders construct styles
/// once per block and reuse them for every cell in the block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub font_name: Option<&'static str>,
    pub font_size: Option<f64>,
    pub bold: bool,
    pub underline: bool,
    pub wrap: bool,
    pub halign: Option<HAlign>,
    pub valign: Option<VAlign>,
    pub borders: BorderFlags,
    pub num_format: Option<String>,
}

impl CellStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn font(mut self, name: &'static str, size: f64) -> Self {
        self.font_name = Some(name);
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    #[must_use]
    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    #[must_use]
    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = Some(halign);
        self.valign = Some(valign);
        self
    }

    #[must_use]
    pub fn halign(mut self, halign: HAlign) -> Self {
        self.halign = Some(halign);
        self
    }

    #[must_use]
    pub fn bordered(mut self) -> Self {
        self.borders = BorderFlags::all();
        self
    }

    #[must_use]
    pub fn num_format(mut self, format: &str) -> Self {
        self.num_format = Some(format.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_composition() {
        let style = CellStyle::new()
            .font("楷体", 10.0)
            .bold()
            .bordered()
            .align(HAlign::Center, VAlign::Middle);
        assert_eq!(style.font_name, Some("楷体"));
        assert!(style.bold);
        assert!(style.borders.any());
        assert_eq!(style.halign, Some(HAlign::Center));
    }

    #[test]
    fn test_border_flags() {
        assert!(!BorderFlags::default().any());
        assert!(BorderFlags::all().any());
    }
}
