//! Layout parameters for expanded rendering

use serde::{Deserialize, Serialize};

/// Indentation and label placement for the expanded (formatted) output.
///
/// Widths are in columns. `label_setback` moves `case`, `default` and
/// labeled statements left of the surrounding statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub offset: u32,
    pub indent: u32,
    pub label_setback: u32,
    pub use_tabs: bool,
    pub blank_line_before_label: bool,
}

impl LayoutOptions {
    pub const fn new(
        offset: u32,
        indent: u32,
        label_setback: u32,
        use_tabs: bool,
        blank_line_before_label: bool,
    ) -> Self {
        Self {
            offset,
            indent,
            label_setback,
            use_tabs,
            blank_line_before_label,
        }
    }

    /// Flat layout used when only comments are being removed
    pub const fn flat() -> Self {
        Self::new(0, 0, 0, false, false)
    }

    /// Leading whitespace for a line at `column`.
    ///
    /// With tabs enabled every full indent unit becomes one tab and the
    /// remainder stays as spaces.
    pub fn indent_string(&self, column: u32) -> String {
        if self.use_tabs && self.indent > 0 {
            let tabs = column / self.indent;
            let spaces = column % self.indent;
            let mut s = "\t".repeat(tabs as usize);
            s.push_str(&" ".repeat(spaces as usize));
            s
        } else {
            " ".repeat(column as usize)
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new(0, 4, 2, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_spaces() {
        let layout = LayoutOptions::default();
        assert_eq!(layout.indent_string(6), "      ");
    }

    #[test]
    fn test_indent_tabs() {
        let layout = LayoutOptions::new(0, 4, 2, true, false);
        assert_eq!(layout.indent_string(8), "\t\t");
        assert_eq!(layout.indent_string(6), "\t  ");
    }

    #[test]
    fn test_flat_layout() {
        let layout = LayoutOptions::flat();
        assert_eq!(layout.indent_string(0), "");
        assert!(!layout.use_tabs);
    }
}
