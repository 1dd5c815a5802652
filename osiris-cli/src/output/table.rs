//! Grid tables with ANSI-aware column widths.
//!
//! Cells keep their text and style apart, so widths are measured on the
//! plain text and colors never shift the columns.

use unicode_width::UnicodeWidthStr;

use super::text::Style;

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Plain text.
    pub text: String,
    /// Style applied when colors are on.
    pub style: Option<Style>,
}

impl Cell {
    /// Creates an unstyled cell.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Creates a styled cell.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }

    fn width(&self) -> usize {
        self.text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// Border layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Box-drawing grid around every cell.
    Grid,
    /// Headers underlined with dashes, no borders.
    Plain,
}

/// A table of rows.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    border: Border,
}

impl Table {
    /// Creates a grid table with the given headers (may be empty).
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            border: Border::Grid,
        }
    }

    /// Sets the border layout.
    #[must_use]
    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Appends a row.
    pub fn push<C: Into<Cell>>(&mut self, row: impl IntoIterator<Item = C>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Appends a row with every cell in `style`.
    pub fn push_styled<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>, style: Style) {
        self.rows
            .push(row.into_iter().map(|t| Cell::styled(t, style)).collect());
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for (i, header) in self.headers.iter().enumerate() {
            widths[i] = widths[i].max(header.width());
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }

    /// Renders the table; `paint` applies a style to already padded text.
    pub fn render(&self, paint: impl Fn(Style, &str) -> String) -> String {
        let widths = self.column_widths();
        if widths.is_empty() {
            return String::new();
        }
        match self.border {
            Border::Grid => self.render_grid(&widths, &paint),
            Border::Plain => self.render_plain(&widths, &paint),
        }
    }

    fn render_grid(&self, widths: &[usize], paint: &impl Fn(Style, &str) -> String) -> String {
        let rule = |left: &str, fill: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
            format!("{left}{}{right}", segments.join(mid))
        };

        let mut lines = vec![rule("╒", "═", "╤", "╕")];
        if !self.headers.is_empty() {
            let header: Vec<Cell> = self.headers.iter().map(|h| Cell::plain(h.as_str())).collect();
            lines.extend(grid_row(&header, widths, paint));
            lines.push(rule("╞", "═", "╪", "╡"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                lines.push(rule("├", "─", "┼", "┤"));
            }
            lines.extend(grid_row(row, widths, paint));
        }
        lines.push(rule("╘", "═", "╧", "╛"));
        lines.join("\n")
    }

    fn render_plain(&self, widths: &[usize], paint: &impl Fn(Style, &str) -> String) -> String {
        let mut lines = Vec::new();
        if !self.headers.is_empty() {
            let header: Vec<Cell> = self.headers.iter().map(|h| Cell::plain(h.as_str())).collect();
            lines.push(plain_row(&header, widths, paint));
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(dashes.join("  "));
        }
        for row in &self.rows {
            lines.push(plain_row(row, widths, paint));
        }
        lines.join("\n")
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn paint_cell(cell: Option<&Cell>, line: &str, width: usize, paint: &impl Fn(Style, &str) -> String) -> String {
    let padded = pad(line, width);
    match cell.and_then(|c| c.style) {
        Some(style) => paint(style, &padded),
        None => padded,
    }
}

/// A grid row, split over several lines when a cell holds newlines.
fn grid_row(row: &[Cell], widths: &[usize], paint: &impl Fn(Style, &str) -> String) -> Vec<String> {
    let height = row.iter().map(|c| c.text.lines().count()).max().unwrap_or(1).max(1);
    (0..height)
        .map(|line_idx| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i);
                    let line = cell
                        .and_then(|c| c.text.lines().nth(line_idx))
                        .unwrap_or_default();
                    format!(" {} ", paint_cell(cell, line, *width, paint))
                })
                .collect();
            format!("│{}│", cells.join("│"))
        })
        .collect()
}

fn plain_row(row: &[Cell], widths: &[usize], paint: &impl Fn(Style, &str) -> String) -> String {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = row.get(i);
            let text = cell.map(|c| c.text.as_str()).unwrap_or_default();
            paint_cell(cell, text, *width, paint)
        })
        .collect();
    cells.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_paint(_: Style, text: &str) -> String {
        text.to_string()
    }

    #[test]
    fn test_grid_layout() {
        let mut table = Table::new(["cursus", "ec"]);
        table.push(["NWI-IBC019", "6"]);
        table.push(["X", "3"]);

        let rendered = table.render(no_paint);
        let expected = "\
╒════════════╤════╕
│ cursus     │ ec │
╞════════════╪════╡
│ NWI-IBC019 │ 6  │
├────────────┼────┤
│ X          │ 3  │
╘════════════╧════╛";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_grid_without_headers() {
        let mut table = Table::new(Vec::<String>::new());
        table.push(["a"]);
        assert_eq!(table.render(no_paint), "╒═══╕\n│ a │\n╘═══╛");
    }

    #[test]
    fn test_plain_layout() {
        let mut table = Table::new(["Study types", ""]).border(Border::Plain);
        table.push(["HC", "Lecture"]);
        let rendered = table.render(no_paint);
        assert_eq!(rendered, "Study types\n-----------  -------\nHC           Lecture");
    }

    #[test]
    fn test_wide_characters_and_styles_keep_alignment() {
        let mut table = Table::new(["naam", "x"]);
        table.push(vec![Cell::styled("Één", Style::Green), Cell::plain("1")]);
        table.push(vec![Cell::plain("日本"), Cell::plain("2")]);

        let rendered = table.render(|_, text| format!("<{text}>"));
        assert!(rendered.contains("│ <Één > │ 1 │"));
        assert!(rendered.contains("│ 日本 │ 2 │"));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let mut table = Table::new(["a", "b"]);
        table.push(["1"]);
        assert!(!table.is_empty());
        assert!(table.render(no_paint).contains("│ 1 │   │"));
    }
}
