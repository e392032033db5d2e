use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Box-drawing table with columns sized to their content.
pub struct Table {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// `max_widths[i]` caps column `i`; longer cells are truncated with `…`.
    pub fn new(headers: &[&'static str], rows: Vec<Vec<String>>, max_widths: &[usize]) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0);
                let cap = max_widths.get(i).copied().unwrap_or(usize::MAX);
                content.max(header.width()).min(cap.max(header.width()))
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            widths,
            rows,
        }
    }

    /// Render every line. `style` colors a cell after it has been padded.
    pub fn render(&self, style: impl Fn(usize, &str) -> String) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.line(self.headers.iter().map(|h| h.to_string()), |_, cell| {
            cell.to_string()
        }));
        lines.push(self.border('├', '┼', '┤'));
        for row in &self.rows {
            lines.push(self.line(row.iter().cloned(), &style));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines
    }

    pub fn print(&self, style: impl Fn(usize, &str) -> String) {
        for line in self.render(style) {
            println!("{}", line);
        }
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn line(
        &self,
        cells: impl Iterator<Item = String>,
        style: impl Fn(usize, &str) -> String,
    ) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .enumerate()
            .map(|(i, (cell, width))| style(i, &pad(&truncate(&cell, *width), *width)))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }
}

/// Pad to `width` display columns.
pub fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Shorten to at most `max` display columns, ending in `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("編集", 5), "編集 ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("/opt/very/long/path", 8), "/opt/ve…");
        assert_eq!(truncate("編集者", 4), "編…");
    }

    #[test]
    fn test_render_aligns_columns() {
        let table = Table::new(
            &["ID", "Name"],
            vec![
                vec!["vscode".to_string(), "VS Code".to_string()],
                vec!["zed".to_string(), "Zed".to_string()],
            ],
            &[20, 20],
        );
        let lines = table.render(|_, cell| cell.to_string());

        assert_eq!(lines[0], "┌────────┬─────────┐");
        assert_eq!(lines[1], "│ ID     │ Name    │");
        assert_eq!(lines[3], "│ vscode │ VS Code │");
        assert_eq!(lines[4], "│ zed    │ Zed     │");
        assert_eq!(lines[5], "└────────┴─────────┘");
        let width = lines[0].width();
        assert!(lines.iter().all(|line| line.width() == width));
    }

    #[test]
    fn test_render_truncates_to_cap() {
        let table = Table::new(
            &["Path"],
            vec![vec!["/Applications/Visual Studio Code.app".to_string()]],
            &[10],
        );
        let lines = table.render(|_, cell| cell.to_string());
        assert_eq!(lines[3], "│ /Applicat… │");
    }
}
